use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::password::{hash_password, verify_password},
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::request::{LoginRequest, RegisterRequest},
    },
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        let username = request.username.trim();
        if self.repository.find_by_username(username).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "Username '{}' is already taken",
                username
            )));
        }
        if self.repository.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::AlreadyExists(
                "Email address is already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repository
            .create(User::new(username, &request.email, &password_hash))
            .await?;

        log::info!("Registered user '{}'", user.username);
        Ok(user)
    }

    /// Checks credentials. Unknown users and wrong passwords fail identically.
    pub async fn login(&self, request: LoginRequest) -> AppResult<User> {
        request.validate()?;

        let login = request.login.trim();
        let user = match self.repository.find_by_username(login).await? {
            Some(user) => Some(user),
            None if login.contains('@') => self.repository.find_by_email(login).await?,
            None => None,
        };

        match user {
            Some(user) if verify_password(&request.password, &user.password_hash) => Ok(user),
            _ => {
                log::warn!("Failed login attempt for '{}'", login);
                Err(AppError::Unauthorized("Invalid credentials".to_string()))
            }
        }
    }

    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "wonderland".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().times(1).returning(Ok);

        let user = UserService::new(Arc::new(repo))
            .register(register_request())
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "wonderland");
        assert!(verify_password("wonderland", &user.password_hash));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|name| Ok(Some(User::test_user(name))));
        repo.expect_create().never();

        let result = UserService::new(Arc::new(repo))
            .register(register_request())
            .await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let mut request = register_request();
        request.email = "nope".to_string();

        let result = UserService::new(Arc::new(repo)).register(request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_login_by_email() {
        let hash = hash_password("wonderland").unwrap();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_find_by_email()
            .returning(move |email| Ok(Some(User::new("alice", email, &hash))));

        let user = UserService::new(Arc::new(repo))
            .login(LoginRequest {
                login: "alice@example.com".to_string(),
                password: "wonderland".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let hash = hash_password("wonderland").unwrap();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(move |name| Ok(Some(User::new(name, "alice@example.com", &hash))));

        let result = UserService::new(Arc::new(repo))
            .login(LoginRequest {
                login: "alice".to_string(),
                password: "looking-glass".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
