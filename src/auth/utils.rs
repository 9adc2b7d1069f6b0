use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

/// Saved quizzes are only visible to, and changeable by, their owner.
pub fn require_owner(claims: &Claims, quiz: &Quiz) -> AppResult<()> {
    if !quiz.is_owned_by(&claims.sub) {
        return Err(AppError::PermissionDenied(
            "You do not have permission to access this quiz".to_string(),
        ));
    }
    Ok(())
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}
