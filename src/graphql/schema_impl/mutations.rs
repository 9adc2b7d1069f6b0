use async_graphql::{Context, Object, ID};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    errors::AppResult,
    graphql::helpers::{gql, parse_id},
    models::dto::response::DeleteQuizResponse,
};

pub struct MutationRoot;

impl MutationRoot {
    async fn remove_quiz(ctx: &Context<'_>, id: &ID) -> AppResult<DeleteQuizResponse> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let id = parse_id(id)?;
        state.quiz_service.delete(&claims, &id).await?;

        Ok(DeleteQuizResponse {
            message: "Quiz deleted successfully".to_string(),
        })
    }
}

#[Object]
impl MutationRoot {
    async fn delete_quiz(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<DeleteQuizResponse> {
        gql(Self::remove_quiz(ctx, &id).await)
    }
}
