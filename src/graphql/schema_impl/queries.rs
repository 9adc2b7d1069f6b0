use async_graphql::{Context, Object, ID};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    errors::AppResult,
    graphql::helpers::{gql, parse_id},
    models::dto::{
        request::PaginationParams, response::UserDto, QuizDto, QuizPage, QuizSummaryDto,
    },
};

pub struct QueryRoot;

impl QueryRoot {
    async fn load_my_quizzes(ctx: &Context<'_>, pagination: PaginationParams) -> AppResult<QuizPage> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let offset = pagination.offset();
        let limit = pagination.limit();
        let (quizzes, total) = state.quiz_service.list_owned(&claims, offset, limit).await?;

        Ok(QuizPage {
            items: quizzes.into_iter().map(QuizSummaryDto::from).collect(),
            total,
            offset,
            limit,
        })
    }

    async fn load_quiz(ctx: &Context<'_>, id: &ID) -> AppResult<QuizDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let id = parse_id(id)?;
        let quiz = state.quiz_service.get_owned(&claims, &id).await?;
        Ok(quiz.into())
    }

    async fn load_me(ctx: &Context<'_>) -> AppResult<UserDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let user = state.user_service.get_user(claims.user_id()).await?;
        Ok(user.into())
    }
}

#[Object]
impl QueryRoot {
    /// Saved quizzes of the signed-in user, newest first.
    async fn my_quizzes(
        &self,
        ctx: &Context<'_>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> async_graphql::Result<QuizPage> {
        gql(Self::load_my_quizzes(ctx, PaginationParams { offset, limit }).await)
    }

    async fn quiz(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<QuizDto> {
        gql(Self::load_quiz(ctx, &id).await)
    }

    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<UserDto> {
        gql(Self::load_me(ctx).await)
    }
}
