use std::collections::{BTreeMap, HashMap};

use actix_multipart::Multipart;
use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    delete, get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, web, Either, HttpRequest, HttpResponse,
};

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, MaybeAuthenticated},
    errors::{AppError, AppResult},
    middleware::get_request_id,
    models::{
        domain::Quiz,
        dto::{
            request::PaginationParams, response::DeleteQuizResponse, GenerateQuizForm, QuizDto,
            QuizPage, QuizSummaryDto,
        },
    },
    pipeline::{flatten_quiz, reconcile_fields, render_quiz_pdf},
    services::{GuestSessionStore, GUEST_SESSION_COOKIE},
};
use uuid::Uuid;

/// Edit form fields, posted either urlencoded or as a JSON object.
type EditFields = Either<web::Json<HashMap<String, String>>, web::Form<HashMap<String, String>>>;

fn into_fields(fields: EditFields) -> HashMap<String, String> {
    match fields {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
}

/// Only server-issued ids are honoured; anything else counts as no session.
fn guest_session_id(req: &HttpRequest) -> Option<String> {
    req.cookie(GUEST_SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .map(|id| id.to_string())
}

fn session_cookie(state: &AppState, session_id: String) -> Cookie<'static> {
    Cookie::build(GUEST_SESSION_COOKIE, session_id)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::minutes(state.config.guest_session_ttl_minutes))
        .finish()
}

async fn load_guest_quiz(state: &AppState, req: &HttpRequest) -> AppResult<(String, Quiz)> {
    let not_found = || AppError::NotFound("No quiz data found. Please generate a new quiz".to_string());

    let session_id = guest_session_id(req).ok_or_else(not_found)?;
    let quiz = state
        .guest_sessions
        .get(&session_id)
        .await
        .ok_or_else(not_found)?;
    Ok((session_id, quiz))
}

/// `My Quiz` becomes `My_Quiz.pdf`.
pub fn pdf_filename(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '"' | '/' | '\\' => '-',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if stem.is_empty() {
        "quiz.pdf".to_string()
    } else {
        format!("{}.pdf", stem)
    }
}

async fn pdf_response(quiz: Quiz) -> AppResult<HttpResponse> {
    let filename = pdf_filename(&quiz.title);
    let bytes = web::block(move || render_quiz_pdf(&quiz.title, &quiz.questions))
        .await
        .map_err(|e| AppError::InternalError(format!("render task aborted: {}", e)))??;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(bytes))
}

fn fields_response(quiz: &Quiz) -> HttpResponse {
    let fields: BTreeMap<_, _> = flatten_quiz(&quiz.title, &quiz.questions)
        .into_iter()
        .collect();
    HttpResponse::Ok().json(fields)
}

#[post("/api/quizzes/generate")]
pub async fn generate_quiz(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
    auth: MaybeAuthenticated,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_default();
    let form = GenerateQuizForm::from_multipart(payload, state.config.max_upload_bytes).await?;
    let title = form.quiz_title.clone();
    let quiz_type = form.quiz_type;
    let question_count = form.question_count;

    let text = state
        .text_extractor
        .extract(form.into_content_source()?)
        .await?;
    let questions = state
        .generation_service
        .generate(&text, quiz_type, question_count)
        .await?;

    match auth.0 {
        Some(claims) => {
            let quiz = Quiz::new(
                &title,
                quiz_type,
                question_count as i32,
                questions,
                Some(claims.user_id()),
            );
            let quiz = state.quiz_service.save_generated(quiz).await?;
            Ok(HttpResponse::Created().json(QuizDto::from(quiz)))
        }
        None => {
            let quiz = Quiz::new(&title, quiz_type, question_count as i32, questions, None);
            let session_id = guest_session_id(&req).unwrap_or_else(GuestSessionStore::new_session_id);
            let dto = QuizDto::from(&quiz);
            state.guest_sessions.put(&session_id, quiz).await;

            log::info!("[{}] Stored guest quiz '{}' in session", request_id, dto.id);
            Ok(HttpResponse::Created()
                .cookie(session_cookie(&state, session_id))
                .json(dto))
        }
    }
}

#[get("/api/quizzes")]
pub async fn list_quizzes(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    let (offset, limit) = (pagination.offset(), pagination.limit());

    let (quizzes, total) = state.quiz_service.list_owned(&auth.0, offset, limit).await?;

    Ok(HttpResponse::Ok().json(QuizPage {
        items: quizzes.into_iter().map(QuizSummaryDto::from).collect(),
        total,
        offset,
        limit,
    }))
}

#[get("/api/quizzes/guest")]
pub async fn get_guest_quiz(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let (_, quiz) = load_guest_quiz(&state, &req).await?;
    Ok(HttpResponse::Ok().json(QuizDto::from(quiz)))
}

#[get("/api/quizzes/guest/pdf")]
pub async fn download_guest_quiz(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let (_, quiz) = load_guest_quiz(&state, &req).await?;
    pdf_response(quiz).await
}

#[get("/api/quizzes/guest/fields")]
pub async fn get_guest_quiz_fields(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let (_, quiz) = load_guest_quiz(&state, &req).await?;
    Ok(fields_response(&quiz))
}

#[post("/api/quizzes/guest/edits")]
pub async fn edit_guest_quiz(
    state: web::Data<AppState>,
    req: HttpRequest,
    fields: EditFields,
) -> Result<HttpResponse, AppError> {
    let (session_id, mut quiz) = load_guest_quiz(&state, &req).await?;

    let edited = reconcile_fields(&into_fields(fields))?;
    if edited.questions.is_empty() {
        return Err(AppError::EmptyQuiz);
    }

    quiz.replace_content(edited.title, edited.questions);
    let dto = QuizDto::from(&quiz);
    state.guest_sessions.put(&session_id, quiz).await;

    Ok(HttpResponse::Ok().json(dto))
}

#[get("/api/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_owned(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(QuizDto::from(quiz)))
}

#[get("/api/quizzes/{id}/pdf")]
pub async fn download_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_owned(&auth.0, &id).await?;
    pdf_response(quiz).await
}

#[get("/api/quizzes/{id}/fields")]
pub async fn get_quiz_fields(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_owned(&auth.0, &id).await?;
    Ok(fields_response(&quiz))
}

#[post("/api/quizzes/{id}/edits")]
pub async fn edit_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    fields: EditFields,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .apply_edits(&auth.0, &id, &into_fields(fields))
        .await?;
    Ok(HttpResponse::Ok().json(QuizDto::from(quiz)))
}

#[delete("/api/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(DeleteQuizResponse {
        message: "Quiz deleted successfully".to_string(),
    }))
}
