pub mod auth_handler;
pub mod graphql_handler;
pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

pub use auth_handler::{login, me, register};
pub use graphql_handler::{graphiql, graphql};
pub use health_handler::{health_check, health_check_ready};
pub use quiz_handler::{
    delete_quiz, download_guest_quiz, download_quiz, edit_guest_quiz, edit_quiz, generate_quiz,
    get_guest_quiz, get_guest_quiz_fields, get_quiz, get_quiz_fields, list_quizzes,
};

/// Edit forms for large quizzes outgrow the default 16 KiB form limit.
const EDIT_FORM_LIMIT: usize = 1024 * 1024;

/// Registers every route. Guest routes come before `{id}` so that
/// `/api/quizzes/guest` is never read as a quiz id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().limit(EDIT_FORM_LIMIT))
        .app_data(web::JsonConfig::default().limit(EDIT_FORM_LIMIT))
        .service(health_check)
        .service(health_check_ready)
        .service(register)
        .service(login)
        .service(me)
        .service(generate_quiz)
        .service(list_quizzes)
        .service(get_guest_quiz)
        .service(download_guest_quiz)
        .service(get_guest_quiz_fields)
        .service(edit_guest_quiz)
        .service(get_quiz)
        .service(download_quiz)
        .service(get_quiz_fields)
        .service(edit_quiz)
        .service(delete_quiz)
        .service(graphql)
        .service(graphiql);
}
