pub mod ask_question_route;
pub mod create_session_route;
pub mod health_route;
pub mod session_history_route;
pub mod set_credential_route;
