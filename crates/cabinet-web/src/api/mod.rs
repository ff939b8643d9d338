mod auth_handlers;
pub mod files;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/logout", post(auth_handlers::logout))
}

pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/files", get(files::list_files))
        .route("/files/download", get(files::download_file))
        .route("/files/details", get(files::file_details))
        .route("/files/upload", post(files::upload_file))
        .route("/files/delete", post(files::delete_file))
        .route("/files/rename", post(files::rename_file))
}
