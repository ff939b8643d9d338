use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use cabinet_core::{object_key, validate_file_name, UploadOptions, UserIdentity};

use crate::auth::middleware::AuthUser;
use crate::dto::{
    DeleteRequest, FileDetailsDto, FileEntryDto, FileNameQuery, ListFilesResponse, RenameRequest,
    UploadResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Refreshes the caller's registry and returns the listing.
///
/// A failed refresh still answers 200 with the last known good entries and
/// the error message, so the UI can show stale data instead of a blank
/// screen.
pub async fn list_files(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListFilesResponse>, AppError> {
    let registry = state.registry_for(&user.sub);
    let mut registry = registry.lock().await;

    // Error state is carried in the response body, not the status code.
    let _ = registry.refresh().await;

    Ok(Json(ListFilesResponse {
        entries: registry.entries().iter().map(FileEntryDto::from).collect(),
        error: registry.last_error().map(str::to_string),
        refresh_trigger: registry.refresh_trigger(),
    }))
}

pub async fn download_file(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FileNameQuery>,
) -> Result<impl IntoResponse, AppError> {
    let registry = state.registry_for(&user.sub);
    let registry = registry.lock().await;

    let bytes = registry.download(&query.name).await?;

    let mime = mime_guess::from_path(&query.name).first_or_octet_stream();
    // Quotes, backslashes and control characters would break the header
    // value; names seeded directly into the store may still carry them.
    let safe_name: String = query
        .name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    let disposition = format!("attachment; filename=\"{safe_name}\"");

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

pub async fn file_details(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FileNameQuery>,
) -> Result<Json<FileDetailsDto>, AppError> {
    let registry = state.registry_for(&user.sub);
    let mut registry = registry.lock().await;

    let details = registry
        .select_for_details(&query.name)
        .ok_or_else(|| AppError::NotFound(format!("no such file: {}", query.name)))?;

    Ok(Json(FileDetailsDto::from(details)))
}

pub async fn delete_file(
    user: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<DeleteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let registry = state.registry_for(&user.sub);
    let mut registry = registry.lock().await;

    registry.delete(&body.name).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn rename_file(
    user: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<RenameRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    validate_file_name(&body.new_name)?;

    let registry = state.registry_for(&user.sub);
    let mut registry = registry.lock().await;

    registry.rename(&body.name, &body.new_name).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// The upload side of the page: stores the file under the caller's prefix,
/// then signals the registry so the listing refreshes.
pub async fn upload_file(
    user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let max_bytes = state.config.storage.max_upload_size_mb * 1024 * 1024;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        validate_file_name(&file_name)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

        if data.len() > max_bytes {
            return Err(AppError::BadRequest(format!(
                "file exceeds the {} MB upload limit",
                state.config.storage.max_upload_size_mb
            )));
        }

        let identity = UserIdentity::new(&user.sub);
        let key = object_key(&identity, &file_name);
        state
            .store
            .upload(
                &key,
                data.to_vec(),
                &UploadOptions {
                    cache_control: Some("3600".to_string()),
                    upsert: false,
                },
            )
            .await?;

        tracing::info!(user = %user.sub, file = %file_name, "file uploaded");

        // The upload succeeded either way; a refresh failure is recorded in
        // the registry and reported by the next listing.
        let registry = state.registry_for(&user.sub);
        let _ = registry.lock().await.notify_upload().await;

        return Ok(Json(UploadResponse {
            success: true,
            name: file_name,
        }));
    }

    Err(AppError::BadRequest(
        "multipart body contained no file field".to_string(),
    ))
}
