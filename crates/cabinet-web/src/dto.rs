use serde::{Deserialize, Serialize};

use cabinet_core::{FileDetails, FileEntry};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: u64,
}

#[derive(Debug, Serialize)]
pub struct FileEntryDto {
    pub name: String,
    pub size: u64,
    pub created_at: String,
    pub last_modified: String,
}

impl From<&FileEntry> for FileEntryDto {
    fn from(entry: &FileEntry) -> Self {
        Self {
            name: entry.name.clone(),
            size: entry.size,
            created_at: entry.created_at.to_rfc3339(),
            last_modified: entry.last_modified().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    pub entries: Vec<FileEntryDto>,
    /// Set when the refresh failed; `entries` then holds the last known
    /// good listing.
    pub error: Option<String>,
    pub refresh_trigger: u64,
}

#[derive(Debug, Deserialize)]
pub struct FileNameQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
    pub new_name: String,
}

#[derive(Debug, Serialize)]
pub struct FileDetailsDto {
    pub name: String,
    pub size: u64,
    pub created_at: String,
    pub last_modified: String,
}

impl From<&FileDetails> for FileDetailsDto {
    fn from(details: &FileDetails) -> Self {
        Self {
            name: details.name.clone(),
            size: details.size,
            created_at: details.created_at.to_rfc3339(),
            last_modified: details.last_modified.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub name: String,
}
