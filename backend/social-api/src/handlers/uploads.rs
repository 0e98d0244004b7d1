//! Media upload to local disk.
//!
//! Files land in `<upload dir>/<YYYY-MM-DD>/<hash>-<stem>.<ext>` where the
//! hash is SHA-256 over the file bytes and the upload timestamp.

use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use crypto_core::hash::sha256_hex;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::UserId;

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: usize = 20 * 1024 * 1024;
const SNIFF_LEN: usize = 512;

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
}

/// Detect the media type from leading magic bytes.
pub fn sniff_content_type(bytes: &[u8]) -> Option<mime::Mime> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];

    let detected = if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if head.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        "image/gif"
    } else if head.starts_with(b"BM") {
        "image/bmp"
    } else if head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"WEBP" {
        "image/webp"
    } else if head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"AVI " {
        "video/x-msvideo"
    } else if head.len() >= 12 && &head[4..8] == b"ftyp" {
        if &head[8..12] == b"qt  " {
            "video/quicktime"
        } else {
            "video/mp4"
        }
    } else if head.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        "video/webm"
    } else {
        return None;
    };

    detected.parse().ok()
}

/// Reduce a client-supplied file name to a safe `(stem, extension)` pair.
fn split_file_name(original: &str) -> (String, String) {
    let base = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let path = Path::new(base);

    let stem: String = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let ext: String = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    let stem = if stem.is_empty() { "file".to_string() } else { stem };
    (stem, ext)
}

fn storage_path(dir: &Path, original: &str, bytes: &[u8]) -> PathBuf {
    let now = Utc::now();
    let timestamp = now.timestamp_nanos_opt().unwrap_or_default().to_string();
    let digest = sha256_hex(&[bytes, timestamp.as_bytes()]);

    let (stem, ext) = split_file_name(original);
    let file_name = if ext.is_empty() {
        format!("{}-{}", digest, stem)
    } else {
        format!("{}-{}.{}", digest, stem, ext)
    };

    dir.join(now.format("%Y-%m-%d").to_string()).join(file_name)
}

struct ReceivedFile {
    name: String,
    bytes: Vec<u8>,
}

async fn read_single_file(mut payload: Multipart) -> Result<ReceivedFile> {
    let mut received: Option<ReceivedFile> = None;
    let mut total_bytes: usize = 0;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?;

        if field.name() != Some("file") || received.is_some() {
            return Err(AppError::BadRequest("Only one file allowed to upload".to_string()));
        }

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(format!("failed to read upload: {}", e)))?;
            total_bytes += chunk.len();
            if total_bytes > MAX_UPLOAD_BYTES {
                return Err(AppError::BadRequest("File size exceeds limit".to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }

        received = Some(ReceivedFile { name, bytes });
    }

    received.ok_or_else(|| AppError::BadRequest("Only one file allowed to upload".to_string()))
}

/// POST /api/v1/upload
pub async fn upload_file(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let file = read_single_file(payload).await?;

    if file.bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    let content_type = sniff_content_type(&file.bytes)
        .ok_or_else(|| AppError::BadRequest("Unsupported file type".to_string()))?;
    let limit = if content_type.type_() == mime::IMAGE {
        MAX_IMAGE_BYTES
    } else if content_type.type_() == mime::VIDEO {
        MAX_VIDEO_BYTES
    } else {
        return Err(AppError::BadRequest("Unsupported file type".to_string()));
    };
    if file.bytes.len() > limit {
        return Err(AppError::BadRequest("File size exceeds limit".to_string()));
    }

    let path = storage_path(&state.config.upload.dir, &file.name, &file.bytes);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create upload directory: {}", e)))?;
    }
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store upload: {}", e)))?;

    tracing::info!(
        user_id = user_id.0,
        content_type = %content_type,
        size = file.bytes.len(),
        path = %path.display(),
        "file uploaded"
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        filename: path.display().to_string(),
    }))
}
