use actix_web::{HttpRequest, HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

use crate::db::files as file_db;
use crate::models::files::{FileResponse, UploadQuery};
use crate::storage::{FileStorage, StorageError};

/// POST /api/files — raw body upload; bytes land on disk, metadata in
/// the `files` table.
pub async fn upload_file(
    db: web::Data<DatabaseConnection>,
    storage: web::Data<FileStorage>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    let query = query.into_inner();

    let path = match storage.save(&query.file_name, &body).await {
        Ok(path) => path,
        Err(StorageError::EmptyFile) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "file data is empty",
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to store file: {e}"),
            }));
        }
    };

    match file_db::insert_file(
        db.get_ref(),
        query.file_name,
        query.content_type,
        body.len() as i64,
        path.to_string_lossy().into_owned(),
    )
    .await
    {
        Ok(file) => HttpResponse::Created().json(FileResponse::from(file)),
        Err(e) => {
            // Orphaned bytes are cleaned up so disk and table stay in sync.
            if let Err(cleanup) = storage.delete(&path.to_string_lossy()).await {
                tracing::warn!("failed to clean up orphaned upload: {cleanup}");
            }
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to record file: {e}"),
            }))
        }
    }
}

/// GET /api/files/{id}/download — streams the stored bytes.
pub async fn download_file(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    match file_db::get_file_by_id(db.get_ref(), id).await {
        Ok(Some(file)) => match actix_files::NamedFile::open_async(&file.file_path).await {
            Ok(named) => named.into_response(&req),
            Err(e) => {
                tracing::warn!("stored file {} unreadable: {e}", file.file_path);
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": format!("File {id} is missing from storage"),
                }))
            }
        },
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("File {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}
