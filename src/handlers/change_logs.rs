use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

use crate::db::change_logs as log_db;
use crate::models::change_logs::{ChangeLogResponse, LogListQuery};
use crate::pagination::{CursorPageResponse, effective_cursor};

/// GET /api/change-logs — cursor-paged change-log listing; items carry
/// no diff payload.
pub async fn list_change_logs(
    db: web::Data<DatabaseConnection>,
    query: web::Query<LogListQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let filter = query.filter();
    let sort = query.sort();
    let page_size = query.page_size();
    let cursor = effective_cursor(query.cursor(), &sort, filter.is_active(), None);

    match log_db::find_page(db.get_ref(), &filter, sort, cursor, page_size).await {
        Ok((rows, total)) => {
            let content: Vec<ChangeLogResponse> =
                rows.into_iter().map(ChangeLogResponse::from).collect();
            let page =
                CursorPageResponse::assemble(content, page_size, total, |l| (l.changed_at, l.id));
            HttpResponse::Ok().json(page)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch change logs: {e}"),
        })),
    }
}

/// GET /api/change-logs/{id}/diffs — the stored before/after entries.
pub async fn get_log_diffs(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    match log_db::get_log_diffs(db.get_ref(), id).await {
        Ok(Some(diffs)) => HttpResponse::Ok().json(diffs),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Change log {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/change-logs/count
pub async fn count_change_logs(db: web::Data<DatabaseConnection>) -> impl Responder {
    match log_db::count_logs(db.get_ref()).await {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({ "count": count })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to count change logs: {e}"),
        })),
    }
}
