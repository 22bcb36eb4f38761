use actix_web::{HttpRequest, HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

use crate::db::change_logs as log_db;
use crate::db::departments as department_db;
use crate::db::employees as employee_db;
use crate::db::files as file_db;
use crate::models::change_logs::ChangeLogType;
use crate::models::employees::{
    DistributionQuery, EmployeeCountQuery, EmployeeListQuery, EmployeeResponse, RegisterEmployee,
    UpdateEmployee,
};
use crate::storage::FileStorage;

fn client_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info()
        .realip_remote_addr()
        .map(str::to_owned)
}

async fn to_response(db: &DatabaseConnection, model: crate::models::employees::Model) -> EmployeeResponse {
    let department_name = match model.department_id {
        Some(department_id) => department_db::get_department_by_id(db, department_id)
            .await
            .ok()
            .flatten()
            .map(|d| d.name),
        None => None,
    };
    EmployeeResponse::from_model(model, department_name)
}

/// POST /api/employees — register an employee and append a CREATED
/// change log.
pub async fn register_employee(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    body: web::Json<RegisterEmployee>,
) -> impl Responder {
    let input = body.into_inner();
    let memo = input.memo.clone();

    match employee_db::email_exists(db.get_ref(), &input.email, None).await {
        Ok(true) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": format!("Employee with email {} already exists", input.email),
            }));
        }
        Ok(false) => {}
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    }

    let employee_number = match employee_db::generate_employee_number(db.get_ref()).await {
        Ok(number) => number,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    match employee_db::insert_employee(db.get_ref(), input, employee_number).await {
        Ok(employee) => {
            let changes = employee_db::snapshot_changes(&employee, false);
            if let Err(e) = log_db::append_log(
                db.get_ref(),
                ChangeLogType::Created,
                &changes,
                employee.employee_number.clone(),
                memo,
                client_ip(&req),
            )
            .await
            {
                tracing::error!("failed to append CREATED change log: {e}");
            }
            HttpResponse::Created().json(to_response(db.get_ref(), employee).await)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to register employee: {e}"),
        })),
    }
}

/// GET /api/employees — offset-paged listing with filters.
pub async fn list_employees(
    db: web::Data<DatabaseConnection>,
    query: web::Query<EmployeeListQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let paging = query.paging();
    let filter = query.filter();
    let sort = query.sort();

    match employee_db::find_page_offset(db.get_ref(), &filter, sort, paging.offset(), paging.size())
        .await
    {
        Ok((rows, total)) => {
            let department_ids: Vec<i64> =
                rows.iter().filter_map(|e| e.department_id).collect();
            let names = department_db::names_for(db.get_ref(), department_ids)
                .await
                .unwrap_or_default();

            let content: Vec<EmployeeResponse> = rows
                .into_iter()
                .map(|m| {
                    let name = m.department_id.and_then(|id| names.get(&id).cloned());
                    EmployeeResponse::from_model(m, name)
                })
                .collect();

            let size = content.len();
            HttpResponse::Ok().json(serde_json::json!({
                "content": content,
                "page": paging.page(),
                "size": size,
                "totalElements": total,
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch employees: {e}"),
        })),
    }
}

/// GET /api/employees/{id}
pub async fn get_employee(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    match employee_db::get_employee_by_id(db.get_ref(), id).await {
        Ok(Some(employee)) => HttpResponse::Ok().json(to_response(db.get_ref(), employee).await),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Employee {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// PATCH /api/employees/{id} — field-by-field diff; each changed field
/// becomes a log entry in an UPDATED change log.
pub async fn update_employee(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i64>,
    body: web::Json<UpdateEmployee>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();
    let memo = input.memo.clone();

    let employee = match employee_db::get_employee_by_id(db.get_ref(), id).await {
        Ok(Some(employee)) => employee,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Employee {id} not found"),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    if let Some(email) = &input.email
        && *email != employee.email
    {
        match employee_db::email_exists(db.get_ref(), email, Some(id)).await {
            Ok(true) => {
                return HttpResponse::Conflict().json(serde_json::json!({
                    "error": format!("Employee with email {email} already exists"),
                }));
            }
            Ok(false) => {}
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Database error: {e}"),
                }));
            }
        }
    }

    match employee_db::apply_update(db.get_ref(), employee, input).await {
        Ok((updated, changes)) => {
            if !changes.is_empty()
                && let Err(e) = log_db::append_log(
                    db.get_ref(),
                    ChangeLogType::Updated,
                    &changes,
                    updated.employee_number.clone(),
                    memo,
                    client_ip(&req),
                )
                .await
            {
                tracing::error!("failed to append UPDATED change log: {e}");
            }
            HttpResponse::Ok().json(to_response(db.get_ref(), updated).await)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update employee: {e}"),
        })),
    }
}

/// DELETE /api/employees/{id} — appends a DELETED log with the full
/// before-image, then removes the row and the stored profile image.
pub async fn delete_employee(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<FileStorage>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    let employee = match employee_db::get_employee_by_id(db.get_ref(), id).await {
        Ok(Some(employee)) => employee,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Employee {id} not found"),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    let changes = employee_db::snapshot_changes(&employee, true);
    if let Err(e) = log_db::append_log(
        db.get_ref(),
        ChangeLogType::Deleted,
        &changes,
        employee.employee_number.clone(),
        Some("employee deleted".to_string()),
        client_ip(&req),
    )
    .await
    {
        tracing::error!("failed to append DELETED change log: {e}");
    }

    let profile_image_id = employee.profile_image_id;

    if let Err(e) = employee_db::delete_employee(db.get_ref(), id).await {
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to delete employee: {e}"),
        }));
    }

    // Row is gone; the stored image is removed best-effort afterwards.
    if let Some(file_id) = profile_image_id {
        match file_db::get_file_by_id(db.get_ref(), file_id).await {
            Ok(Some(file)) => {
                if let Err(e) = file_db::delete_file(db.get_ref(), file_id).await {
                    tracing::warn!("failed to delete file row {file_id}: {e}");
                }
                if let Err(e) = storage.delete(&file.file_path).await {
                    tracing::warn!("failed to delete stored file {}: {e}", file.file_path);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("failed to look up file row {file_id}: {e}"),
        }
    }

    HttpResponse::NoContent().finish()
}

/// GET /api/employees/count — optional status and hire-date range, or a
/// calendar `unit` (day/week/month/quarter/year) resolved to the
/// current period's bounds.
pub async fn count_employees(
    db: web::Data<DatabaseConnection>,
    query: web::Query<EmployeeCountQuery>,
) -> impl Responder {
    let query = query.into_inner();

    let (from_date, to_date) = match query.unit.as_deref().map(str::trim).filter(|s| !s.is_empty())
    {
        Some(unit) => match employee_db::period_bounds(unit, chrono::Utc::now().date_naive()) {
            Some((from, to)) => (Some(from), Some(to)),
            None => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Invalid unit value: {unit}"),
                }));
            }
        },
        None => (query.from_date, query.to_date),
    };

    match employee_db::count_employees(
        db.get_ref(),
        query.status.as_deref().filter(|s| !s.trim().is_empty()),
        from_date,
        to_date,
    )
    .await
    {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({ "count": count })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to count employees: {e}"),
        })),
    }
}

/// GET /api/employees/distribution — grouped counts with percentages.
pub async fn employee_distribution(
    db: web::Data<DatabaseConnection>,
    query: web::Query<DistributionQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let group_by = query.group_by.as_deref().unwrap_or("department");
    if group_by != "department" && group_by != "position" {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Invalid groupBy value: {group_by}"),
        }));
    }

    match employee_db::distribution(
        db.get_ref(),
        group_by,
        query.status.as_deref().filter(|s| !s.trim().is_empty()),
    )
    .await
    {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to compute distribution: {e}"),
        })),
    }
}
