use actix_web::{HttpResponse, Responder, web};
use sea_orm::{DatabaseConnection, DbErr};

use crate::db::departments as department_db;
use crate::models::departments::{
    CreateDepartment, DepartmentListQuery, DepartmentResponse, UpdateDepartment,
};
use crate::pagination::{CursorPageResponse, effective_cursor};

/// GET /api/departments — cursor-paged department listing.
pub async fn list_departments(
    db: web::Data<DatabaseConnection>,
    query: web::Query<DepartmentListQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let filter = query.filter();
    let sort = query.sort();
    let page_size = query.page_size();
    let cursor = effective_cursor(query.cursor(), &sort, filter.is_active(), None);

    let (rows, total) =
        match department_db::find_page(db.get_ref(), &filter, sort, cursor, page_size).await {
            Ok(result) => result,
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Failed to fetch departments: {e}"),
                }));
            }
        };

    let ids: Vec<i64> = rows.iter().map(|d| d.id).collect();
    let counts = match department_db::count_employees_for(db.get_ref(), ids).await {
        Ok(counts) => counts,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to count employees: {e}"),
            }));
        }
    };

    let content: Vec<DepartmentResponse> = rows
        .into_iter()
        .map(|m| {
            let employee_count = counts.get(&m.id).copied().unwrap_or(0);
            DepartmentResponse::from_model(m, employee_count)
        })
        .collect();

    let page =
        CursorPageResponse::assemble(content, page_size, total, |d| (d.created_at, d.id));
    HttpResponse::Ok().json(page)
}

/// POST /api/departments — create a department; duplicate name is 409.
pub async fn create_department(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateDepartment>,
) -> impl Responder {
    let input = body.into_inner();

    match department_db::name_exists(db.get_ref(), &input.name, None).await {
        Ok(true) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": format!("Department with name {} already exists", input.name),
            }));
        }
        Ok(false) => {}
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    }

    match department_db::insert_department(db.get_ref(), input).await {
        Ok(department) => {
            HttpResponse::Created().json(DepartmentResponse::from_model(department, 0))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create department: {e}"),
        })),
    }
}

/// GET /api/departments/{id} — single department with employee count.
pub async fn get_department(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    match department_db::get_department_by_id(db.get_ref(), id).await {
        Ok(Some(department)) => {
            match department_db::count_employees_in(db.get_ref(), id).await {
                Ok(count) => HttpResponse::Ok().json(DepartmentResponse::from_model(department, count)),
                Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Failed to count employees: {e}"),
                })),
            }
        }
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Department {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// PATCH /api/departments/{id} — partial update; renaming onto an
/// existing name is 409.
pub async fn update_department(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i64>,
    body: web::Json<UpdateDepartment>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();

    if let Some(name) = &input.name {
        match department_db::name_exists(db.get_ref(), name, Some(id)).await {
            Ok(true) => {
                return HttpResponse::Conflict().json(serde_json::json!({
                    "error": format!("Department with name {name} already exists"),
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

    match department_db::update_department(db.get_ref(), id, input).await {
        Ok(department) => {
            let count = department_db::count_employees_in(db.get_ref(), id)
                .await
                .unwrap_or(0);
            HttpResponse::Ok().json(DepartmentResponse::from_model(department, count))
        }
        Err(DbErr::RecordNotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Department {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update department: {e}"),
        })),
    }
}

/// DELETE /api/departments/{id} — refused with 409 while employees are
/// still assigned.
pub async fn delete_department(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match department_db::count_employees_in(db.get_ref(), id).await {
        Ok(0) => {}
        Ok(_) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "Cannot delete department with existing employees",
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    }

    match department_db::delete_department(db.get_ref(), id).await {
        Ok(result) => {
            if result.rows_affected > 0 {
                HttpResponse::NoContent().finish()
            } else {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": format!("Department {id} not found"),
                }))
            }
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to delete department: {e}"),
        })),
    }
}
