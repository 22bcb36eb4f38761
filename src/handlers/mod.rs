pub mod change_logs;
pub mod departments;
pub mod employees;
pub mod files;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Department routes ──
    cfg.service(
        web::scope("/departments")
            .route("", web::get().to(departments::list_departments))
            .route("", web::post().to(departments::create_department))
            .route("/{id}", web::get().to(departments::get_department))
            .route("/{id}", web::patch().to(departments::update_department))
            .route("/{id}", web::delete().to(departments::delete_department)),
    );

    // ── Employee routes (count/distribution before the {id} matcher) ──
    cfg.service(
        web::scope("/employees")
            .route("", web::get().to(employees::list_employees))
            .route("", web::post().to(employees::register_employee))
            .route("/count", web::get().to(employees::count_employees))
            .route("/distribution", web::get().to(employees::employee_distribution))
            .route("/{id}", web::get().to(employees::get_employee))
            .route("/{id}", web::patch().to(employees::update_employee))
            .route("/{id}", web::delete().to(employees::delete_employee)),
    );

    // ── Change-log routes (read-only; logs are written by the employee handlers) ──
    cfg.service(
        web::scope("/change-logs")
            .route("", web::get().to(change_logs::list_change_logs))
            .route("/count", web::get().to(change_logs::count_change_logs))
            .route("/{id}/diffs", web::get().to(change_logs::get_log_diffs)),
    );

    // ── File routes ──
    cfg.service(
        web::scope("/files")
            .route("", web::post().to(files::upload_file))
            .route("/{id}/download", web::get().to(files::download_file)),
    );
}
