use sea_orm::*;

use crate::models::files;

/// Insert a metadata row for bytes already written to disk.
pub async fn insert_file(
    db: &DatabaseConnection,
    file_name: String,
    content_type: Option<String>,
    size: i64,
    file_path: String,
) -> Result<files::Model, DbErr> {
    let new_file = files::ActiveModel {
        file_name: Set(file_name),
        content_type: Set(content_type),
        size: Set(size),
        file_path: Set(file_path),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_file.insert(db).await
}

/// Fetch a single file row by ID.
pub async fn get_file_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<files::Model>, DbErr> {
    files::Entity::find_by_id(id).one(db).await
}

/// Delete a file row by ID.
pub async fn delete_file(db: &DatabaseConnection, id: i64) -> Result<DeleteResult, DbErr> {
    files::Entity::delete_by_id(id).exec(db).await
}
