use sea_orm::entity::prelude::Json;
use sea_orm::*;

use crate::models::change_logs::{
    self, ChangeLogFilter, ChangeLogSortField, ChangeLogType, FieldChange,
};
use crate::pagination::{Cursor, SortSpec, apply_window};

/// Append one change-log row; the field deltas are stored as a JSON
/// array in `changed_value`.
pub async fn append_log(
    db: &DatabaseConnection,
    log_type: ChangeLogType,
    changes: &[FieldChange],
    employee_number: String,
    memo: Option<String>,
    ip_address: Option<String>,
) -> Result<change_logs::Model, DbErr> {
    let changed_value =
        serde_json::to_value(changes).map_err(|e| DbErr::Custom(e.to_string()))?;

    let new_log = change_logs::ActiveModel {
        log_type: Set(log_type),
        employee_number: Set(employee_number),
        memo: Set(memo),
        ip_address: Set(ip_address),
        changed_value: Set(changed_value),
        changed_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_log.insert(db).await
}

/// Windowed keyset fetch plus a count over the same filter, cursor bound
/// excluded from the count (the total may drift under concurrent
/// writes).
pub async fn find_page(
    db: &DatabaseConnection,
    filter: &ChangeLogFilter,
    sort: SortSpec<ChangeLogSortField>,
    cursor: Option<Cursor>,
    page_size: u64,
) -> Result<(Vec<change_logs::Model>, u64), DbErr> {
    let condition = filter.condition();

    let total = change_logs::Entity::find()
        .filter(condition.clone())
        .count(db)
        .await?;

    let query = change_logs::Entity::find().filter(condition);
    let rows = apply_window(
        query,
        sort.field.column(),
        change_logs::Column::Id,
        sort.direction,
        cursor.as_ref(),
        page_size,
    )
    .all(db)
    .await?;

    Ok((rows, total))
}

/// The stored JSON diff of one log row.
pub async fn get_log_diffs(db: &DatabaseConnection, id: i64) -> Result<Option<Json>, DbErr> {
    Ok(change_logs::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(|log| log.changed_value))
}

/// Total number of change-log rows.
pub async fn count_logs(db: &DatabaseConnection) -> Result<u64, DbErr> {
    change_logs::Entity::find().count(db).await
}
