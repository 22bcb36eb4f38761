use sea_orm::*;
use std::collections::HashMap;

use crate::models::departments::{
    self, CreateDepartment, DepartmentFilter, DepartmentSortField, UpdateDepartment,
};
use crate::models::employees;
use crate::pagination::{Cursor, SortSpec, apply_window};

/// Insert a new department.
pub async fn insert_department(
    db: &DatabaseConnection,
    input: CreateDepartment,
) -> Result<departments::Model, DbErr> {
    let new_department = departments::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        established_date: Set(input.established_date),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_department.insert(db).await
}

/// Fetch a single department by ID.
pub async fn get_department_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<departments::Model>, DbErr> {
    departments::Entity::find_by_id(id).one(db).await
}

/// Check for a name collision, optionally ignoring one department
/// (used when renaming).
pub async fn name_exists(
    db: &DatabaseConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, DbErr> {
    let mut query = departments::Entity::find().filter(departments::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(departments::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Windowed keyset fetch plus a count over the same filter.
///
/// Returns up to `page_size + 1` rows ordered by `(sort field, id ASC)`;
/// the count ignores the cursor bound. The two queries are independent
/// round trips, so the total may drift under concurrent writes.
pub async fn find_page(
    db: &DatabaseConnection,
    filter: &DepartmentFilter,
    sort: SortSpec<DepartmentSortField>,
    cursor: Option<Cursor>,
    page_size: u64,
) -> Result<(Vec<departments::Model>, u64), DbErr> {
    let condition = filter.condition();

    let total = departments::Entity::find()
        .filter(condition.clone())
        .count(db)
        .await?;

    let query = departments::Entity::find().filter(condition);
    let rows = apply_window(
        query,
        sort.field.column(),
        departments::Column::Id,
        sort.direction,
        cursor.as_ref(),
        page_size,
    )
    .all(db)
    .await?;

    Ok((rows, total))
}

/// Update a department's fields.
pub async fn update_department(
    db: &DatabaseConnection,
    id: i64,
    input: UpdateDepartment,
) -> Result<departments::Model, DbErr> {
    let department = departments::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Department not found".to_string()))?;

    let mut active: departments::ActiveModel = department.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(established_date) = input.established_date {
        active.established_date = Set(Some(established_date));
    }

    active.update(db).await
}

/// Delete a department by ID.
pub async fn delete_department(db: &DatabaseConnection, id: i64) -> Result<DeleteResult, DbErr> {
    departments::Entity::delete_by_id(id).exec(db).await
}

/// Count employees assigned to one department.
pub async fn count_employees_in(db: &DatabaseConnection, department_id: i64) -> Result<u64, DbErr> {
    employees::Entity::find()
        .filter(employees::Column::DepartmentId.eq(department_id))
        .count(db)
        .await
}

/// Count employees for many departments in one query and return a
/// department_id -> count map.
pub async fn count_employees_for(
    db: &DatabaseConnection,
    department_ids: Vec<i64>,
) -> Result<HashMap<i64, u64>, DbErr> {
    if department_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let members = employees::Entity::find()
        .filter(employees::Column::DepartmentId.is_in(department_ids))
        .all(db)
        .await?;

    let mut counts: HashMap<i64, u64> = HashMap::new();
    for employee in members {
        if let Some(department_id) = employee.department_id {
            *counts.entry(department_id).or_insert(0) += 1;
        }
    }

    Ok(counts)
}

/// Department names for many ids in one query (used to decorate
/// employee responses).
pub async fn names_for(
    db: &DatabaseConnection,
    department_ids: Vec<i64>,
) -> Result<HashMap<i64, String>, DbErr> {
    if department_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = departments::Entity::find()
        .filter(departments::Column::Id.is_in(department_ids))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|d| (d.id, d.name)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::SortDirection;

    fn sql(select: Select<departments::Entity>) -> String {
        select.build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn window_orders_by_sort_field_then_id_ascending() {
        let sort = SortSpec {
            field: DepartmentSortField::Name,
            direction: SortDirection::Asc,
        };
        let query = apply_window(
            departments::Entity::find().filter(DepartmentFilter::default().condition()),
            sort.field.column(),
            departments::Column::Id,
            sort.direction,
            None,
            30,
        );
        let sql = sql(query);
        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains("\"name\" ASC"));
        assert!(sql.contains("\"id\" ASC"));
        assert!(sql.contains("LIMIT 31"));
    }

    #[test]
    fn id_tiebreak_stays_ascending_under_descending_sort() {
        let query = apply_window(
            departments::Entity::find(),
            departments::Column::CreatedAt,
            departments::Column::Id,
            SortDirection::Desc,
            None,
            2,
        );
        let sql = sql(query);
        assert!(sql.contains("\"created_at\" DESC"));
        assert!(sql.contains("\"id\" ASC"));
        assert!(sql.contains("LIMIT 3"));
    }

    #[test]
    fn cursor_with_id_builds_lexicographic_pair_predicate() {
        let cursor = Cursor {
            last_sort_value: "2024-06-02T00:00:00Z".parse().unwrap(),
            last_id: Some(2),
        };
        let query = apply_window(
            departments::Entity::find(),
            departments::Column::CreatedAt,
            departments::Column::Id,
            SortDirection::Desc,
            Some(&cursor),
            2,
        );
        let sql = sql(query);
        assert!(sql.contains("\"created_at\" <"));
        assert!(sql.contains("\"created_at\" ="));
        assert!(sql.contains("\"id\" > 2"));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn cursor_without_id_uses_strict_inequality_only() {
        let cursor = Cursor {
            last_sort_value: "2024-06-02T00:00:00Z".parse().unwrap(),
            last_id: None,
        };
        let query = apply_window(
            departments::Entity::find(),
            departments::Column::CreatedAt,
            departments::Column::Id,
            SortDirection::Asc,
            Some(&cursor),
            2,
        );
        let sql = sql(query);
        assert!(sql.contains("\"created_at\" >"));
        assert!(!sql.contains(" OR "));
    }

    #[test]
    fn free_text_filter_ors_name_and_description_case_insensitively() {
        let filter = DepartmentFilter {
            name_or_description: Some("eng".into()),
        };
        let sql = sql(departments::Entity::find().filter(filter.condition()));
        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("%eng%"));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        let filter = DepartmentFilter {
            name_or_description: Some("100%_done".into()),
        };
        let sql = sql(departments::Entity::find().filter(filter.condition()));
        assert!(sql.contains("\\%"));
        assert!(sql.contains("\\_"));
    }

    #[test]
    fn empty_filter_adds_no_predicates() {
        let sql = sql(departments::Entity::find().filter(DepartmentFilter::default().condition()));
        assert!(!sql.contains("ILIKE"));
    }
}
