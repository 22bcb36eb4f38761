use chrono::{Datelike, Days, NaiveDate};
use sea_orm::*;
use std::collections::HashMap;

use crate::models::departments;
use crate::models::employees::{
    self, DistributionEntry, EmployeeFilter, EmployeeSortField, EmployeeStatus, RegisterEmployee,
    UpdateEmployee,
};
use crate::models::change_logs::FieldChange;
use crate::pagination::SortSpec;

/// Next employee number in the `EMP%03d` sequence.
pub async fn generate_employee_number(db: &DatabaseConnection) -> Result<String, DbErr> {
    let count = employees::Entity::find().count(db).await?;
    Ok(format!("EMP{:03}", count + 1))
}

/// Check for an email collision, optionally ignoring one employee.
pub async fn email_exists(
    db: &DatabaseConnection,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<bool, DbErr> {
    let mut query = employees::Entity::find().filter(employees::Column::Email.eq(email));
    if let Some(id) = exclude_id {
        query = query.filter(employees::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Insert a new employee as ACTIVE.
pub async fn insert_employee(
    db: &DatabaseConnection,
    input: RegisterEmployee,
    employee_number: String,
) -> Result<employees::Model, DbErr> {
    let new_employee = employees::ActiveModel {
        employee_number: Set(employee_number),
        name: Set(input.name),
        email: Set(input.email),
        department_id: Set(input.department_id),
        position: Set(input.position),
        hire_date: Set(input.hire_date),
        status: Set(EmployeeStatus::Active),
        profile_image_id: Set(input.profile_image_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_employee.insert(db).await
}

/// Fetch a single employee by ID.
pub async fn get_employee_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<employees::Model>, DbErr> {
    employees::Entity::find_by_id(id).one(db).await
}

/// Offset-paged listing with filters; returns the page and the filtered
/// total.
pub async fn find_page_offset(
    db: &DatabaseConnection,
    filter: &EmployeeFilter,
    sort: SortSpec<EmployeeSortField>,
    offset: u64,
    limit: u64,
) -> Result<(Vec<employees::Model>, u64), DbErr> {
    let condition = filter.condition();

    let total = employees::Entity::find()
        .filter(condition.clone())
        .count(db)
        .await?;

    let rows = employees::Entity::find()
        .filter(condition)
        .order_by(sort.field.column(), sort.direction.order())
        .order_by_asc(employees::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;

    Ok((rows, total))
}

/// The full before-image of an employee as change-log entries, used for
/// CREATED (before = None) and DELETED (after = None) logs.
pub fn snapshot_changes(employee: &employees::Model, deleted: bool) -> Vec<FieldChange> {
    let fields = [
        ("hireDate", employee.hire_date.map(|d| d.to_string())),
        ("name", Some(employee.name.clone())),
        ("position", employee.position.clone()),
        ("department", employee.department_id.map(|id| id.to_string())),
        ("email", Some(employee.email.clone())),
        ("status", Some(employee.status.as_str().to_string())),
    ];

    fields
        .into_iter()
        .map(|(property, value)| {
            if deleted {
                FieldChange::new(property, value, None)
            } else {
                FieldChange::new(property, None, value)
            }
        })
        .collect()
}

/// Apply a partial update, returning the saved model and one
/// [`FieldChange`] per field that actually changed. An empty vec means
/// nothing differed.
pub async fn apply_update(
    db: &DatabaseConnection,
    employee: employees::Model,
    input: UpdateEmployee,
) -> Result<(employees::Model, Vec<FieldChange>), DbErr> {
    let mut changes = Vec::new();
    let mut active: employees::ActiveModel = employee.clone().into();

    if let Some(name) = input.name
        && name != employee.name
    {
        changes.push(FieldChange::new(
            "name",
            Some(employee.name.clone()),
            Some(name.clone()),
        ));
        active.name = Set(name);
    }

    if let Some(email) = input.email
        && email != employee.email
    {
        changes.push(FieldChange::new(
            "email",
            Some(employee.email.clone()),
            Some(email.clone()),
        ));
        active.email = Set(email);
    }

    if let Some(department_id) = input.department_id
        && Some(department_id) != employee.department_id
    {
        changes.push(FieldChange::new(
            "department",
            employee.department_id.map(|id| id.to_string()),
            Some(department_id.to_string()),
        ));
        active.department_id = Set(Some(department_id));
    }

    if let Some(position) = input.position
        && Some(&position) != employee.position.as_ref()
    {
        changes.push(FieldChange::new(
            "position",
            employee.position.clone(),
            Some(position.clone()),
        ));
        active.position = Set(Some(position));
    }

    if let Some(hire_date) = input.hire_date
        && Some(hire_date) != employee.hire_date
    {
        changes.push(FieldChange::new(
            "hireDate",
            employee.hire_date.map(|d| d.to_string()),
            Some(hire_date.to_string()),
        ));
        active.hire_date = Set(Some(hire_date));
    }

    if let Some(status) = input.status
        && status != employee.status
    {
        changes.push(FieldChange::new(
            "status",
            Some(employee.status.as_str().to_string()),
            Some(status.as_str().to_string()),
        ));
        active.status = Set(status);
    }

    if let Some(profile_image_id) = input.profile_image_id
        && Some(profile_image_id) != employee.profile_image_id
    {
        changes.push(FieldChange::new(
            "profileImage",
            employee.profile_image_id.map(|id| id.to_string()),
            Some(profile_image_id.to_string()),
        ));
        active.profile_image_id = Set(Some(profile_image_id));
    }

    if changes.is_empty() {
        return Ok((employee, changes));
    }

    let updated = active.update(db).await?;
    Ok((updated, changes))
}

/// Delete an employee row.
pub async fn delete_employee(db: &DatabaseConnection, id: i64) -> Result<DeleteResult, DbErr> {
    employees::Entity::delete_by_id(id).exec(db).await
}

/// Count employees with optional status and hire-date range (inclusive
/// bounds, open-ended when one is absent).
pub async fn count_employees(
    db: &DatabaseConnection,
    status: Option<&str>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
) -> Result<u64, DbErr> {
    let mut query = employees::Entity::find();
    if let Some(status) = status {
        query = query.filter(
            sea_orm::sea_query::Expr::col(employees::Column::Status)
                .eq(status.trim().to_uppercase()),
        );
    }
    if let Some(from) = from_date {
        query = query.filter(employees::Column::HireDate.gte(from));
    }
    if let Some(to) = to_date {
        query = query.filter(employees::Column::HireDate.lte(to));
    }
    query.count(db).await
}

/// Inclusive hire-date bounds for the calendar period containing
/// `today`. Weeks start on Monday, quarters on the usual calendar
/// boundaries. Returns `None` for an unknown unit.
pub fn period_bounds(unit: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match unit.trim().to_ascii_lowercase().as_str() {
        "day" => Some((today, today)),
        "week" => {
            let monday = today - Days::new(today.weekday().num_days_from_monday() as u64);
            Some((monday, monday + Days::new(6)))
        }
        "month" => {
            let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
            let next = if today.month() == 12 {
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)?
            };
            Some((first, next - Days::new(1)))
        }
        "quarter" => {
            let start_month = ((today.month() - 1) / 3) * 3 + 1;
            let first = NaiveDate::from_ymd_opt(today.year(), start_month, 1)?;
            let next = if start_month == 10 {
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(today.year(), start_month + 3, 1)?
            };
            Some((first, next - Days::new(1)))
        }
        "year" => Some((
            NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
        )),
        _ => None,
    }
}

/// Grouped employee counts (by department name or position) with the
/// share of the filtered total, rounded to two decimals.
pub async fn distribution(
    db: &DatabaseConnection,
    group_by: &str,
    status: Option<&str>,
) -> Result<Vec<DistributionEntry>, DbErr> {
    let mut query = employees::Entity::find();
    if let Some(status) = status {
        query = query.filter(
            sea_orm::sea_query::Expr::col(employees::Column::Status)
                .eq(status.trim().to_uppercase()),
        );
    }
    let rows = query.all(db).await?;
    let total = rows.len() as u64;

    let department_names: HashMap<i64, String> = if group_by == "department" {
        departments::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect()
    } else {
        HashMap::new()
    };

    let mut counts: HashMap<String, u64> = HashMap::new();
    for employee in rows {
        let key = match group_by {
            "department" => employee
                .department_id
                .and_then(|id| department_names.get(&id).cloned())
                .unwrap_or_else(|| "unassigned".to_string()),
            _ => employee
                .position
                .clone()
                .unwrap_or_else(|| "unspecified".to_string()),
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut entries: Vec<DistributionEntry> = counts
        .into_iter()
        .map(|(group_key, count)| {
            let percentage = if total == 0 {
                0.0
            } else {
                (count as f64 / total as f64) * 100.0
            };
            DistributionEntry {
                group_key,
                count,
                percentage: (percentage * 100.0).round() / 100.0,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.group_key.cmp(&b.group_key)));

    Ok(entries)
}
