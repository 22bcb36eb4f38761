use sea_orm::Condition;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, ExprTrait};
use serde::{Deserialize, Serialize};

use crate::models::{ilike_contains, non_blank};
use crate::pagination::{
    Cursor, SortDirection, SortField, SortSpec, parse_cursor_timestamp, resolve_page_size,
};

/// SeaORM entity for the `employee_change_logs` table. `changed_value`
/// holds the JSON array of per-field before/after entries.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_change_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub log_type: ChangeLogType,
    pub employee_number: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub memo: Option<String>,
    pub ip_address: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub changed_value: Json,
    pub changed_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ChangeLogType {
    #[sea_orm(string_value = "CREATED")]
    Created,
    #[sea_orm(string_value = "UPDATED")]
    Updated,
    #[sea_orm(string_value = "DELETED")]
    Deleted,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// One before/after delta inside a change log's JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub property_name: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl FieldChange {
    pub fn new(
        property_name: impl Into<String>,
        before: Option<String>,
        after: Option<String>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            before,
            after,
        }
    }
}

/// Sortable fields of the change-log listing; request parameter names
/// are `at`, `ipAddress` and `type`. Only `at` (changed_at) is
/// cursor-stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeLogSortField {
    ChangedAt,
    IpAddress,
    LogType,
}

impl SortField for ChangeLogSortField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "at" => Some(ChangeLogSortField::ChangedAt),
            "ipAddress" => Some(ChangeLogSortField::IpAddress),
            "type" => Some(ChangeLogSortField::LogType),
            _ => None,
        }
    }

    fn default_field() -> Self {
        ChangeLogSortField::ChangedAt
    }

    fn is_cursor_stable(self) -> bool {
        self == ChangeLogSortField::ChangedAt
    }
}

impl ChangeLogSortField {
    pub fn column(self) -> Column {
        match self {
            ChangeLogSortField::ChangedAt => Column::ChangedAt,
            ChangeLogSortField::IpAddress => Column::IpAddress,
            ChangeLogSortField::LogType => Column::LogType,
        }
    }
}

/// Filter intent of one change-log list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLogFilter {
    pub employee_number: Option<String>,
    pub memo: Option<String>,
    pub ip_address: Option<String>,
    pub log_type: Option<String>,
    pub at_from: Option<DateTimeUtc>,
    pub at_to: Option<DateTimeUtc>,
}

impl ChangeLogFilter {
    pub fn is_active(&self) -> bool {
        self.employee_number.is_some()
            || self.memo.is_some()
            || self.ip_address.is_some()
            || self.log_type.is_some()
            || self.at_from.is_some()
            || self.at_to.is_some()
    }

    /// AND of the active constraints. The date range is inclusive on
    /// both bounds and open-ended when one is absent; an unknown
    /// `log_type` value is compared as raw text so it matches zero rows
    /// instead of erroring.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(employee_number) = &self.employee_number {
            cond = cond.add(ilike_contains(Column::EmployeeNumber, employee_number));
        }
        if let Some(memo) = &self.memo {
            cond = cond.add(ilike_contains(Column::Memo, memo));
        }
        if let Some(ip_address) = &self.ip_address {
            cond = cond.add(ilike_contains(Column::IpAddress, ip_address));
        }
        if let Some(log_type) = &self.log_type {
            cond = cond.add(Expr::col(Column::LogType).eq(log_type.trim().to_uppercase()));
        }
        if let Some(at_from) = self.at_from {
            cond = cond.add(Column::ChangedAt.gte(at_from));
        }
        if let Some(at_to) = self.at_to {
            cond = cond.add(Column::ChangedAt.lte(at_to));
        }
        cond
    }
}

// ── DTOs ──

/// List item without the diff payload; the diff is served separately by
/// `GET /api/change-logs/{id}/diffs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub log_type: ChangeLogType,
    pub employee_number: String,
    pub memo: Option<String>,
    pub ip_address: Option<String>,
    pub changed_at: DateTimeUtc,
}

impl From<Model> for ChangeLogResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            log_type: m.log_type,
            employee_number: m.employee_number,
            memo: m.memo,
            ip_address: m.ip_address,
            changed_at: m.changed_at,
        }
    }
}

/// Raw query parameters of `GET /api/change-logs`. Everything that can
/// be malformed is carried as a string and resolved leniently.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListQuery {
    pub cursor: Option<String>,
    pub id_after: Option<String>,
    pub employee_number: Option<String>,
    pub memo: Option<String>,
    pub ip_address: Option<String>,
    #[serde(rename = "type")]
    pub log_type: Option<String>,
    pub at_from: Option<String>,
    pub at_to: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
    pub size: Option<String>,
}

impl LogListQuery {
    pub fn filter(&self) -> ChangeLogFilter {
        ChangeLogFilter {
            employee_number: non_blank(&self.employee_number),
            memo: non_blank(&self.memo),
            ip_address: non_blank(&self.ip_address),
            log_type: non_blank(&self.log_type),
            at_from: self.at_from.as_deref().and_then(parse_cursor_timestamp),
            at_to: self.at_to.as_deref().and_then(parse_cursor_timestamp),
        }
    }

    pub fn sort(&self) -> SortSpec<ChangeLogSortField> {
        SortSpec {
            field: ChangeLogSortField::parse_or_default(self.sort_field.as_deref()),
            direction: SortDirection::parse_or(self.sort_direction.as_deref(), SortDirection::Desc),
        }
    }

    pub fn cursor(&self) -> Option<Cursor> {
        let last_sort_value = parse_cursor_timestamp(self.cursor.as_deref()?)?;
        let last_id = self
            .id_after
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok());
        Some(Cursor {
            last_sort_value,
            last_id,
        })
    }

    pub fn page_size(&self) -> u64 {
        resolve_page_size(self.size.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_changed_at_desc() {
        let q = LogListQuery::default();
        let sort = q.sort();
        assert_eq!(sort.field, ChangeLogSortField::ChangedAt);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn param_names_map_to_fields() {
        assert_eq!(
            ChangeLogSortField::parse_or_default(Some("at")),
            ChangeLogSortField::ChangedAt
        );
        assert_eq!(
            ChangeLogSortField::parse_or_default(Some("ipAddress")),
            ChangeLogSortField::IpAddress
        );
        assert_eq!(
            ChangeLogSortField::parse_or_default(Some("type")),
            ChangeLogSortField::LogType
        );
        assert_eq!(
            ChangeLogSortField::parse_or_default(Some("memo")),
            ChangeLogSortField::ChangedAt
        );
    }

    #[test]
    fn blank_filters_are_inactive() {
        let q = LogListQuery {
            employee_number: Some("".into()),
            memo: Some("  ".into()),
            ..Default::default()
        };
        assert!(!q.filter().is_active());
    }

    #[test]
    fn date_bounds_parse_leniently() {
        let q = LogListQuery {
            at_from: Some("2024-06-01T00:00:00".into()),
            at_to: Some("garbage".into()),
            ..Default::default()
        };
        let filter = q.filter();
        assert!(filter.at_from.is_some());
        assert!(filter.at_to.is_none());
        assert!(filter.is_active());
    }

    #[test]
    fn field_change_serializes_with_property_name() {
        let change = FieldChange::new("name", Some("Alice".into()), Some("Alicia".into()));
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["propertyName"], "name");
        assert_eq!(json["before"], "Alice");
        assert_eq!(json["after"], "Alicia");
    }
}
