use sea_orm::Condition;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{ilike_contains, non_blank};
use crate::pagination::{
    Cursor, SortDirection, SortField, SortSpec, parse_cursor_timestamp, resolve_page_size,
};

/// SeaORM entity for the `departments` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub established_date: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employees::Entity")]
    Employees,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Sortable fields of the department listing. Only `createdAt` (the
/// entity's stable timestamp) is cursor-stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentSortField {
    Name,
    EstablishedDate,
    CreatedAt,
}

impl SortField for DepartmentSortField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(DepartmentSortField::Name),
            "establishedDate" => Some(DepartmentSortField::EstablishedDate),
            "createdAt" => Some(DepartmentSortField::CreatedAt),
            _ => None,
        }
    }

    fn default_field() -> Self {
        DepartmentSortField::Name
    }

    fn is_cursor_stable(self) -> bool {
        self == DepartmentSortField::CreatedAt
    }
}

impl DepartmentSortField {
    pub fn column(self) -> Column {
        match self {
            DepartmentSortField::Name => Column::Name,
            DepartmentSortField::EstablishedDate => Column::EstablishedDate,
            DepartmentSortField::CreatedAt => Column::CreatedAt,
        }
    }
}

/// Filter intent of one department list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentFilter {
    pub name_or_description: Option<String>,
}

impl DepartmentFilter {
    pub fn is_active(&self) -> bool {
        self.name_or_description.is_some()
    }

    /// Logical AND of the active constraints; an empty filter matches
    /// all rows. The free-text search ORs across name and description.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(query) = &self.name_or_description {
            cond = cond.add(
                Condition::any()
                    .add(ilike_contains(Column::Name, query))
                    .add(ilike_contains(Column::Description, query)),
            );
        }
        cond
    }
}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    pub name: String,
    pub description: Option<String>,
    pub established_date: Option<Date>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub established_date: Option<Date>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub established_date: Option<Date>,
    pub employee_count: u64,
    pub created_at: DateTimeUtc,
}

impl DepartmentResponse {
    pub fn from_model(m: Model, employee_count: u64) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            established_date: m.established_date,
            employee_count,
            created_at: m.created_at,
        }
    }
}

/// Raw query parameters of `GET /api/departments`. Pagination fields are
/// carried as strings so malformed values degrade to defaults instead of
/// failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentListQuery {
    pub cursor: Option<String>,
    pub id_after: Option<String>,
    pub name_or_description: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
    pub size: Option<String>,
}

impl DepartmentListQuery {
    pub fn filter(&self) -> DepartmentFilter {
        DepartmentFilter {
            name_or_description: non_blank(&self.name_or_description),
        }
    }

    pub fn sort(&self) -> SortSpec<DepartmentSortField> {
        SortSpec {
            field: DepartmentSortField::parse_or_default(self.sort_field.as_deref()),
            direction: SortDirection::parse_or(self.sort_direction.as_deref(), SortDirection::Asc),
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
    fn sort_defaults_to_name_asc() {
        let q = DepartmentListQuery::default();
        let sort = q.sort();
        assert_eq!(sort.field, DepartmentSortField::Name);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn unknown_sort_field_falls_back() {
        let q = DepartmentListQuery {
            sort_field: Some("budget".into()),
            sort_direction: Some("DESC".into()),
            ..Default::default()
        };
        let sort = q.sort();
        assert_eq!(sort.field, DepartmentSortField::Name);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn blank_search_is_no_filter() {
        let q = DepartmentListQuery {
            name_or_description: Some("   ".into()),
            ..Default::default()
        };
        assert!(!q.filter().is_active());
    }

    #[test]
    fn cursor_requires_parsable_timestamp() {
        let q = DepartmentListQuery {
            cursor: Some("not-a-timestamp".into()),
            id_after: Some("7".into()),
            ..Default::default()
        };
        assert_eq!(q.cursor(), None);

        let q = DepartmentListQuery {
            cursor: Some("2024-06-01T12:00:00Z".into()),
            id_after: Some("7".into()),
            ..Default::default()
        };
        let cursor = q.cursor().unwrap();
        assert_eq!(cursor.last_id, Some(7));
    }

    #[test]
    fn id_after_is_optional_and_lenient() {
        let q = DepartmentListQuery {
            cursor: Some("2024-06-01T12:00:00Z".into()),
            id_after: Some("seven".into()),
            ..Default::default()
        };
        assert_eq!(q.cursor().unwrap().last_id, None);
    }
}
