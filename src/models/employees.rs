use sea_orm::Condition;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, ExprTrait};
use serde::{Deserialize, Serialize};

use crate::models::{ilike_contains, non_blank};
use crate::pagination::{SortDirection, SortField, SortSpec};

/// SeaORM entity for the `employees` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub employee_number: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub department_id: Option<i64>,
    pub position: Option<String>,
    pub hire_date: Option<Date>,
    pub status: EmployeeStatus,
    pub profile_image_id: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EmployeeStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "ON_LEAVE")]
    OnLeave,
    #[sea_orm(string_value = "RESIGNED")]
    Resigned,
}

impl EmployeeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "ACTIVE",
            EmployeeStatus::OnLeave => "ON_LEAVE",
            EmployeeStatus::Resigned => "RESIGNED",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DepartmentId",
        to = "super::departments::Column::Id"
    )]
    Department,
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Sortable fields of the employee listing (offset paged, no cursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSortField {
    Name,
    HireDate,
    EmployeeNumber,
    CreatedAt,
}

impl SortField for EmployeeSortField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(EmployeeSortField::Name),
            "hireDate" => Some(EmployeeSortField::HireDate),
            "employeeNumber" => Some(EmployeeSortField::EmployeeNumber),
            "createdAt" => Some(EmployeeSortField::CreatedAt),
            _ => None,
        }
    }

    fn default_field() -> Self {
        EmployeeSortField::Name
    }

    fn is_cursor_stable(self) -> bool {
        self == EmployeeSortField::CreatedAt
    }
}

impl EmployeeSortField {
    pub fn column(self) -> Column {
        match self {
            EmployeeSortField::Name => Column::Name,
            EmployeeSortField::HireDate => Column::HireDate,
            EmployeeSortField::EmployeeNumber => Column::EmployeeNumber,
            EmployeeSortField::CreatedAt => Column::CreatedAt,
        }
    }
}

/// Filter intent of one employee list request.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub name_or_email: Option<String>,
    pub department_id: Option<i64>,
    pub position: Option<String>,
    pub status: Option<String>,
}

impl EmployeeFilter {
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(query) = &self.name_or_email {
            cond = cond.add(
                Condition::any()
                    .add(ilike_contains(Column::Name, query))
                    .add(ilike_contains(Column::Email, query)),
            );
        }
        if let Some(department_id) = self.department_id {
            cond = cond.add(Column::DepartmentId.eq(department_id));
        }
        if let Some(position) = &self.position {
            cond = cond.add(ilike_contains(Column::Position, position));
        }
        if let Some(status) = &self.status {
            // Raw text comparison: an unknown status yields zero matches
            // instead of a parse error.
            cond = cond.add(Expr::col(Column::Status).eq(status.trim().to_uppercase()));
        }
        cond
    }
}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEmployee {
    pub name: String,
    pub email: String,
    pub department_id: Option<i64>,
    pub position: Option<String>,
    pub hire_date: Option<Date>,
    pub profile_image_id: Option<i64>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department_id: Option<i64>,
    pub position: Option<String>,
    pub hire_date: Option<Date>,
    pub status: Option<EmployeeStatus>,
    pub profile_image_id: Option<i64>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i64,
    pub employee_number: String,
    pub name: String,
    pub email: String,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<Date>,
    pub status: EmployeeStatus,
    pub profile_image_id: Option<i64>,
    pub created_at: DateTimeUtc,
}

impl EmployeeResponse {
    pub fn from_model(m: Model, department_name: Option<String>) -> Self {
        Self {
            id: m.id,
            employee_number: m.employee_number,
            name: m.name,
            email: m.email,
            department_id: m.department_id,
            department_name,
            position: m.position,
            hire_date: m.hire_date,
            status: m.status,
            profile_image_id: m.profile_image_id,
            created_at: m.created_at,
        }
    }
}

/// Raw query parameters of `GET /api/employees`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub name_or_email: Option<String>,
    pub department_id: Option<i64>,
    pub position: Option<String>,
    pub status: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
}

impl EmployeeListQuery {
    /// Paging parameters arrive as raw strings so that garbage like
    /// `?size=abc` degrades to the defaults instead of failing query
    /// deserialization with a 400.
    pub fn paging(&self) -> super::PaginationQuery {
        super::PaginationQuery::from_raw(self.page.as_deref(), self.size.as_deref())
    }

    pub fn filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            name_or_email: non_blank(&self.name_or_email),
            department_id: self.department_id,
            position: non_blank(&self.position),
            status: non_blank(&self.status),
        }
    }

    pub fn sort(&self) -> SortSpec<EmployeeSortField> {
        SortSpec {
            field: EmployeeSortField::parse_or_default(self.sort_field.as_deref()),
            direction: SortDirection::parse_or(self.sort_direction.as_deref(), SortDirection::Asc),
        }
    }
}

/// Query parameters of `GET /api/employees/count`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCountQuery {
    pub status: Option<String>,
    pub from_date: Option<Date>,
    pub to_date: Option<Date>,
    /// Calendar period shortcut: `day`, `week`, `month`, `quarter` or
    /// `year`. When present it overrides `fromDate`/`toDate`.
    pub unit: Option<String>,
}

/// Query parameters of `GET /api/employees/distribution`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionQuery {
    pub group_by: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub group_key: String,
    pub count: u64,
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_paging_tolerates_garbage_page_and_size() {
        let q = EmployeeListQuery {
            page: Some("abc".into()),
            size: Some("xyz".into()),
            ..Default::default()
        };
        let paging = q.paging();
        assert_eq!(paging.page(), 1);
        assert_eq!(paging.size(), 30);

        let q = EmployeeListQuery {
            page: Some("0".into()),
            size: Some("-7".into()),
            ..Default::default()
        };
        let paging = q.paging();
        assert_eq!(paging.page(), 1);
        assert_eq!(paging.size(), 30);
    }

    #[test]
    fn listing_paging_parses_valid_values() {
        let q = EmployeeListQuery {
            page: Some(" 3 ".into()),
            size: Some("10".into()),
            ..Default::default()
        };
        let paging = q.paging();
        assert_eq!(paging.page(), 3);
        assert_eq!(paging.size(), 10);
        assert_eq!(paging.offset(), 20);
    }
}
