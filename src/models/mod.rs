pub mod change_logs;
pub mod departments;
pub mod employees;
pub mod files;

use sea_orm::ColumnTrait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, SimpleExpr};
use serde::Deserialize;

/// Offset pagination for the employee listing (the one list endpoint
/// that is page/size based rather than cursor based).
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> u64 {
        self.size.unwrap_or(30).clamp(1, 100)
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.size()
    }

    /// Lenient construction from raw query strings: non-numeric or
    /// non-positive values degrade to the defaults instead of failing
    /// deserialization.
    pub fn from_raw(page: Option<&str>, size: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| {
            raw.and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|n| *n > 0)
                .map(|n| n as u64)
        };
        Self {
            page: parse(page),
            size: parse(size),
        }
    }
}

/// Case-insensitive substring match (`ILIKE '%needle%'`) with LIKE
/// metacharacters escaped.
pub(crate) fn ilike_contains<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::col(col).ilike(format!("%{escaped}%"))
}

/// Blank query parameters are "no constraint", never an empty-string
/// match.
pub(crate) fn non_blank(raw: &Option<String>) -> Option<String> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
