use sea_orm::Order;

/// Sort direction for a list request. Parsed leniently: anything that is
/// not `asc`/`desc` (case-insensitive) falls back to the per-entity
/// default supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse_or(raw: Option<&str>, default: SortDirection) -> SortDirection {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(s) if s.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => default,
        }
    }

    pub fn order(self) -> Order {
        match self {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Allow-listed sortable fields of an entity. Unknown field names fall
/// back to [`SortField::default_field`]; only the entity's natural
/// timestamp field is *cursor-stable*, i.e. a timestamp cursor can be
/// honored while sorting by it.
pub trait SortField: Copy + Eq {
    fn parse(raw: &str) -> Option<Self>;

    fn default_field() -> Self;

    fn is_cursor_stable(self) -> bool;

    fn parse_or_default(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(Self::parse)
            .unwrap_or_else(Self::default_field)
    }
}

/// The full ordering intent of one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F: SortField> {
    pub field: F,
    pub direction: SortDirection,
}
