use chrono::{DateTime, NaiveDateTime, Utc};

use crate::pagination::sort::{SortField, SortSpec};

/// Position after which the next page continues: the sort value and id of
/// the last row on the previous page.
///
/// The id is optional because the request contract only requires the
/// timestamp (`cursor`); when the client also echoes `idAfter` back the
/// keyset comparison is exact on the `(sort_value, id)` pair, otherwise
/// it degrades to the strict timestamp inequality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub last_sort_value: DateTime<Utc>,
    pub last_id: Option<i64>,
}

/// Why a client-supplied cursor was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// The requested sort field is not the entity's stable timestamp
    /// field, so a timestamp cursor has no meaning for this ordering.
    UnstableSortField,
    /// The sort direction differs from the one the cursor was issued
    /// under.
    DirectionChanged,
    /// A free-text or range filter is active; the filtered result set is
    /// not guaranteed to preserve the window the cursor refers to.
    ActiveFilter,
}

/// The cursor-validity decision table, as a pure function.
///
/// `issued_under` is the sort spec in effect when the cursor was issued,
/// when the caller knows it. HTTP call sites pass `None` (a bare
/// timestamp cursor does not carry it); the direction rule then passes
/// vacuously, which is safe because an unstable field or active filter
/// already forces a reset.
pub fn reset_reason<F: SortField>(
    sort: &SortSpec<F>,
    filter_active: bool,
    issued_under: Option<&SortSpec<F>>,
) -> Option<ResetReason> {
    if !sort.field.is_cursor_stable() {
        return Some(ResetReason::UnstableSortField);
    }
    if let Some(prev) = issued_under
        && prev.direction != sort.direction
    {
        return Some(ResetReason::DirectionChanged);
    }
    if filter_active {
        return Some(ResetReason::ActiveFilter);
    }
    None
}

/// Decide whether `cursor` may be used for a fetch shaped by `sort` and
/// the filter. `None` means first-page semantics.
pub fn effective_cursor<F: SortField>(
    cursor: Option<Cursor>,
    sort: &SortSpec<F>,
    filter_active: bool,
    issued_under: Option<&SortSpec<F>>,
) -> Option<Cursor> {
    let cursor = cursor?;
    match reset_reason(sort, filter_active, issued_under) {
        Some(reason) => {
            tracing::debug!(?reason, "discarding client cursor");
            None
        }
        None => Some(cursor),
    }
}

/// Lenient ISO-8601 parsing for the `cursor` / `atFrom` / `atTo`
/// parameters: RFC 3339 first, then a naive datetime taken as UTC.
/// Unparsable input means "no value", never an error.
pub fn parse_cursor_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
