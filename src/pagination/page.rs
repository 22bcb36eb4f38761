use chrono::{DateTime, Utc};
use serde::Serialize;

/// Page size used when the `size` parameter is absent, unparsable, or
/// not a positive integer.
pub const DEFAULT_PAGE_SIZE: u64 = 30;

/// Lenient `size` resolution. Malformed pagination input degrades to the
/// default instead of erroring.
pub fn resolve_page_size(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as u64)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// The externally visible page envelope shared by the cursor-paged list
/// endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPageResponse<T> {
    pub content: Vec<T>,
    pub next_cursor: Option<DateTime<Utc>>,
    pub next_id_after: Option<i64>,
    pub size: usize,
    pub has_next: bool,
    pub total_elements: u64,
}

impl<T> CursorPageResponse<T> {
    /// Turn a windowed fetch result (at most `page_size + 1` rows) into
    /// the response envelope.
    ///
    /// The overflow row, if present, only signals `has_next` and is
    /// dropped; `next_cursor`/`next_id_after` derive from the last
    /// *retained* row via `key`, and are null on the final page.
    pub fn assemble(
        mut rows: Vec<T>,
        page_size: u64,
        total_elements: u64,
        key: impl Fn(&T) -> (DateTime<Utc>, i64),
    ) -> Self {
        let has_next = rows.len() as u64 > page_size;
        if has_next {
            rows.truncate(page_size as usize);
        }

        let (next_cursor, next_id_after) = match rows.last() {
            Some(last) if has_next => {
                let (cursor, id) = key(last);
                (Some(cursor), Some(id))
            }
            _ => (None, None),
        };

        CursorPageResponse {
            size: rows.len(),
            content: rows,
            next_cursor,
            next_id_after,
            has_next,
            total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        created_at: DateTime<Utc>,
    }

    fn row(id: i64, ts: &str) -> Row {
        Row {
            id,
            created_at: ts.parse().unwrap(),
        }
    }

    fn key(r: &Row) -> (DateTime<Utc>, i64) {
        (r.created_at, r.id)
    }

    #[test]
    fn overflow_row_is_dropped_and_cursor_comes_from_last_retained() {
        let rows = vec![
            row(3, "2024-06-03T00:00:00Z"),
            row(2, "2024-06-02T00:00:00Z"),
            row(1, "2024-06-01T00:00:00Z"),
        ];
        let page = CursorPageResponse::assemble(rows, 2, 3, key);

        assert_eq!(page.size, 2);
        assert_eq!(page.content.len(), 2);
        assert!(page.has_next);
        assert_eq!(page.next_cursor, Some("2024-06-02T00:00:00Z".parse().unwrap()));
        assert_eq!(page.next_id_after, Some(2));
        assert_eq!(page.total_elements, 3);
    }

    #[test]
    fn short_page_has_no_next_and_no_cursor() {
        let rows = vec![row(1, "2024-06-01T00:00:00Z")];
        let page = CursorPageResponse::assemble(rows, 2, 3, key);

        assert_eq!(page.size, 1);
        assert!(!page.has_next);
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.next_id_after, None);
    }

    #[test]
    fn exactly_full_page_without_overflow_is_the_last_page() {
        let rows = vec![
            row(2, "2024-06-02T00:00:00Z"),
            row(1, "2024-06-01T00:00:00Z"),
        ];
        let page = CursorPageResponse::assemble(rows, 2, 2, key);

        assert_eq!(page.size, 2);
        assert!(!page.has_next);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn empty_page() {
        let page = CursorPageResponse::assemble(Vec::<Row>::new(), 30, 0, key);

        assert_eq!(page.size, 0);
        assert!(page.content.is_empty());
        assert!(!page.has_next);
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.next_id_after, None);
        assert_eq!(page.total_elements, 0);
    }

    #[test]
    fn size_resolution_falls_back_to_thirty() {
        assert_eq!(resolve_page_size(None), 30);
        assert_eq!(resolve_page_size(Some("abc")), 30);
        assert_eq!(resolve_page_size(Some("0")), 30);
        assert_eq!(resolve_page_size(Some("-3")), 30);
        assert_eq!(resolve_page_size(Some(" 15 ")), 15);
    }
}
