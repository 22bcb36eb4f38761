//! Integration tests for the cursor-paging pipeline: query-parameter
//! resolution, cursor invalidation, windowed-walk semantics, and
//! envelope assembly. No running server or database is needed; the walk
//! is driven over an in-memory dataset with the same `(sort_value, id)`
//! comparison the keyset predicate issues against the store.
//!
//! Run with: `cargo test --test pagination_test`

use chrono::{DateTime, Utc};

use hrbank_backend::models::change_logs::LogListQuery;
use hrbank_backend::models::departments::DepartmentListQuery;
use hrbank_backend::pagination::{Cursor, CursorPageResponse, SortDirection, effective_cursor};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
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

/// Order rows the way the executor does: primary field in the requested
/// direction, id ascending as the tie-breaker.
fn sorted(mut rows: Vec<Row>, direction: SortDirection) -> Vec<Row> {
    rows.sort_by(|a, b| {
        let primary = match direction {
            SortDirection::Asc => a.created_at.cmp(&b.created_at),
            SortDirection::Desc => b.created_at.cmp(&a.created_at),
        };
        primary.then(a.id.cmp(&b.id))
    });
    rows
}

/// The keyset predicate evaluated in memory: strictly-after on the
/// `(sort_value, id)` pair, or on the sort value alone when the cursor
/// carries no id.
fn after_cursor(r: &Row, cursor: &Cursor, direction: SortDirection) -> bool {
    let strict = match direction {
        SortDirection::Asc => r.created_at > cursor.last_sort_value,
        SortDirection::Desc => r.created_at < cursor.last_sort_value,
    };
    match cursor.last_id {
        Some(last_id) => {
            strict || (r.created_at == cursor.last_sort_value && r.id > last_id)
        }
        None => strict,
    }
}

/// One windowed fetch: up to `page_size + 1` rows after the cursor.
fn fetch_window(
    ordered: &[Row],
    cursor: Option<&Cursor>,
    direction: SortDirection,
    page_size: u64,
) -> Vec<Row> {
    ordered
        .iter()
        .filter(|r| cursor.map_or(true, |c| after_cursor(r, c, direction)))
        .take(page_size as usize + 1)
        .cloned()
        .collect()
}

/// Follow `next_cursor`/`next_id_after` until `has_next` is false,
/// returning every page.
fn walk(rows: Vec<Row>, direction: SortDirection, page_size: u64) -> Vec<CursorPageResponse<Row>> {
    let ordered = sorted(rows, direction);
    let total = ordered.len() as u64;
    let mut pages = Vec::new();
    let mut cursor: Option<Cursor> = None;

    loop {
        let window = fetch_window(&ordered, cursor.as_ref(), direction, page_size);
        let page = CursorPageResponse::assemble(window, page_size, total, key);
        let has_next = page.has_next;
        cursor = page.next_cursor.map(|last_sort_value| Cursor {
            last_sort_value,
            last_id: page.next_id_after,
        });
        pages.push(page);
        if !has_next {
            break;
        }
        assert!(pages.len() <= total as usize + 1, "walk did not terminate");
    }

    pages
}

fn dataset_with_duplicate_timestamps() -> Vec<Row> {
    vec![
        row(1, "2024-06-01T08:00:00Z"),
        row(2, "2024-06-01T09:00:00Z"),
        row(3, "2024-06-01T09:00:00Z"),
        row(4, "2024-06-01T09:00:00Z"),
        row(5, "2024-06-02T10:00:00Z"),
        row(6, "2024-06-02T10:00:00Z"),
        row(7, "2024-06-03T11:00:00Z"),
    ]
}

#[test]
fn walk_visits_each_row_exactly_once_in_order() {
    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let pages = walk(dataset_with_duplicate_timestamps(), direction, 3);

        let expected = sorted(dataset_with_duplicate_timestamps(), direction);
        let seen: Vec<Row> = pages.iter().flat_map(|p| p.content.clone()).collect();

        assert_eq!(seen, expected, "direction {direction:?}");
    }
}

#[test]
fn page_count_is_ceil_of_rows_over_size() {
    // 7 rows, size 3 -> ceil(7/3) = 3 pages.
    let pages = walk(dataset_with_duplicate_timestamps(), SortDirection::Desc, 3);
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].size, 3);
    assert_eq!(pages[1].size, 3);
    assert_eq!(pages[2].size, 1);
    assert!(pages[0].has_next);
    assert!(pages[1].has_next);
    assert!(!pages[2].has_next);

    // Every page reports the full filtered total.
    assert!(pages.iter().all(|p| p.total_elements == 7));

    // 6 rows, size 3 -> exactly 2 pages, no empty trailer.
    let six: Vec<Row> = dataset_with_duplicate_timestamps()
        .into_iter()
        .take(6)
        .collect();
    assert_eq!(walk(six, SortDirection::Asc, 3).len(), 2);
}

#[test]
fn worked_three_row_example() {
    // 3 rows with t1 < t2 < t3, size 2, sorted by createdAt desc.
    let rows = vec![
        row(1, "2024-06-01T00:00:00Z"),
        row(2, "2024-06-02T00:00:00Z"),
        row(3, "2024-06-03T00:00:00Z"),
    ];
    let t2: DateTime<Utc> = "2024-06-02T00:00:00Z".parse().unwrap();

    let pages = walk(rows, SortDirection::Desc, 2);
    assert_eq!(pages.len(), 2);

    let first = &pages[0];
    assert_eq!(
        first.content.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![3, 2]
    );
    assert_eq!(first.next_cursor, Some(t2));
    assert_eq!(first.next_id_after, Some(2));
    assert!(first.has_next);
    assert_eq!(first.total_elements, 3);

    let second = &pages[1];
    assert_eq!(
        second.content.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![1]
    );
    assert_eq!(second.next_cursor, None);
    assert_eq!(second.next_id_after, None);
    assert!(!second.has_next);
}

#[test]
fn log_cursor_survives_default_sort_but_not_a_field_switch() {
    // Change logs default to sorting by changedAt (cursor-stable), so a
    // bare cursor round-trips.
    let q = LogListQuery {
        cursor: Some("2024-06-02T00:00:00Z".into()),
        id_after: Some("2".into()),
        ..Default::default()
    };
    let sort = q.sort();
    let effective = effective_cursor(q.cursor(), &sort, q.filter().is_active(), None);
    assert_eq!(
        effective,
        Some(Cursor {
            last_sort_value: "2024-06-02T00:00:00Z".parse().unwrap(),
            last_id: Some(2),
        })
    );

    // Same cursor, but the client switches sortField to "type": first
    // page semantics.
    let q = LogListQuery {
        cursor: Some("2024-06-02T00:00:00Z".into()),
        id_after: Some("2".into()),
        sort_field: Some("type".into()),
        ..Default::default()
    };
    let sort = q.sort();
    assert_eq!(
        effective_cursor(q.cursor(), &sort, q.filter().is_active(), None),
        None
    );
}

#[test]
fn department_cursor_needs_the_created_at_sort() {
    // Departments default to sorting by name, which is not
    // cursor-stable; the cursor is discarded.
    let q = DepartmentListQuery {
        cursor: Some("2024-06-02T00:00:00Z".into()),
        ..Default::default()
    };
    let sort = q.sort();
    assert_eq!(
        effective_cursor(q.cursor(), &sort, q.filter().is_active(), None),
        None
    );

    // Explicitly sorting by createdAt makes the same cursor effective.
    let q = DepartmentListQuery {
        cursor: Some("2024-06-02T00:00:00Z".into()),
        sort_field: Some("createdAt".into()),
        ..Default::default()
    };
    let sort = q.sort();
    assert!(effective_cursor(q.cursor(), &sort, q.filter().is_active(), None).is_some());
}

#[test]
fn any_active_filter_forces_a_first_page() {
    let q = LogListQuery {
        cursor: Some("2024-06-02T00:00:00Z".into()),
        memo: Some("promotion".into()),
        ..Default::default()
    };
    let sort = q.sort();
    assert_eq!(
        effective_cursor(q.cursor(), &sort, q.filter().is_active(), None),
        None
    );

    let q = DepartmentListQuery {
        cursor: Some("2024-06-02T00:00:00Z".into()),
        sort_field: Some("createdAt".into()),
        name_or_description: Some("eng".into()),
        ..Default::default()
    };
    let sort = q.sort();
    assert_eq!(
        effective_cursor(q.cursor(), &sort, q.filter().is_active(), None),
        None
    );
}

#[test]
fn malformed_pagination_input_degrades_to_defaults() {
    let q = DepartmentListQuery {
        cursor: Some("last tuesday".into()),
        size: Some("abc".into()),
        sort_field: Some("budget".into()),
        sort_direction: Some("upwards".into()),
        ..Default::default()
    };

    assert_eq!(q.cursor(), None);
    assert_eq!(q.page_size(), 30);
    let sort = q.sort();
    assert_eq!(sort.direction, SortDirection::Asc);

    let q = DepartmentListQuery {
        size: Some("0".into()),
        ..Default::default()
    };
    assert_eq!(q.page_size(), 30);
    let q = DepartmentListQuery {
        size: Some("-5".into()),
        ..Default::default()
    };
    assert_eq!(q.page_size(), 30);
}

#[test]
fn timestamp_only_cursor_skips_boundary_ties() {
    // Without idAfter the comparison is strictly past the timestamp, so
    // rows sharing the boundary value are not revisited (and not
    // duplicated).
    let ordered = sorted(dataset_with_duplicate_timestamps(), SortDirection::Desc);
    let cursor = Cursor {
        last_sort_value: "2024-06-02T10:00:00Z".parse().unwrap(),
        last_id: None,
    };
    let window = fetch_window(&ordered, Some(&cursor), SortDirection::Desc, 10);
    assert!(window.iter().all(|r| r.created_at < cursor.last_sort_value));
    assert_eq!(window.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3, 4, 1]);
}

#[test]
fn envelope_serializes_camel_case() {
    let pages = walk(dataset_with_duplicate_timestamps(), SortDirection::Desc, 3);
    let json = serde_json::to_value(&pages[0]).unwrap();

    assert!(json.get("content").is_some());
    assert!(json.get("nextCursor").is_some());
    assert!(json.get("nextIdAfter").is_some());
    assert!(json.get("hasNext").is_some());
    assert!(json.get("totalElements").is_some());
    assert_eq!(json["size"], 3);
}
