use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select};

use crate::pagination::cursor::Cursor;
use crate::pagination::sort::SortDirection;

/// Build the keyset predicate for rows strictly after `cursor` in the
/// ordering `(sort_col direction, id ASC)`.
///
/// The comparison is lexicographic on the pair, not independent on each
/// component:
///
/// - ascending: `sort > v OR (sort = v AND id > last_id)`
/// - descending: `sort < v OR (sort = v AND id > last_id)`
///
/// The id tie-break is ascending in both cases, matching the fetch
/// ordering. When the cursor carries no id the strict inequality stands
/// alone, so rows sharing the boundary sort value are skipped.
pub fn cursor_condition<C, I>(
    sort_col: C,
    id_col: I,
    direction: SortDirection,
    cursor: &Cursor,
) -> Condition
where
    C: ColumnTrait,
    I: ColumnTrait,
{
    let strict = match direction {
        SortDirection::Asc => sort_col.gt(cursor.last_sort_value),
        SortDirection::Desc => sort_col.lt(cursor.last_sort_value),
    };

    match cursor.last_id {
        Some(last_id) => Condition::any().add(strict).add(
            Condition::all()
                .add(sort_col.eq(cursor.last_sort_value))
                .add(id_col.gt(last_id)),
        ),
        None => Condition::all().add(strict),
    }
}

/// Apply the windowed-fetch shape to a filtered select: the optional
/// cursor bound, the `(sort_col, id ASC)` ordering, and a `page_size + 1`
/// limit so the caller can derive `has_next` without a second round trip.
pub fn apply_window<E, C, I>(
    query: Select<E>,
    sort_col: C,
    id_col: I,
    direction: SortDirection,
    cursor: Option<&Cursor>,
    page_size: u64,
) -> Select<E>
where
    E: EntityTrait,
    C: ColumnTrait,
    I: ColumnTrait,
{
    let mut query = query;
    if let Some(cursor) = cursor {
        query = query.filter(cursor_condition(sort_col, id_col, direction, cursor));
    }
    query
        .order_by(sort_col, direction.order())
        .order_by_asc(id_col)
        .limit(page_size + 1)
}
