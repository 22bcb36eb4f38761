//! Cursor-based (keyset) pagination shared by the department and
//! change-log list endpoints.
//!
//! The pipeline per request: resolve the raw query parameters into a
//! [`SortSpec`] and a filter, decide whether the client cursor is still
//! valid for that shape ([`effective_cursor`]), run the windowed fetch
//! (`page_size + 1` rows ordered by `(sort_key, id)`) plus a count query,
//! and assemble the [`CursorPageResponse`] envelope.

pub mod cursor;
pub mod keyset;
pub mod page;
pub mod sort;

pub use cursor::{Cursor, ResetReason, effective_cursor, parse_cursor_timestamp};
pub use keyset::{apply_window, cursor_condition};
pub use page::{CursorPageResponse, DEFAULT_PAGE_SIZE, resolve_page_size};
pub use sort::{SortDirection, SortField, SortSpec};
