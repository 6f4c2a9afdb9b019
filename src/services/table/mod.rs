//! Table Services
//!
//! Generic pieces behind every console table: the row memoizer, the
//! property filter and the sort/filter/paginate data source.

pub mod datasource;
pub mod filter;
pub mod memo;

pub use datasource::{
    LoadOutcome, PaginationMode, RowPredicate, SelectState, SortDirection, SortState,
    TableDataSource,
};
pub use filter::{filter_by_props, matches_props, resolve_path};
pub use memo::{CacheableRow, MemoStats, Memoizer, RowIdentity};
