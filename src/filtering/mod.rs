//! # Request-to-query translation
//!
//! Turns the raw query string of a list request into the pieces of a
//! [`QueryOptions`](crate::query::QueryOptions):
//!
//! - [`search`]: free-text parameters expand to an OR over candidate attributes
//! - [`composer`]: base criteria, search groups and attribute filters merge into one
//!   where-clause
//! - [`sort`]: `sort=-age,name` becomes an allow-listed order list
//! - [`pagination`]: `count`, `offset` and `page` resolve to one offset/limit pair
//! - [`coercion`]: raw strings become typed comparison values
//!
//! ## Query Parameter Examples
//! ```rust,ignore
//! // Free-text search over the configured attributes
//! GET /users?q=smith
//!
//! // Attribute equality, coerced to the column type
//! GET /users?age=30&active=true
//!
//! // Sorting, descending on age then ascending on name
//! GET /users?sort=-age,name
//!
//! // Paging: 20 per page, third page
//! GET /users?count=20&page=2
//!
//! // Named scope
//! GET /users?scope=active
//! ```

pub mod coercion;
pub mod composer;
pub mod criteria;
pub mod operator;
pub mod pagination;
pub mod search;
pub mod sort;

pub use coercion::coerce;
pub use composer::{attribute_filters, compose_criteria};
pub use criteria::{Condition, Criteria, Expression, FilterValue};
pub use operator::{DEFAULT_SEARCH_OPERATOR, Operator};
pub use pagination::{ContentRange, DEFAULT_COUNT, Paging, PagingOverrides, resolve_paging};
pub use search::{apply_search, build_search_expression};
pub use sort::{parse_sort_string, resolve_order};
