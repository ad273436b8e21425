//! # crudlist
//!
//! The list action of a REST resource controller: query-string search, attribute
//! filters, sorting and pagination turned into one store query, with the result
//! shaped into rows plus an `items <start>-<end>/<total>` `Content-Range` header.
//!
//! ```rust,ignore
//! use crudlist::{EntitySchema, ListAction, ListContext, ResourceConfig, SearchConfig, SeaOrmExecutor};
//!
//! let config = ResourceConfig::new(["id", "name", "age"])
//!     .with_search([SearchConfig::new("q").attributes(["name"])]);
//! let executor = SeaOrmExecutor::<user::Entity>::new(db);
//! let action = ListAction::new(config, EntitySchema::from_entity::<user::Entity>(), executor);
//!
//! let mut ctx = ListContext::from_pairs([("q", "ali"), ("sort", "-age"), ("count", "20")]);
//! action.fetch(&mut ctx).await?;
//! ```

pub mod config;
pub mod core;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod query;
pub mod schema;

pub use config::{AssociationOptions, Include, ResourceConfig, SearchConfig, SortConfig};
pub use crate::core::{
    FindAndCountAll, Flow, ListAction, ListContext, ListResponse, QueryExecutor, Record,
    TransformOptions,
};
pub use database::SeaOrmExecutor;
pub use errors::ListError;
pub use filtering::{
    Condition, ContentRange, Criteria, Expression, FilterValue, Operator, PagingOverrides,
};
pub use query::{OrderBy, QueryOptions, SortDirection};
pub use schema::{AttributeKind, EntitySchema, Temporal};
