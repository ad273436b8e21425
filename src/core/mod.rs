// The list pipeline: context in, options built, executor called, rows shaped

pub mod context;
pub mod executor;
pub mod list;
pub mod shaper;

pub use context::{Flow, ListContext, TransformOptions};
pub use executor::{FindAndCountAll, QueryExecutor, Record};
pub use list::ListAction;
pub use shaper::{ListResponse, shape, strip_attributes};
