use axum::http::HeaderMap;
use std::collections::HashMap;
use std::sync::Arc;

use super::executor::Record;
use crate::config::Include;
use crate::filtering::criteria::Criteria;
use crate::filtering::pagination::PagingOverrides;
use crate::query::QueryOptions;

/// Final adjustment hook run on the assembled options just before the query.
pub type TransformOptions = Arc<dyn Fn(&mut QueryOptions) + Send + Sync>;

/// Marker returned once the list action has placed its results on the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Hand over to the next pipeline stage.
    Continue,
}

/// Per-request state of one list call.
///
/// Callers that already did resource-specific work (authorization filters, preset
/// projections) put it in the override fields; the list action reads them and
/// writes `instance` and `headers`.
#[derive(Default)]
pub struct ListContext {
    /// Raw query-string parameters.
    pub query: HashMap<String, String>,
    /// Base where-clause all other filters are added to.
    pub criteria: Option<Criteria>,
    /// Starting options. Unset attributes default to the resource attributes.
    pub options: Option<QueryOptions>,
    pub paging: PagingOverrides,
    /// Extra includes appended to the resource's own.
    pub include: Vec<Include>,
    pub transform_options: Option<TransformOptions>,

    /// Listed rows, set by a successful fetch.
    pub instance: Option<Vec<Record>>,
    /// Total number of matching rows, set by a successful fetch.
    pub total: Option<u64>,
    /// Response headers produced by the list action (`Content-Range`).
    pub headers: HeaderMap,
}

impl ListContext {
    #[must_use]
    pub fn new(query: HashMap<String, String>) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    /// Build from `(key, value)` pairs. A later duplicate key wins.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub const fn with_paging(mut self, paging: PagingOverrides) -> Self {
        self.paging = paging;
        self
    }

    #[must_use]
    pub fn with_include(mut self, include: Include) -> Self {
        self.include.push(include);
        self
    }

    #[must_use]
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&mut QueryOptions) + Send + Sync + 'static,
    {
        self.transform_options = Some(Arc::new(transform));
        self
    }
}

impl std::fmt::Debug for ListContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListContext")
            .field("query", &self.query)
            .field("criteria", &self.criteria)
            .field("options", &self.options)
            .field("paging", &self.paging)
            .field("include", &self.include)
            .field("transform_options", &self.transform_options.is_some())
            .field("instance", &self.instance)
            .field("total", &self.total)
            .field("headers", &self.headers)
            .finish()
    }
}
