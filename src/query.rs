use sea_orm::Order;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Include;
use crate::filtering::criteria::Criteria;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Everything the executor needs for one `find_and_count_all` call.
///
/// Built stage by stage from an optional caller-supplied base; each stage takes the
/// options by value and hands back the enriched value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Projection. Empty selects every column.
    pub attributes: Vec<String>,
    pub offset: u64,
    /// `None` fetches without a bound.
    pub limit: Option<u64>,
    pub include: Vec<Include>,
    /// Count distinct top-level rows. Forced on whenever `include` is non-empty.
    pub distinct: bool,
    pub order: Vec<OrderBy>,
    /// Where-clause. `None` fetches unfiltered.
    pub criteria: Option<Criteria>,
    /// Named scope applied by the executor before the query runs.
    pub scope: Option<String>,
}

impl QueryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn order(mut self, order: Vec<OrderBy>) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn where_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = (!criteria.is_empty()).then_some(criteria);
        self
    }
}
