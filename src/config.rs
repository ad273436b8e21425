//! # Resource configuration
//!
//! Declarative description of how a resource is listed. A [`ResourceConfig`] is built
//! once at startup, either programmatically or from JSON, and shared read-only by every
//! request.
//!
//! ```rust,ignore
//! let config = ResourceConfig::from_json_str(r#"{
//!     "attributes": ["id", "name", "bio", "age"],
//!     "search": [{ "param": "q", "attributes": ["name", "bio"] },
//!                { "param": "exact", "operator": "eq", "attributes": ["name"] }],
//!     "sort": { "default": "-age", "attributes": ["age", "name"] },
//!     "pagination": true
//! }"#)?;
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs, serde_as};

use crate::errors::ListError;
use crate::filtering::operator::{DEFAULT_SEARCH_OPERATOR, Operator};

pub const DEFAULT_SEARCH_PARAM: &str = "q";
pub const DEFAULT_SORT_PARAM: &str = "sort";

fn default_search_param() -> String {
    DEFAULT_SEARCH_PARAM.to_string()
}

fn default_sort_param() -> String {
    DEFAULT_SORT_PARAM.to_string()
}

const fn default_search_operator() -> Operator {
    DEFAULT_SEARCH_OPERATOR
}

fn default_search() -> Vec<SearchConfig> {
    vec![SearchConfig::default()]
}

const fn default_true() -> bool {
    true
}

/// `search` accepts one object or a list of them. The list form is tried first so
/// that `[]` stays an empty list instead of one all-default object.
struct OneOrList;

impl<'de> DeserializeAs<'de, Vec<SearchConfig>> for OneOrList {
    fn deserialize_as<D>(deserializer: D) -> Result<Vec<SearchConfig>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Many(Vec<SearchConfig>),
            One(SearchConfig),
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Many(many) => many,
            Shape::One(one) => vec![one],
        })
    }
}

impl SerializeAs<Vec<SearchConfig>> for OneOrList {
    fn serialize_as<S>(source: &Vec<SearchConfig>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        source.serialize(serializer)
    }
}

/// One free-text search parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_param")]
    pub param: String,
    #[serde(default = "default_search_operator")]
    pub operator: Operator,
    /// Candidate attributes. `None` searches every declared entity attribute.
    #[serde(default)]
    pub attributes: Option<Vec<String>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            param: default_search_param(),
            operator: DEFAULT_SEARCH_OPERATOR,
            attributes: None,
        }
    }
}

impl SearchConfig {
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    #[must_use]
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    #[serde(default = "default_sort_param")]
    pub param: String,
    /// Sort string applied when the request carries no sort parameter.
    #[serde(default)]
    pub default: Option<String>,
    /// Allow-list of sortable attributes. `None` allows every declared attribute.
    #[serde(default)]
    pub attributes: Option<Vec<String>>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            param: default_sort_param(),
            default: None,
            attributes: None,
        }
    }
}

impl SortConfig {
    #[must_use]
    pub fn default_sort(mut self, sort: impl Into<String>) -> Self {
        self.default = Some(sort.into());
        self
    }

    #[must_use]
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationOptions {
    /// Strip `include_attributes` from every listed row.
    #[serde(default)]
    pub remove_foreign_keys: bool,
}

/// Eager-load directive for an associated resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    /// Association name, as registered with the executor.
    pub association: String,
    /// Attributes of the association to load. `None` loads all of them.
    #[serde(default)]
    pub attributes: Option<Vec<String>>,
}

impl Include {
    pub fn new(association: impl Into<String>) -> Self {
        Self {
            association: association.into(),
            attributes: None,
        }
    }

    #[must_use]
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Attributes selected for listing.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Search parameters. Absent means the default `q` search; `[]` disables search.
    #[serde_as(as = "OneOrList")]
    #[serde(default = "default_search")]
    pub search: Vec<SearchConfig>,
    #[serde(default)]
    pub sort: SortConfig,
    #[serde(default = "default_true")]
    pub pagination: bool,
    #[serde(default)]
    pub association_options: AssociationOptions,
    #[serde(default)]
    pub include: Vec<Include>,
    /// Attributes removed from rows when `association_options.remove_foreign_keys` is set.
    #[serde(default)]
    pub include_attributes: Vec<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            search: default_search(),
            sort: SortConfig::default(),
            pagination: true,
            association_options: AssociationOptions::default(),
            include: Vec::new(),
            include_attributes: Vec::new(),
        }
    }
}

impl ResourceConfig {
    #[must_use]
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Load a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidConfig`] when the JSON is malformed or names an
    /// unknown operator.
    pub fn from_json_str(json: &str) -> Result<Self, ListError> {
        serde_json::from_str(json).map_err(|e| ListError::invalid_config(e.to_string()))
    }

    /// Load a configuration from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidConfig`] when the value does not describe a resource.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ListError> {
        serde_json::from_value(value).map_err(|e| ListError::invalid_config(e.to_string()))
    }

    /// Replace all search parameters with `search`.
    #[must_use]
    pub fn with_search(mut self, search: impl IntoIterator<Item = SearchConfig>) -> Self {
        self.search = search.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortConfig) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn without_pagination(mut self) -> Self {
        self.pagination = false;
        self
    }

    #[must_use]
    pub fn with_include(mut self, include: Include) -> Self {
        self.include.push(include);
        self
    }

    /// Strip `attributes` from listed rows.
    #[must_use]
    pub fn removing_foreign_keys<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.association_options.remove_foreign_keys = true;
        self.include_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }
}
