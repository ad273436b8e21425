use async_trait::async_trait;
use sea_orm::DbErr;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::query::QueryOptions;

/// One listed row.
///
/// Keeps the logical attribute view (what gets serialized) separate from the raw
/// values read from the store, so stripping an attribute has to clear both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    attributes: Map<String, JsonValue>,
    data_values: Map<String, JsonValue>,
}

impl Record {
    /// A row whose logical view starts as a copy of the raw values.
    #[must_use]
    pub fn from_values(values: Map<String, JsonValue>) -> Self {
        Self {
            attributes: values.clone(),
            data_values: values,
        }
    }

    /// Build from a JSON object. Non-object values produce an empty row.
    #[must_use]
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => Self::from_values(map),
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&JsonValue> {
        self.attributes.get(attribute)
    }

    #[must_use]
    pub fn data_value(&self, attribute: &str) -> Option<&JsonValue> {
        self.data_values.get(attribute)
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: JsonValue) {
        self.attributes.insert(attribute.into(), value);
    }

    /// Remove `attribute` from both views.
    pub fn remove(&mut self, attribute: &str) {
        self.attributes.remove(attribute);
        self.data_values.remove(attribute);
    }

    #[must_use]
    pub const fn attributes(&self) -> &Map<String, JsonValue> {
        &self.attributes
    }

    #[must_use]
    pub const fn data_values(&self) -> &Map<String, JsonValue> {
        &self.data_values
    }

    #[must_use]
    pub fn into_json(self) -> JsonValue {
        JsonValue::Object(self.attributes)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

/// Rows of the requested page plus the total number of matching rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindAndCountAll {
    pub rows: Vec<Record>,
    pub count: u64,
}

/// The data store seen by the list action.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `options` and return the page of rows plus the total match count.
    ///
    /// When `options.distinct` is set the count must only count each top-level row
    /// once, however many included rows join onto it.
    async fn find_and_count_all(&self, options: &QueryOptions) -> Result<FindAndCountAll, DbErr>;
}
