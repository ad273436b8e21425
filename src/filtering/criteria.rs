//! Boolean filter trees built by the list pipeline.
//!
//! A [`Criteria`] is the where-clause object: an attribute-keyed map of conditions plus
//! keyless [`Expression`] clauses, all implicitly AND-ed. Attribute keys follow
//! shallow-assign semantics: writing a key twice keeps the later condition.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use super::operator::Operator;

/// Right-hand side of a leaf condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A JSON literal, or the raw query string as `JsonValue::String`.
    Json(JsonValue),
    Timestamp(DateTime<Utc>),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    /// Produced by an unparsable date. Never matches any row.
    InvalidDate,
}

impl FilterValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Json(JsonValue::String(value.into()))
    }
}

impl From<JsonValue> for FilterValue {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Json(JsonValue::from(value))
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Json(JsonValue::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Json(JsonValue::Bool(value))
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// `attribute <operator> value`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub attribute: String,
    pub operator: Operator,
    pub value: FilterValue,
}

impl Condition {
    pub fn new(attribute: impl Into<String>, operator: Operator, value: impl Into<FilterValue>) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(attribute: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(attribute, Operator::Eq, value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Condition(Condition),
    And(Vec<Expression>),
    Or(Vec<Expression>),
}

impl Expression {
    #[must_use]
    pub fn and(items: Vec<Expression>) -> Self {
        Self::And(items)
    }

    #[must_use]
    pub fn or(items: Vec<Expression>) -> Self {
        Self::Or(items)
    }

    /// All leaf conditions, depth first.
    #[must_use]
    pub fn conditions(&self) -> Vec<&Condition> {
        match self {
            Self::Condition(c) => vec![c],
            Self::And(items) | Self::Or(items) => {
                items.iter().flat_map(Expression::conditions).collect()
            }
        }
    }
}

impl From<Condition> for Expression {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    fields: BTreeMap<String, Condition>,
    clauses: Vec<Expression>,
}

impl Criteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the condition for `condition.attribute`, replacing any earlier one.
    #[must_use]
    pub fn field(mut self, condition: Condition) -> Self {
        self.assign([condition]);
        self
    }

    /// Append a keyless clause.
    #[must_use]
    pub fn clause(mut self, expression: Expression) -> Self {
        self.clauses.push(expression);
        self
    }

    /// Shallow-assign conditions by attribute name.
    pub fn assign(&mut self, conditions: impl IntoIterator<Item = Condition>) {
        for condition in conditions {
            self.fields.insert(condition.attribute.clone(), condition);
        }
    }

    /// Require `expression` in addition to everything already present.
    ///
    /// An empty criteria simply becomes the expression. Otherwise the current
    /// criteria is folded into a single operand so that none of its conditions
    /// can be replaced by a later [`assign`](Self::assign).
    #[must_use]
    pub fn and(self, expression: Expression) -> Self {
        if self.is_empty() {
            return Self::new().clause(expression);
        }
        let existing = self.into_expression();
        Self::new().clause(Expression::And(vec![existing, expression]))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.clauses.is_empty()
    }

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Condition> {
        self.fields.get(attribute)
    }

    #[must_use]
    pub fn clauses(&self) -> &[Expression] {
        &self.clauses
    }

    /// Collapse into one expression: keyed fields first (by name), then clauses.
    #[must_use]
    pub fn into_expression(self) -> Expression {
        let mut items: Vec<Expression> = self
            .fields
            .into_values()
            .map(Expression::Condition)
            .collect();
        items.extend(self.clauses);

        if items.len() == 1 {
            items.remove(0)
        } else {
            Expression::And(items)
        }
    }
}

impl From<Condition> for Criteria {
    fn from(condition: Condition) -> Self {
        Self::new().field(condition)
    }
}
