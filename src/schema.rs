use sea_orm::{ColumnTrait, ColumnType, EntityTrait, IdenStatic, Iterable};
use serde::{Deserialize, Serialize};

/// Coarse classification of a column type, resolved once from schema metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Text,
    Integer,
    DateTime(Temporal),
    Other,
}

/// How a date/time column stores its values. Filter values are bound in the
/// same representation so stored and compared values line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temporal {
    /// Timestamp with a time zone, compared as UTC.
    Zoned,
    /// Date and time without a zone.
    Naive,
    /// Calendar date only.
    Date,
}

impl AttributeKind {
    #[must_use]
    pub fn from_column_type(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => Self::Text,
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => Self::Integer,
            ColumnType::TimestampWithTimeZone => Self::DateTime(Temporal::Zoned),
            ColumnType::DateTime | ColumnType::Timestamp => Self::DateTime(Temporal::Naive),
            ColumnType::Date => Self::DateTime(Temporal::Date),
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

/// A single declared attribute of the listed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

/// Declared attributes of the listed entity, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    attributes: Vec<Attribute>,
}

impl EntitySchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute. Re-declaring a name replaces its kind in place.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, kind: AttributeKind) -> Self {
        let name = name.into();
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == name) {
            existing.kind = kind;
        } else {
            self.attributes.push(Attribute { name, kind });
        }
        self
    }

    /// Build the schema from a sea-orm entity's column definitions.
    #[must_use]
    pub fn from_entity<E: EntityTrait>() -> Self {
        E::Column::iter().fold(Self::new(), |schema, column| {
            let kind = AttributeKind::from_column_type(column.def().get_column_type());
            schema.attribute(column.as_str(), kind)
        })
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<AttributeKind> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.kind)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
