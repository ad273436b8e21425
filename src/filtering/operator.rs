use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operator used by a search parameter when none is configured.
pub const DEFAULT_SEARCH_OPERATOR: Operator = Operator::Like;

/// Name fragments that mark a string-supplied operator as pattern-matching.
/// Order matters: the most specific fragment wins when mapping to a variant.
const PATTERN_FRAGMENTS: [(&str, Operator); 4] = [
    ("notILike", Operator::NotILike),
    ("notLike", Operator::NotLike),
    ("iLike", Operator::ILike),
    ("like", Operator::Like),
];

/// Comparison operator applied by a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    #[default]
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Like,
    ILike,
    NotLike,
    NotILike,
}

impl Operator {
    /// Whether this operator belongs to the LIKE family.
    ///
    /// Pattern operators only apply to textual attributes and their search
    /// value gets wrapped in `%` wildcards.
    #[must_use]
    pub const fn is_pattern(self) -> bool {
        matches!(
            self,
            Self::Like | Self::ILike | Self::NotLike | Self::NotILike
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Like => "like",
            Self::ILike => "iLike",
            Self::NotLike => "notLike",
            Self::NotILike => "notILike",
        }
    }

    const ALL: [Self; 12] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::In,
        Self::NotIn,
        Self::Like,
        Self::ILike,
        Self::NotLike,
        Self::NotILike,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for Operator {
    type Err = UnknownOperator;

    /// Accepts bare names (`like`), `$`-prefixed names (`$like`) and `Op.`-prefixed
    /// names (`Op.like`). Unrecognised names containing a LIKE fragment map to the
    /// matching pattern variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s
            .strip_prefix('$')
            .or_else(|| s.strip_prefix("Op."))
            .unwrap_or(s);

        if let Some(op) = Self::ALL.iter().find(|op| op.as_str() == name) {
            return Ok(*op);
        }

        PATTERN_FRAGMENTS
            .iter()
            .find(|(fragment, _)| name.contains(fragment))
            .map(|(_, op)| *op)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = UnknownOperator;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
