use async_trait::async_trait;
use sea_orm::{
    Condition, DatabaseConnection, DbErr, EntityName, EntityTrait, IdenStatic, Iterable, JoinType,
    Order, PaginatorTrait, PrimaryKeyToColumn, QueryFilter, QueryOrder, QuerySelect, RelationDef,
    Select, Value,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::marker::PhantomData;

use crate::core::executor::{FindAndCountAll, QueryExecutor, Record};
use crate::filtering::criteria::{Condition as Leaf, Criteria, Expression, FilterValue};
use crate::filtering::operator::Operator;
use crate::query::QueryOptions;

/// A to-one association that can be named in an include directive.
///
/// `RelationDef` is not `Clone`, so the relation is rebuilt for every join.
struct Association {
    relation: fn() -> RelationDef,
    attributes: Vec<String>,
}

/// [`QueryExecutor`] over a sea-orm entity.
///
/// Named scopes are criteria registered up front and AND-ed into the query when a
/// request selects them. Includes are registered relations, left-joined and returned
/// as a nested object under the association name.
pub struct SeaOrmExecutor<E> {
    db: DatabaseConnection,
    scopes: HashMap<String, Criteria>,
    associations: HashMap<String, Association>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: EntityTrait> SeaOrmExecutor<E> {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            scopes: HashMap::new(),
            associations: HashMap::new(),
            _entity: PhantomData,
        }
    }

    /// Register a named scope selectable with `?scope=<name>`.
    #[must_use]
    pub fn with_scope(mut self, name: impl Into<String>, criteria: Criteria) -> Self {
        self.scopes.insert(name.into(), criteria);
        self
    }

    /// Register a to-one association of entity `R` reachable through `relation`.
    ///
    /// ```rust,ignore
    /// SeaOrmExecutor::<user::Entity>::new(db)
    ///     .with_include::<team::Entity>("team", || user::Relation::Team.def());
    /// ```
    #[must_use]
    pub fn with_include<R: EntityTrait>(
        mut self,
        name: impl Into<String>,
        relation: fn() -> RelationDef,
    ) -> Self {
        let attributes = R::Column::iter()
            .map(|column| column.as_str().to_string())
            .collect();
        self.associations
            .insert(name.into(), Association { relation, attributes });
        self
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn table() -> String {
        EntityName::table_name(&E::default()).to_string()
    }

    fn scoped(&self, select: Select<E>, scope: Option<&str>) -> Result<Select<E>, DbErr> {
        let Some(name) = scope else {
            return Ok(select);
        };
        let criteria = self
            .scopes
            .get(name)
            .ok_or_else(|| DbErr::Custom(format!("Invalid scope {name} called.")))?;
        Ok(select.filter(to_condition(&criteria.clone().into_expression(), &Self::table())))
    }

    fn association(&self, name: &str) -> Result<&Association, DbErr> {
        self.associations
            .get(name)
            .ok_or_else(|| DbErr::Custom(format!("{name} is not associated to {}", Self::table())))
    }

    /// Filtered, scoped and joined select shared by the row and count queries.
    fn base_select(&self, options: &QueryOptions) -> Result<Select<E>, DbErr> {
        let table = Self::table();
        let mut select = self.scoped(E::find(), options.scope.as_deref())?;

        if let Some(criteria) = &options.criteria {
            select = select.filter(to_condition(&criteria.clone().into_expression(), &table));
        }

        for include in &options.include {
            let association = self.association(&include.association)?;
            select = select.join_as(
                JoinType::LeftJoin,
                (association.relation)(),
                Alias::new(&include.association),
            );
        }

        Ok(select)
    }

    fn count_select(&self, options: &QueryOptions) -> Result<Select<E>, DbErr> {
        let select = self.base_select(options)?;
        if !options.distinct {
            return Ok(select);
        }

        // Distinct primary keys: one per top-level row however many joined rows match
        let table = Self::table();
        let select = E::PrimaryKey::iter().fold(select.select_only(), |select, key| {
            let column = key.into_column();
            select.column_as(qualified(&table, column.as_str()), column.as_str())
        });
        Ok(select.distinct())
    }

    fn row_select(&self, options: &QueryOptions) -> Result<Select<E>, DbErr> {
        let table = Self::table();
        let mut select = self.base_select(options)?;

        if !options.attributes.is_empty() {
            select = options
                .attributes
                .iter()
                .fold(select.select_only(), |select, attribute| {
                    select.column_as(qualified(&table, attribute), attribute.as_str())
                });
        }

        for include in &options.include {
            let association = self.association(&include.association)?;
            let attributes = include.attributes.as_ref().unwrap_or(&association.attributes);
            for attribute in attributes {
                select = select.column_as(
                    qualified(&include.association, attribute),
                    format!("{}.{attribute}", include.association),
                );
            }
        }

        if options.distinct {
            select = select.distinct();
        }

        for order in &options.order {
            select = select.order_by(qualified(&table, &order.column), Order::from(order.direction));
        }

        // An offset without a limit is not valid SQL on every backend
        if let Some(limit) = options.limit {
            select = select.offset(options.offset).limit(limit);
        }

        Ok(select)
    }
}

#[async_trait]
impl<E> QueryExecutor for SeaOrmExecutor<E>
where
    E: EntityTrait,
    E::Model: Sync,
{
    async fn find_and_count_all(&self, options: &QueryOptions) -> Result<FindAndCountAll, DbErr> {
        let count_query = self.count_select(options)?;
        let count = PaginatorTrait::count(count_query, &self.db).await?;

        let values = self.row_select(options)?.into_json().all(&self.db).await?;
        let associations: Vec<&str> = options
            .include
            .iter()
            .map(|include| include.association.as_str())
            .collect();

        let rows = values
            .into_iter()
            .map(|value| Record::from_json(nest_includes(value, &associations)))
            .collect();

        Ok(FindAndCountAll { rows, count })
    }
}

fn qualified(table: &str, column: &str) -> SimpleExpr {
    SimpleExpr::from(Expr::col((Alias::new(table), Alias::new(column))))
}

/// Never-true predicate.
fn never() -> SimpleExpr {
    Expr::cust("1 = 0")
}

/// Move `association.attr` keys of a joined row under an `association` object.
/// An association whose values are all null becomes `null`.
fn nest_includes(value: JsonValue, associations: &[&str]) -> JsonValue {
    let mut row = match value {
        JsonValue::Object(row) => row,
        other => return other,
    };

    for association in associations {
        let prefix = format!("{association}.");
        let keys: Vec<String> = row
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();

        let mut nested = Map::new();
        for key in keys {
            if let Some(v) = row.remove(&key) {
                nested.insert(key[prefix.len()..].to_string(), v);
            }
        }

        let nested = if nested.values().all(JsonValue::is_null) {
            JsonValue::Null
        } else {
            JsonValue::Object(nested)
        };
        row.insert((*association).to_string(), nested);
    }

    JsonValue::Object(row)
}

/// Translate an expression tree into a sea-orm condition on `table`.
#[must_use]
pub fn to_condition(expression: &Expression, table: &str) -> Condition {
    match expression {
        Expression::Condition(leaf) => Condition::all().add(to_simple_expr(leaf, table)),
        Expression::And(items) => items
            .iter()
            .fold(Condition::all(), |acc, item| acc.add(to_condition(item, table))),
        // OR over nothing matches nothing
        Expression::Or(items) if items.is_empty() => Condition::all().add(never()),
        Expression::Or(items) => items
            .iter()
            .fold(Condition::any(), |acc, item| acc.add(to_condition(item, table))),
    }
}

fn to_simple_expr(leaf: &Leaf, table: &str) -> SimpleExpr {
    let column = Expr::col((Alias::new(table), Alias::new(&leaf.attribute)));

    match (leaf.operator, &leaf.value) {
        (_, FilterValue::InvalidDate) => never(),
        (Operator::Eq, FilterValue::Json(JsonValue::Null)) => column.is_null(),
        (Operator::Ne, FilterValue::Json(JsonValue::Null)) => column.is_not_null(),
        (Operator::Eq | Operator::In, value) => match value {
            FilterValue::Json(JsonValue::Array(items)) => column.is_in(items.iter().map(json_to_value)),
            _ if leaf.operator == Operator::In => column.is_in([to_value(value)]),
            _ => column.eq(to_value(value)),
        },
        (Operator::NotIn, value) => match value {
            FilterValue::Json(JsonValue::Array(items)) => {
                column.is_not_in(items.iter().map(json_to_value))
            }
            _ => column.is_not_in([to_value(value)]),
        },
        (Operator::Ne, value) => column.ne(to_value(value)),
        (Operator::Gt, value) => column.gt(to_value(value)),
        (Operator::Gte, value) => column.gte(to_value(value)),
        (Operator::Lt, value) => column.lt(to_value(value)),
        (Operator::Lte, value) => column.lte(to_value(value)),
        (Operator::Like, value) => column.like(pattern_of(value)),
        (Operator::NotLike, value) => column.not_like(pattern_of(value)),
        (Operator::ILike, value) => {
            Expr::expr(Func::lower(column)).like(pattern_of(value).to_lowercase())
        }
        (Operator::NotILike, value) => {
            Expr::expr(Func::lower(column)).not_like(pattern_of(value).to_lowercase())
        }
    }
}

fn pattern_of(value: &FilterValue) -> String {
    match value {
        FilterValue::Json(JsonValue::String(s)) => s.clone(),
        FilterValue::Json(other) => other.to_string(),
        FilterValue::Timestamp(ts) => ts.to_rfc3339(),
        FilterValue::DateTime(dt) => dt.to_string(),
        FilterValue::Date(date) => date.to_string(),
        FilterValue::InvalidDate => String::new(),
    }
}

fn to_value(value: &FilterValue) -> Value {
    match value {
        FilterValue::Json(json) => json_to_value(json),
        FilterValue::Timestamp(ts) => Value::from(*ts),
        FilterValue::DateTime(dt) => Value::from(*dt),
        FilterValue::Date(date) => Value::from(*date),
        FilterValue::InvalidDate => Value::String(None),
    }
}

fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::String(None),
        JsonValue::Bool(b) => Value::from(*b),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::from)
            .or_else(|| n.as_u64().map(Value::from))
            .unwrap_or_else(|| Value::from(n.as_f64().unwrap_or_default())),
        JsonValue::String(s) => Value::from(s.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => Value::from(json.to_string()),
    }
}
