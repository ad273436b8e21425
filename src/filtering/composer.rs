use std::collections::HashMap;

use super::coercion::coerce;
use super::criteria::{Condition, Criteria};
use super::search::apply_search;
use crate::config::ResourceConfig;
use crate::schema::EntitySchema;

/// Equality conditions for query parameters that name a declared attribute.
///
/// Parameters consumed by search or sort are skipped. Values are coerced to the
/// attribute's kind. Output is ordered by parameter name so composition is
/// deterministic regardless of map iteration order.
#[must_use]
pub fn attribute_filters(
    query: &HashMap<String, String>,
    schema: &EntitySchema,
    consumed: &[&str],
) -> Vec<Condition> {
    let mut keys: Vec<&String> = query
        .keys()
        .filter(|key| !consumed.contains(&key.as_str()))
        .filter(|key| schema.contains(key))
        .collect();
    keys.sort();

    keys.into_iter()
        .filter_map(|key| {
            let kind = schema.kind_of(key)?;
            Some(Condition::eq(key.as_str(), coerce(&query[key], kind)))
        })
        .collect()
}

/// Parameter names the list action interprets itself rather than as attribute filters.
fn consumed_params(config: &ResourceConfig) -> Vec<&str> {
    config
        .search
        .iter()
        .map(|s| s.param.as_str())
        .chain(std::iter::once(config.sort.param.as_str()))
        .collect()
}

/// Compose the where-clause: base criteria, then each search group (AND-ed), then
/// attribute equality filters shallow-assigned on top.
#[must_use]
pub fn compose_criteria(
    base: Criteria,
    config: &ResourceConfig,
    query: &HashMap<String, String>,
    schema: &EntitySchema,
) -> Criteria {
    let mut criteria = apply_search(base, &config.search, query, schema);

    let filters = attribute_filters(query, schema, &consumed_params(config));
    if !filters.is_empty() {
        criteria.assign(filters);
    }

    criteria
}
