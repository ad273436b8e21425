use std::collections::HashMap;

use crate::config::SortConfig;
use crate::errors::ListError;
use crate::query::OrderBy;
use crate::schema::EntitySchema;

/// Parse a comma-separated sort string. `-column` sorts descending.
///
/// Empty tokens are kept as empty column names so that they fail the allow-list
/// check instead of being silently ignored.
#[must_use]
pub fn parse_sort_string(sort: &str) -> Vec<OrderBy> {
    if sort.is_empty() {
        return Vec::new();
    }

    sort.split(',')
        .map(|token| {
            token
                .strip_prefix('-')
                .map_or_else(|| OrderBy::asc(token), OrderBy::desc)
        })
        .collect()
}

/// Resolve the ordering for a request.
///
/// Returns `Ok(None)` when there is nothing to sort by: no sort parameter and no
/// configured default, or an empty sort string. Callers keep any existing order in
/// that case.
///
/// # Errors
///
/// Returns [`ListError::DisallowedSort`] listing every column outside the allow-list.
pub fn resolve_order(
    sort: &SortConfig,
    query: &HashMap<String, String>,
    schema: &EntitySchema,
) -> Result<Option<Vec<OrderBy>>, ListError> {
    let requested = query.get(&sort.param);
    if requested.is_none() && sort.default.is_none() {
        return Ok(None);
    }

    // An empty query value falls back to the default
    let source = requested
        .filter(|value| !value.is_empty())
        .or(sort.default.as_ref())
        .map_or("", String::as_str);

    let order = parse_sort_string(source);

    let disallowed: Vec<String> = order
        .iter()
        .map(|o| o.column.as_str())
        .filter(|column| match &sort.attributes {
            Some(allowed) => !allowed.iter().any(|a| a == column),
            None => !schema.contains(column),
        })
        .map(str::to_string)
        .collect();

    if !disallowed.is_empty() {
        tracing::warn!(columns = ?disallowed, "Sorting not allowed on given attributes");
        return Err(ListError::disallowed_sort(disallowed));
    }

    Ok((!order.is_empty()).then_some(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeKind;

    fn schema() -> EntitySchema {
        EntitySchema::new()
            .attribute("id", AttributeKind::Integer)
            .attribute("name", AttributeKind::Text)
            .attribute("age", AttributeKind::Integer)
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_sort_string() {
        assert_eq!(
            parse_sort_string("-age,name"),
            vec![OrderBy::desc("age"), OrderBy::asc("name")]
        );
        assert!(parse_sort_string("").is_empty());
    }

    #[test]
    fn test_allow_listed_sort() {
        let sort = SortConfig::default().attributes(["age", "name"]);
        let order = resolve_order(&sort, &query(&[("sort", "-age,name")]), &schema()).unwrap();
        assert_eq!(order, Some(vec![OrderBy::desc("age"), OrderBy::asc("name")]));
    }

    #[test]
    fn test_disallowed_columns_reported() {
        let sort = SortConfig::default().attributes(["age", "name"]);
        let err = resolve_order(&sort, &query(&[("sort", "age,height")]), &schema()).unwrap_err();

        match err {
            ListError::DisallowedSort { columns } => assert_eq!(columns, vec!["height"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_schema_is_default_allow_list() {
        let sort = SortConfig::default();
        assert!(resolve_order(&sort, &query(&[("sort", "-id")]), &schema()).is_ok());

        let err = resolve_order(&sort, &query(&[("sort", "password")]), &schema()).unwrap_err();
        assert!(matches!(err, ListError::DisallowedSort { .. }));
    }

    #[test]
    fn test_default_sort_without_param() {
        let sort = SortConfig::default().default_sort("-id");
        let order = resolve_order(&sort, &query(&[]), &schema()).unwrap();
        assert_eq!(order, Some(vec![OrderBy::desc("id")]));
    }

    #[test]
    fn test_param_overrides_default() {
        let sort = SortConfig::default().default_sort("-id");
        let order = resolve_order(&sort, &query(&[("sort", "name")]), &schema()).unwrap();
        assert_eq!(order, Some(vec![OrderBy::asc("name")]));
    }

    #[test]
    fn test_no_trigger_is_none() {
        let order = resolve_order(&SortConfig::default(), &query(&[]), &schema()).unwrap();
        assert_eq!(order, None);
    }

    #[test]
    fn test_empty_param_without_default_is_none() {
        let order = resolve_order(&SortConfig::default(), &query(&[("sort", "")]), &schema()).unwrap();
        assert_eq!(order, None);
    }

    #[test]
    fn test_custom_param_name() {
        let sort = SortConfig {
            param: "order_by".to_string(),
            ..SortConfig::default()
        };
        let order = resolve_order(&sort, &query(&[("order_by", "age")]), &schema()).unwrap();
        assert_eq!(order, Some(vec![OrderBy::asc("age")]));
    }

    #[test]
    fn test_trailing_comma_is_rejected() {
        let err = resolve_order(&SortConfig::default(), &query(&[("sort", "age,")]), &schema())
            .unwrap_err();
        match err {
            ListError::DisallowedSort { columns } => assert_eq!(columns, vec![""]),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
