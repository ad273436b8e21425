use std::collections::HashMap;

use super::criteria::{Condition, Criteria, Expression};
use crate::config::SearchConfig;
use crate::schema::EntitySchema;

/// Build the OR-group for one search parameter, or `None` when the parameter is
/// absent from the query.
///
/// Pattern operators skip non-text candidates and wrap the value in `%` wildcards.
/// Candidates unknown to the schema are skipped as well when a pattern operator is
/// used, since their type cannot be shown to be textual.
#[must_use]
pub fn build_search_expression(
    search: &SearchConfig,
    query: &HashMap<String, String>,
    schema: &EntitySchema,
) -> Option<Expression> {
    let raw = query.get(&search.param)?;
    let is_pattern = search.operator.is_pattern();

    let candidates: Vec<&str> = search.attributes.as_ref().map_or_else(
        || schema.names().collect(),
        |attrs| attrs.iter().map(String::as_str).collect(),
    );

    let value = if is_pattern {
        format!("%{raw}%")
    } else {
        raw.clone()
    };

    let matches: Vec<Expression> = candidates
        .into_iter()
        .filter(|attr| !is_pattern || schema.kind_of(attr).is_some_and(|kind| kind.is_text()))
        .map(|attr| Condition::new(attr, search.operator, value.as_str()).into())
        .collect();

    Some(Expression::Or(matches))
}

/// Fold every configured search parameter into `criteria`, in configuration order.
///
/// Each present parameter contributes an OR-group that is AND-ed with whatever
/// criteria already exist.
#[must_use]
pub fn apply_search(
    criteria: Criteria,
    searches: &[SearchConfig],
    query: &HashMap<String, String>,
    schema: &EntitySchema,
) -> Criteria {
    searches
        .iter()
        .filter_map(|search| build_search_expression(search, query, schema))
        .fold(criteria, Criteria::and)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::operator::Operator;
    use crate::schema::AttributeKind;

    fn schema() -> EntitySchema {
        EntitySchema::new()
            .attribute("id", AttributeKind::Integer)
            .attribute("name", AttributeKind::Text)
            .attribute("bio", AttributeKind::Text)
            .attribute("age", AttributeKind::Integer)
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn like(attr: &str, value: &str) -> Expression {
        Condition::new(attr, Operator::Like, value).into()
    }

    #[test]
    fn test_like_search_over_text_attributes() {
        let search = SearchConfig::new("q").attributes(["name", "bio"]);
        let expr = build_search_expression(&search, &query(&[("q", "foo")]), &schema());

        assert_eq!(
            expr,
            Some(Expression::Or(vec![like("name", "%foo%"), like("bio", "%foo%")]))
        );
    }

    #[test]
    fn test_like_search_skips_non_text() {
        let search = SearchConfig::new("q").attributes(["name", "bio", "age"]);
        let expr = build_search_expression(&search, &query(&[("q", "foo")]), &schema()).unwrap();

        let attrs: Vec<_> = expr.conditions().iter().map(|c| c.attribute.clone()).collect();
        assert_eq!(attrs, vec!["name", "bio"]);
    }

    #[test]
    fn test_defaults_to_all_schema_attributes() {
        let search = SearchConfig::default();
        let expr = build_search_expression(&search, &query(&[("q", "x")]), &schema()).unwrap();

        let attrs: Vec<_> = expr.conditions().iter().map(|c| c.attribute.clone()).collect();
        assert_eq!(attrs, vec!["name", "bio"]);
    }

    #[test]
    fn test_non_pattern_operator_uses_raw_value_on_any_type() {
        let search = SearchConfig::new("exact")
            .operator(Operator::Eq)
            .attributes(["name", "age"]);
        let expr = build_search_expression(&search, &query(&[("exact", "42")]), &schema());

        assert_eq!(
            expr,
            Some(Expression::Or(vec![
                Condition::new("name", Operator::Eq, "42").into(),
                Condition::new("age", Operator::Eq, "42").into(),
            ]))
        );
    }

    #[test]
    fn test_absent_param_is_none() {
        let search = SearchConfig::new("q");
        assert_eq!(build_search_expression(&search, &query(&[]), &schema()), None);
    }

    #[test]
    fn test_multiple_searches_fold_with_and() {
        let searches = vec![
            SearchConfig::new("q").attributes(["name"]),
            SearchConfig::new("b").operator(Operator::ILike).attributes(["bio"]),
        ];
        let criteria = apply_search(
            Criteria::new(),
            &searches,
            &query(&[("q", "a"), ("b", "c")]),
            &schema(),
        );

        let expected = Expression::And(vec![
            Expression::Or(vec![like("name", "%a%")]),
            Expression::Or(vec![Condition::new("bio", Operator::ILike, "%c%").into()]),
        ]);
        assert_eq!(criteria.into_expression(), expected);
    }

    #[test]
    fn test_no_search_config_is_noop() {
        let base = Criteria::from(Condition::eq("id", 1));
        let criteria = apply_search(base.clone(), &[], &query(&[("q", "a")]), &schema());
        assert_eq!(criteria, base);
    }
}
