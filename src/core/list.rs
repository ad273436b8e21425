//! # The list action
//!
//! [`ListAction`] wires the filtering stages together:
//!
//! 1. options start from the caller's base (`ListContext::options`) and get the
//!    resource attributes if no projection was set
//! 2. paging resolves `count`/`offset`/`page`; the limit is dropped for
//!    non-paginated resources
//! 3. resource and caller includes merge; any include forces distinct counting
//! 4. the sort directive is validated, failing the request before the store is hit
//! 5. criteria compose (base, search, attribute filters), `scope` is picked up
//! 6. the caller's transform hook gets the last word
//!
//! The executor then runs the query and the shaper post-processes the rows.
//!
//! ```rust,ignore
//! let action = ListAction::new(config, EntitySchema::from_entity::<user::Entity>(), executor);
//! let mut ctx = ListContext::new(query_params);
//! action.fetch(&mut ctx).await?;
//! let rows = ctx.instance.take().unwrap_or_default();
//! ```

use std::sync::Arc;

use super::context::{Flow, ListContext};
use super::executor::QueryExecutor;
use super::shaper::{ListResponse, shape};
use crate::config::{Include, ResourceConfig};
use crate::errors::ListError;
use crate::filtering::composer::compose_criteria;
use crate::filtering::pagination::{Paging, resolve_paging};
use crate::filtering::sort::resolve_order;
use crate::query::{OrderBy, QueryOptions};
use crate::schema::EntitySchema;

const SCOPE_PARAM: &str = "scope";

/// Default the projection to the resource attributes.
#[must_use]
pub fn with_attributes(mut options: QueryOptions, config: &ResourceConfig) -> QueryOptions {
    if options.attributes.is_empty() {
        options.attributes.clone_from(&config.attributes);
    }
    options
}

/// Apply the resolved paging. Non-paginated resources get no limit at all.
#[must_use]
pub fn with_paging(mut options: QueryOptions, paging: Paging, pagination: bool) -> QueryOptions {
    options.offset = paging.offset;
    options.limit = pagination.then_some(paging.count);
    options
}

/// Resource includes followed by caller includes. Any include turns on distinct
/// counting so joined rows do not inflate the total.
#[must_use]
pub fn with_includes(
    mut options: QueryOptions,
    resource: &[Include],
    extra: &[Include],
) -> QueryOptions {
    let merged: Vec<Include> = resource.iter().chain(extra).cloned().collect();
    if !merged.is_empty() {
        options.include = merged;
    }
    if !options.include.is_empty() {
        options.distinct = true;
    }
    options
}

/// Replace the order only when a non-empty order was resolved.
#[must_use]
pub fn with_order(mut options: QueryOptions, order: Option<Vec<OrderBy>>) -> QueryOptions {
    if let Some(order) = order {
        options.order = order;
    }
    options
}

pub struct ListAction<X> {
    config: Arc<ResourceConfig>,
    schema: Arc<EntitySchema>,
    executor: X,
}

impl<X: QueryExecutor> ListAction<X> {
    pub fn new(
        config: impl Into<Arc<ResourceConfig>>,
        schema: impl Into<Arc<EntitySchema>>,
        executor: X,
    ) -> Self {
        Self {
            config: config.into(),
            schema: schema.into(),
            executor,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    #[must_use]
    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    #[must_use]
    pub const fn executor(&self) -> &X {
        &self.executor
    }

    /// Build the query options for `ctx` without running them.
    ///
    /// Returns the options together with the offset used for the response range.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::DisallowedSort`] when the sort directive names a column
    /// outside the allow-list.
    pub fn build_options(&self, ctx: &ListContext) -> Result<(QueryOptions, Paging), ListError> {
        let config = self.config.as_ref();
        let paging = resolve_paging(ctx.paging, &ctx.query);

        let options = ctx.options.clone().unwrap_or_default();
        let options = with_attributes(options, config);
        let options = with_paging(options, paging, config.pagination);
        let options = with_includes(options, &config.include, &ctx.include);

        let order = resolve_order(&config.sort, &ctx.query, &self.schema)?;
        let options = with_order(options, order);

        let criteria = compose_criteria(
            ctx.criteria.clone().unwrap_or_default(),
            config,
            &ctx.query,
            &self.schema,
        );
        let mut options = options.where_criteria(criteria);

        if let Some(scope) = ctx.query.get(SCOPE_PARAM).filter(|s| !s.is_empty()) {
            options.scope = Some(scope.clone());
        }

        if let Some(transform) = &ctx.transform_options {
            transform(&mut options);
        }

        tracing::debug!(
            offset = options.offset,
            limit = ?options.limit,
            order = ?options.order,
            scope = ?options.scope,
            filtered = options.criteria.is_some(),
            "Composed list query"
        );

        Ok((options, paging))
    }

    /// Build, execute and shape the list query without touching a context.
    ///
    /// # Errors
    ///
    /// Client input errors from [`build_options`](Self::build_options), or the
    /// executor's failure wrapped in [`ListError::Store`].
    pub async fn list(&self, ctx: &ListContext) -> Result<ListResponse, ListError> {
        let (options, paging) = self.build_options(ctx)?;
        let result = self.executor.find_and_count_all(&options).await?;
        Ok(shape(&self.config, paging.offset, result))
    }

    /// Run the list action and place its results on `ctx`.
    ///
    /// On success `ctx.instance` holds the rows, `ctx.total` the match count and,
    /// for paginated resources, `ctx.headers` the `Content-Range` header.
    ///
    /// # Errors
    ///
    /// See [`list`](Self::list). Nothing is written to `ctx` on failure.
    pub async fn fetch(&self, ctx: &mut ListContext) -> Result<Flow, ListError> {
        let response = self.list(ctx).await?;

        ctx.headers.extend(response.headers());
        ctx.total = Some(response.total);
        ctx.instance = Some(response.rows);

        Ok(Flow::Continue)
    }
}
