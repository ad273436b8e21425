use axum::{
    Json,
    http::{HeaderMap, header::CONTENT_RANGE},
    response::{IntoResponse, Response},
};

use super::executor::{FindAndCountAll, Record};
use crate::config::ResourceConfig;
use crate::filtering::pagination::ContentRange;

/// Remove each of `attributes` from every row, in both views.
pub fn strip_attributes(rows: &mut [Record], attributes: &[String]) {
    for row in rows {
        for attribute in attributes {
            row.remove(attribute);
        }
    }
}

/// Shaped result of a list call.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse {
    pub rows: Vec<Record>,
    pub total: u64,
    /// Present only for paginated resources.
    pub range: Option<ContentRange>,
}

impl ListResponse {
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        self.range.map(|range| range.to_headers()).unwrap_or_default()
    }
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        let headers = self.headers();
        (headers, Json(self.rows)).into_response()
    }
}

/// Post-process executor output for `config`, given the offset the query ran with.
#[must_use]
pub fn shape(config: &ResourceConfig, offset: u64, result: FindAndCountAll) -> ListResponse {
    let FindAndCountAll { mut rows, count } = result;

    if config.association_options.remove_foreign_keys {
        strip_attributes(&mut rows, &config.include_attributes);
    }

    let range = config
        .pagination
        .then(|| ContentRange::new(offset, rows.len() as u64, count));

    if let Some(range) = &range {
        tracing::debug!(content_range = %range, "Computed list range");
    }

    ListResponse {
        rows,
        total: count,
        range,
    }
}

#[must_use]
pub fn content_range_of(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_RANGE).and_then(|v| v.to_str().ok())
}
