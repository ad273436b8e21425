use axum::http::{HeaderMap, HeaderValue, header::CONTENT_RANGE};
use std::collections::HashMap;
use std::fmt;

/// Page size used when neither the caller nor the query supplies a usable count.
pub const DEFAULT_COUNT: u64 = 100;

/// Caller-side paging overrides. Zero behaves like an absent value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingOverrides {
    pub count: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
}

/// Resolved `(offset, count)` for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub offset: u64,
    pub count: u64,
}

/// Lenient integer read of a query value: surrounding whitespace is ignored and a
/// fractional part is truncated. Anything else reads as absent.
fn query_number(query: &HashMap<String, String>, key: &str) -> Option<i64> {
    let raw = query.get(key)?.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(truncate)
    })
}

/// Float-to-int casts saturate at the `i64` bounds.
#[allow(clippy::cast_possible_truncation)]
fn truncate(n: f64) -> i64 {
    n.trunc() as i64
}

/// First non-zero candidate.
fn first_set(candidates: [Option<i64>; 2]) -> Option<i64> {
    candidates.into_iter().flatten().find(|n| *n != 0)
}

/// Resolve paging from caller overrides first, then query parameters.
///
/// `page` is added on top of `offset` (`offset + page * count`) rather than replacing
/// it, so a request carrying both gets the compounded offset. A negative total
/// offset clamps to zero.
#[must_use]
pub fn resolve_paging(overrides: PagingOverrides, query: &HashMap<String, String>) -> Paging {
    let count = first_set([overrides.count, query_number(query, "count")])
        .filter(|n| *n > 0)
        .map_or(DEFAULT_COUNT, i64::unsigned_abs);

    let offset = first_set([overrides.offset, query_number(query, "offset")]).unwrap_or(0);
    let page = first_set([overrides.page, query_number(query, "page")]).unwrap_or(0);

    let count_signed = i64::try_from(count).unwrap_or(i64::MAX);
    let offset = offset.saturating_add(page.saturating_mul(count_signed));

    Paging {
        offset: u64::try_from(offset).unwrap_or(0),
        count,
    }
}

/// Inclusive range of the returned rows, as sent in `Content-Range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ContentRange {
    /// `end` is `start + returned - 1`, except an empty page reports an end of 0.
    #[must_use]
    pub const fn new(offset: u64, returned: u64, total: u64) -> Self {
        let end = if returned == 0 {
            0
        } else {
            offset.saturating_add(returned - 1)
        };
        Self {
            start: offset,
            end,
            total,
        }
    }

    #[must_use]
    pub fn header_value(&self) -> HeaderValue {
        // Only digits, spaces, '-' and '/': always a valid header value
        HeaderValue::from_str(&self.to_string()).unwrap_or(HeaderValue::from_static("items 0-0/0"))
    }

    #[must_use]
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_RANGE, self.header_value());
        headers
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "items {}-{}/{}", self.start, self.end, self.total)
    }
}
