use serde::Serialize;
use utoipa::ToSchema;

use super::params::QueryParams;
use super::projection::Record;

/// Records per list page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid page.")]
pub struct InvalidPage;

/// 1-based page number from the `page` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber(u64);

impl PageNumber {
    pub const FIRST: Self = Self(1);

    /// # Errors
    ///
    /// Returns `InvalidPage` unless `page` is absent or a positive integer.
    pub fn from_params(params: &QueryParams) -> Result<Self, InvalidPage> {
        match params.get("page").map(str::trim) {
            None | Some("") => Ok(Self::FIRST),
            Some(raw) => match raw.parse::<u64>() {
                Ok(n) if n >= 1 => Ok(Self(n)),
                _ => Err(InvalidPage),
            },
        }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// 0-based index for the store's paginator.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0 - 1
    }
}

/// Page count for `count` records; an empty collection still has one page.
#[must_use]
pub fn total_pages(count: u64, page_size: u64) -> u64 {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Paginated list envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page {
    /// Total records matching the filters
    pub count: u64,
    /// Absolute URL of the next page, null on the last page
    pub next: Option<String>,
    /// Absolute URL of the previous page, null on the first page
    pub previous: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<Record>,
}

/// Builds `next`/`previous` URLs from the request URL.
///
/// All parameters except `page` are carried over unchanged, sorted by name.
/// Page 1 is addressed without a `page` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    base_url: String,
    segments: Vec<String>,
}

impl PageLinks {
    /// `base_url` is scheme, host and path; `query` is the raw query string.
    #[must_use]
    pub fn new(base_url: impl Into<String>, query: Option<&str>) -> Self {
        let segments = query
            .unwrap_or_default()
            .split('&')
            .filter(|segment| !segment.is_empty())
            .filter(|segment| segment_key(segment) != "page")
            .map(str::to_string)
            .collect();

        Self {
            base_url: base_url.into(),
            segments,
        }
    }

    #[must_use]
    pub fn url_for(&self, page: u64) -> String {
        let mut segments: Vec<String> = self.segments.clone();
        if page > 1 {
            segments.push(format!("page={page}"));
        }
        segments.sort_by(|a, b| segment_key(a).cmp(segment_key(b)));

        if segments.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}?{}", self.base_url, segments.join("&"))
        }
    }

    #[must_use]
    pub fn page(&self, page: PageNumber, count: u64, page_size: u64, results: Vec<Record>) -> Page {
        let last = total_pages(count, page_size);
        let current = page.get();

        Page {
            count,
            next: (current < last).then(|| self.url_for(current + 1)),
            previous: (current > 1).then(|| self.url_for(current - 1)),
            results,
        }
    }
}

fn segment_key(segment: &str) -> &str {
    segment.split_once('=').map_or(segment, |(key, _)| key)
}
