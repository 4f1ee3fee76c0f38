//! Fetch places around a center point and assemble a result set.

use crate::api::PlacesApi;
use crate::domain::{ResultSet, SearchRequest};
use crate::error::Result;
use crate::parser::parse_places;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// The places API rejects a page token used immediately after it is issued.
pub const PAGE_TOKEN_DELAY: Duration = Duration::from_secs(2);

/// Paging behaviour for one collection run.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Maximum pages to fetch. 1 captures only the first page.
    pub max_pages: u32,
    /// Delay before each follow-up page request
    pub page_delay: Duration,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_pages: 1,
            page_delay: PAGE_TOKEN_DELAY,
        }
    }
}

impl CollectOptions {
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }
}

/// Run a nearby search and collect the results, first page only.
pub fn collect(api: &impl PlacesApi, request: &SearchRequest) -> Result<ResultSet> {
    collect_with_options(api, request, &CollectOptions::default())
}

/// Run a nearby search, following page tokens up to `options.max_pages`.
///
/// Any failed page fails the whole run; no partial result set is returned.
pub fn collect_with_options(
    api: &impl PlacesApi,
    request: &SearchRequest,
    options: &CollectOptions,
) -> Result<ResultSet> {
    request.validate()?;

    let mut places = Vec::new();
    let mut page_token: Option<String> = None;
    let mut page = 0;

    loop {
        if page_token.is_some() && !options.page_delay.is_zero() {
            thread::sleep(options.page_delay);
        }

        let response = api.nearby_search(request, page_token.as_deref())?;
        page += 1;

        let parsed = parse_places(&response);
        log::debug!(
            "Page {}: {} results, {} usable",
            page,
            response.results.len(),
            parsed.len()
        );
        places.extend(parsed);

        page_token = response.next_page_token.filter(|t| !t.is_empty());
        match page_token {
            Some(_) if page < options.max_pages => continue,
            Some(_) => {
                log::info!(
                    "More results available upstream; stopping after {} page(s)",
                    page
                );
                break;
            }
            None => break,
        }
    }

    Ok(ResultSet::new(places))
}

/// Collect and write the result set to `output`, overwriting any previous file.
pub fn collect_to_file(
    api: &impl PlacesApi,
    request: &SearchRequest,
    options: &CollectOptions,
    output: &Path,
) -> Result<ResultSet> {
    let results = collect_with_options(api, request, options)?;
    results.write_to(output)?;
    Ok(results)
}
