use scraper::Html;
use std::time::Instant;
use tracing::{info, warn};

use crate::domain::target_url;
use crate::fetcher::PageFetcher;
use crate::locators::LocatorTable;
use crate::record::{TrafficFields, TrafficRecord};

/// Turns a domain into a `TrafficRecord` with one request to the provider.
pub struct Extractor<F> {
    fetcher: F,
    host: String,
    locators: LocatorTable,
}

impl<F: PageFetcher> Extractor<F> {
    pub fn new(fetcher: F, host: impl Into<String>, locators: LocatorTable) -> Self {
        Self {
            fetcher,
            host: host.into(),
            locators,
        }
    }

    /// Never fails: request errors come back as an error record.
    pub fn extract(&self, domain: &str) -> TrafficRecord {
        let start_time = Instant::now();
        let url = target_url(&self.host, domain);

        match self.fetcher.fetch(&url) {
            Ok(body) => {
                let fields = parse_traffic(&body, &self.locators);
                info!(
                    action = "extracted",
                    component = "extractor",
                    domain = domain,
                    url = %url,
                    estimated_reach = %fields.estimated_reach,
                    duration_ms = start_time.elapsed().as_millis(),
                    "Traffic fields extracted"
                );
                TrafficRecord::success(domain, fields)
            }
            Err(e) => {
                warn!(
                    action = "failed",
                    component = "extractor",
                    domain = domain,
                    url = %url,
                    error = %e,
                    duration_ms = start_time.elapsed().as_millis(),
                    "Failed processing domain"
                );
                TrafficRecord::failure(domain, &e)
            }
        }
    }
}

/// Traffic fields of a provider page. Missing elements yield the sentinel.
pub fn parse_traffic(html: &str, locators: &LocatorTable) -> TrafficFields {
    let document = Html::parse_document(html);
    locators.extract(&document)
}
