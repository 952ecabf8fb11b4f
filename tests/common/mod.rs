#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use hypestat_scraper::{Extractor, FetchError, LocatorTable, PageFetcher};

pub const TRAFFIC_PAGE: &str = include_str!("../fixtures/traffic_page.html");

pub enum Canned {
    Page(String),
    Status(u16, &'static str),
    Timeout,
}

/// Serves canned responses keyed by URL and records every request.
#[derive(Default)]
pub struct CannedFetcher {
    responses: HashMap<String, Canned>,
    pub requests: RefCell<Vec<String>>,
}

impl CannedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, domain: &str, response: Canned) -> Self {
        self.responses
            .insert(format!("https://hypestat.com/info/{}", domain), response);
        self
    }
}

impl PageFetcher for CannedFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.responses.get(url) {
            Some(Canned::Page(body)) => Ok(body.clone()),
            Some(Canned::Status(code, reason)) => Err(FetchError::Status {
                code: *code,
                reason: reason.to_string(),
                url: url.to_string(),
            }),
            Some(Canned::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
                seconds: 15,
            }),
            None => Err(FetchError::Status {
                code: 404,
                reason: "Not Found".to_string(),
                url: url.to_string(),
            }),
        }
    }
}

pub fn extractor(fetcher: CannedFetcher) -> Extractor<CannedFetcher> {
    Extractor::new(
        fetcher,
        "hypestat.com",
        LocatorTable::default_table().unwrap(),
    )
}

/// Minimal provider page with the reach value at the default locator position.
pub fn page_with_reach(reach: &str) -> String {
    format!(
        "<html><body><div id=\"traffic\"><h2>t</h2><p>a</p><p>b</p>\
         <dl><dt>Daily Unique Visitors</dt><dd>{}</dd></dl></div></body></html>",
        reach
    )
}
