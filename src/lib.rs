pub mod args;
pub mod batch;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod extractor;
pub mod fetcher;
pub mod input;
pub mod locators;
pub mod record;
pub mod utils;

pub use args::Args;
pub use batch::{print_batch_results, run, run_batch};
pub use config::{ScraperConfig, DEFAULT_OUTPUT_FILE};
pub use errors::{FetchError, InputError, LocatorError};
pub use export::{export_records, write_xlsx_to_buffer, XLSX_MIME_TYPE};
pub use extractor::{parse_traffic, Extractor};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use locators::{init_default_locators, load_locator_table, LocatorTable};
pub use record::{BatchReport, RecordStatus, TrafficFields, TrafficRecord};
