//! Typed errors for the scraper library.
//!
//! `FetchError` never escapes the extractor: it is rendered into a record's
//! status. `InputError` and `LocatorError` are raised before any request is
//! issued and abort the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {code} {reason} for url ({url})")]
    Status {
        code: u16,
        reason: String,
        url: String,
    },

    #[error("request timed out after {seconds}s for url ({url})")]
    Timeout { url: String, seconds: u64 },

    #[error("request failed for url ({url}): {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from ({url}): {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("'{column}' column not found in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("{} contains no worksheets", .path.display())]
    NoWorksheet { path: PathBuf },

    #[error("failed to read workbook {}: {reason}", .path.display())]
    Workbook { path: PathBuf, reason: String },

    #[error("failed to read CSV file {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no domains to process")]
    Empty,
}

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("line {line}: expected 'field = selector [=> rule]'")]
    Syntax { line: usize },

    #[error("line {line}: unknown field '{field}'")]
    UnknownField { line: usize, field: String },

    #[error("line {line}: unknown rule '{rule}'")]
    UnknownRule { line: usize, rule: String },

    #[error("line {line}: invalid selector '{selector}': {reason}")]
    InvalidSelector {
        line: usize,
        selector: String,
        reason: String,
    },

    #[error("field '{field}' is defined more than once")]
    Duplicate { field: String },

    #[error("no locator defined for field '{field}'")]
    MissingField { field: String },
}
