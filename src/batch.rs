use anyhow::{Context, Result};
use chrono::Local;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::ScraperConfig;
use crate::errors::InputError;
use crate::export::export_records;
use crate::extractor::Extractor;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::record::{BatchReport, COLUMN_HEADERS};
use crate::{input, locators, Args};

/// Extract every domain in order, one request at a time, pausing `delay`
/// between consecutive requests.
pub fn run_batch<F: PageFetcher>(
    extractor: &Extractor<F>,
    domains: &[String],
    delay: Duration,
) -> BatchReport {
    let started_at = Local::now();
    let start_time = Instant::now();
    let total = domains.len();
    info!(action = "start", component = "batch", domain_count = total, delay_ms = delay.as_millis(), "Starting batch");

    let mut records = Vec::with_capacity(total);
    for (i, domain) in domains.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }
        info!(action = "progress", component = "batch", index = i + 1, total = total, domain = %domain, "Processing domain");
        records.push(extractor.extract(domain));
    }

    let report = BatchReport {
        records,
        started_at,
        finished_at: Local::now(),
    };
    info!(
        action = "complete",
        component = "batch",
        domain_count = report.total(),
        error_count = report.error_count(),
        duration_ms = start_time.elapsed().as_millis(),
        "Batch completed"
    );
    report
}

/// Load locators and input, run the batch over HTTP, print and export.
/// Input problems are reported before any request is made.
pub fn run(args: &Args) -> Result<BatchReport> {
    let config = ScraperConfig::from_args(args);
    config.validate()?;

    let locators = locators::load_locator_table(args.locators.as_deref())?;

    let mut domains = args.domains.clone();
    if let Some(path) = &args.input {
        domains.extend(input::read_domains(path, &config.input_column)?);
    }
    if domains.is_empty() {
        return Err(InputError::Empty.into());
    }

    let fetcher = HttpFetcher::new(&config.fetch)?;
    let extractor = Extractor::new(fetcher, config.fetch.host.clone(), locators);
    let report = run_batch(&extractor, &domains, config.delay);

    print_batch_results(&report);

    if let (Some(path), Some(format)) = (&config.output, config.export_format()) {
        export_records(&report.records, path, format)
            .with_context(|| format!("Failed to export results to {:?}", path))?;
        println!("Results saved to {}", path.display());
    }

    Ok(report)
}

pub fn render_table(report: &BatchReport) -> String {
    let rows: Vec<[String; 5]> = report.records.iter().map(|r| r.cells()).collect();

    let mut widths = COLUMN_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: &[&str]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    push_row(&COLUMN_HEADERS[..]);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&rule.iter().map(String::as_str).collect::<Vec<_>>());
    for row in &rows {
        push_row(&row.iter().map(String::as_str).collect::<Vec<_>>());
    }
    out
}

pub fn summary_line(report: &BatchReport) -> String {
    let errors = report.error_count();
    if errors > 0 {
        format!(
            "Scraping finished: {} of {} domains failed.",
            crate::utils::format_number(errors),
            crate::utils::format_number(report.total())
        )
    } else {
        format!(
            "Scraping finished without errors ({} domains).",
            crate::utils::format_number(report.total())
        )
    }
}

pub fn print_batch_results(report: &BatchReport) {
    println!("\n--- Hypestat Traffic Estimates ---");
    println!(
        "Run: {} to {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S"),
        report.finished_at.format("%H:%M:%S")
    );
    println!();
    print!("{}", render_table(report));
    println!();
    println!("{}", summary_line(report));
}
