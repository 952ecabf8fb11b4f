use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::errors::LocatorError;
use crate::record::{TrafficFields, MISSING_SENTINEL};

// Include default locators at compile time
const DEFAULT_LOCATORS: &str = include_str!("../default_locators.txt");

pub const LOCATOR_FILE: &str = "field_locators.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficField {
    EstimatedReach,
    EstimatedImpressions,
    MonthlyVisitors,
}

impl TrafficField {
    pub const ALL: [TrafficField; 3] = [
        TrafficField::EstimatedReach,
        TrafficField::EstimatedImpressions,
        TrafficField::MonthlyVisitors,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TrafficField::EstimatedReach => "estimated_reach",
            TrafficField::EstimatedImpressions => "estimated_impressions",
            TrafficField::MonthlyVisitors => "monthly_visitors",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Post-processing applied to the text of a located element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Trim, then replace "N/A" (any case) with the sentinel.
    NotAvailableAsZero,
    /// Trim only.
    Trim,
}

impl Normalize {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "na_to_zero" => Some(Normalize::NotAvailableAsZero),
            "trim" => Some(Normalize::Trim),
            _ => None,
        }
    }

    pub fn apply(self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self {
            Normalize::NotAvailableAsZero if trimmed.eq_ignore_ascii_case("n/a") => {
                MISSING_SENTINEL.to_string()
            }
            _ => trimmed.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldLocator {
    pub field: TrafficField,
    pub selector: Selector,
    pub normalize: Normalize,
}

impl FieldLocator {
    /// Value of this field in `document`, or the sentinel when nothing matches.
    pub fn locate(&self, document: &Html) -> String {
        document
            .select(&self.selector)
            .next()
            .map(|element: ElementRef| self.normalize.apply(&element.text().collect::<String>()))
            .unwrap_or_else(|| MISSING_SENTINEL.to_string())
    }
}

/// One locator per traffic field.
#[derive(Debug, Clone)]
pub struct LocatorTable {
    reach: FieldLocator,
    impressions: FieldLocator,
    monthly: FieldLocator,
}

impl LocatorTable {
    pub fn default_table() -> std::result::Result<Self, LocatorError> {
        Self::parse(DEFAULT_LOCATORS)
    }

    /// Strict parse: any malformed line is an error.
    pub fn parse(content: &str) -> std::result::Result<Self, LocatorError> {
        let mut locators = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if let Some(locator) = parse_line(line_num + 1, line)? {
                locators.push(locator);
            }
        }
        Self::from_locators(locators)
    }

    pub fn from_locators(
        locators: Vec<FieldLocator>,
    ) -> std::result::Result<Self, LocatorError> {
        let mut slots: [Option<FieldLocator>; 3] = [None, None, None];
        for locator in locators {
            let index = locator.field as usize;
            if slots[index].is_some() {
                return Err(LocatorError::Duplicate {
                    field: locator.field.key().to_string(),
                });
            }
            slots[index] = Some(locator);
        }

        let [reach, impressions, monthly] = slots;
        let take = |slot: Option<FieldLocator>, field: TrafficField| {
            slot.ok_or_else(|| LocatorError::MissingField {
                field: field.key().to_string(),
            })
        };
        Ok(Self {
            reach: take(reach, TrafficField::EstimatedReach)?,
            impressions: take(impressions, TrafficField::EstimatedImpressions)?,
            monthly: take(monthly, TrafficField::MonthlyVisitors)?,
        })
    }

    pub fn get(&self, field: TrafficField) -> &FieldLocator {
        match field {
            TrafficField::EstimatedReach => &self.reach,
            TrafficField::EstimatedImpressions => &self.impressions,
            TrafficField::MonthlyVisitors => &self.monthly,
        }
    }

    fn set(&mut self, locator: FieldLocator) {
        match locator.field {
            TrafficField::EstimatedReach => self.reach = locator,
            TrafficField::EstimatedImpressions => self.impressions = locator,
            TrafficField::MonthlyVisitors => self.monthly = locator,
        }
    }

    pub fn extract(&self, document: &Html) -> TrafficFields {
        TrafficFields {
            estimated_reach: self.reach.locate(document),
            estimated_impressions: self.impressions.locate(document),
            monthly_visitors: self.monthly.locate(document),
        }
    }
}

fn parse_line(
    line_num: usize,
    line: &str,
) -> std::result::Result<Option<FieldLocator>, LocatorError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (field, rest) = line
        .split_once('=')
        .ok_or(LocatorError::Syntax { line: line_num })?;
    let (selector_str, rule) = match rest.split_once("=>") {
        Some((selector, rule)) => (selector.trim(), rule.trim()),
        None => (rest.trim(), "na_to_zero"),
    };
    if selector_str.is_empty() {
        return Err(LocatorError::Syntax { line: line_num });
    }

    let field = field.trim();
    let field = TrafficField::from_key(field).ok_or_else(|| LocatorError::UnknownField {
        line: line_num,
        field: field.to_string(),
    })?;
    let normalize = Normalize::from_key(rule).ok_or_else(|| LocatorError::UnknownRule {
        line: line_num,
        rule: rule.to_string(),
    })?;
    let selector = Selector::parse(selector_str).map_err(|e| LocatorError::InvalidSelector {
        line: line_num,
        selector: selector_str.to_string(),
        reason: e.to_string(),
    })?;

    Ok(Some(FieldLocator {
        field,
        selector,
        normalize,
    }))
}

pub fn load_locator_table(locator_file_path: Option<&Path>) -> Result<LocatorTable> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "locator_loading",
        "Starting field locator loading"
    );

    let table = if let Some(path) = locator_file_path {
        info!(action = "load", component = "locator_file", file_path = ?path, "Loading locators from specified file");
        if !path.exists() {
            anyhow::bail!("Locator file not found: {:?}", path);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read locator file {:?}", path))?;
        LocatorTable::parse(&content)
            .with_context(|| format!("Invalid locator file {:?}", path))?
    } else {
        match load_from_default_file(Path::new(LOCATOR_FILE))? {
            Some(table) => table,
            None => {
                info!(
                    action = "load",
                    component = "embedded_locators",
                    "Using embedded default locators"
                );
                LocatorTable::default_table().context("Invalid embedded default locators")?
            }
        }
    };

    info!(
        action = "complete",
        component = "locator_loading",
        duration_ms = start_time.elapsed().as_millis(),
        "Field locators ready"
    );
    Ok(table)
}

/// Lenient load: invalid lines are skipped, and fields the file leaves
/// undefined keep their embedded default. `None` when the file is absent or
/// holds no usable line.
fn load_from_default_file(path: &Path) -> Result<Option<LocatorTable>> {
    if !path.exists() {
        return Ok(None);
    }

    info!(action = "load", component = "default_locator_file", file_path = ?path, "Loading locators from default file");
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read locator file {:?}", path))?;

    let mut table = LocatorTable::default_table().context("Invalid embedded default locators")?;
    let mut defined: Vec<TrafficField> = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        match parse_line(line_num + 1, line) {
            Ok(Some(locator)) if defined.contains(&locator.field) => {
                warn!(action = "parse", component = "field_locator", line_number = line_num + 1, field = locator.field.key(), "Ignoring duplicate locator line")
            }
            Ok(Some(locator)) => {
                defined.push(locator.field);
                table.set(locator);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(action = "parse", component = "field_locator", error = %e, "Skipping invalid locator line")
            }
        }
    }

    if defined.is_empty() {
        warn!(action = "parse", component = "default_locator_file", file_path = ?path, "No usable locator in file");
        return Ok(None);
    }

    for field in TrafficField::ALL {
        if !defined.contains(&field) {
            warn!(action = "fallback", component = "default_locator_file", field = field.key(), "Using embedded default locator for field");
        }
    }
    Ok(Some(table))
}

pub fn init_default_locators() -> Result<()> {
    init_locator_file(Path::new(LOCATOR_FILE))
}

fn init_locator_file(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first if you want to reinitialize.",
            path.display()
        );
    }

    fs::write(path, DEFAULT_LOCATORS)?;
    println!("Created {} with default locators", path.display());

    Ok(())
}
