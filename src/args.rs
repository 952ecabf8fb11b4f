use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hypestat",
    about = "Fetch hypestat.com traffic estimates for a list of domains and export them as a spreadsheet",
    version,
    long_about = None
)]
pub struct Args {
    /// Domains to look up (e.g. google.com)
    pub domains: Vec<String>,

    /// Input file: .xlsx/.xls/.ods or .csv with a 'Link' column, or plain text with one domain per line
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Column holding the domains in spreadsheet or CSV input
    #[arg(long, default_value = "Link")]
    pub column: String,

    /// Output file (.xlsx or .csv)
    #[arg(short, long, default_value = "hypestat_data.xlsx")]
    pub output: PathBuf,

    /// Print the results without writing an output file
    #[arg(long)]
    pub no_export: bool,

    /// Statistics provider host
    #[arg(long, default_value = "hypestat.com")]
    pub host: String,

    /// Pause between requests in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub delay_ms: u64,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 15)]
    pub timeout: u64,

    /// Custom user agent
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Path to custom field locator file
    #[arg(short, long)]
    pub locators: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Initialize field_locators.txt with default locators
    #[arg(long)]
    pub init: bool,
}

pub fn validate_args(args: &Args) -> anyhow::Result<()> {
    if !args.init && args.domains.is_empty() && args.input.is_none() {
        anyhow::bail!("Provide at least one domain or an --input file");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_some_input() {
        let args = Args::parse_from(["hypestat"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["hypestat", "--init"]);
        assert!(validate_args(&args).is_ok());

        let args = Args::parse_from(["hypestat", "-i", "media.xlsx"]);
        assert!(validate_args(&args).is_ok());
        assert_eq!(args.column, "Link");
    }
}
