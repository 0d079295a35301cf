use anyhow::{bail, Context, Result};
use calendar_scraper::{DEFAULT_BASE_URL, DEFAULT_CALENDAR_PATH};
use chrono::NaiveDate;
use dividend_core::{PipelineSettings, BASE_CURRENCY, DEFAULT_REPORT_SIZE};
use std::env;

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    // Calendar site
    pub calendar_base_url: String,
    pub calendar_path: String,

    // Currency converter
    pub currency_api_url: String,
    pub currency_api_key: Option<String>,
    pub tracked_currencies: Vec<String>,

    // Fetching
    pub http_timeout_secs: u64,
    pub quote_concurrency: usize,

    // Report
    pub report_size: usize,
    pub json_output: bool,
    pub today: Option<NaiveDate>,
}

impl ScannerConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            calendar_base_url: env::var("CALENDAR_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            calendar_path: env::var("CALENDAR_PATH").unwrap_or_else(|_| DEFAULT_CALENDAR_PATH.to_string()),

            currency_api_url: env::var("CURRENCY_API_URL")
                .unwrap_or_else(|_| currency_client::DEFAULT_BASE_URL.to_string()),
            currency_api_key: env::var("CURRENCY_API_KEY").ok().filter(|k| !k.is_empty()),
            tracked_currencies: parse_currency_list(
                &env::var("TRACKED_CURRENCIES").unwrap_or_else(|_| "NOK,DKK,EUR".to_string()),
            ),

            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            quote_concurrency: env::var("QUOTE_CONCURRENCY")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("QUOTE_CONCURRENCY must be a positive integer")?,

            report_size: env::var("REPORT_SIZE")
                .unwrap_or_else(|_| DEFAULT_REPORT_SIZE.to_string())
                .parse()
                .context("REPORT_SIZE must be a positive integer")?,
            json_output: false,
            today: None,
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the environment.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--json" => self.json_output = true,
                "--top" => {
                    self.report_size = iter
                        .next()
                        .context("--top needs a value")?
                        .parse()
                        .context("--top must be a positive integer")?;
                }
                "--concurrency" => {
                    self.quote_concurrency = iter
                        .next()
                        .context("--concurrency needs a value")?
                        .parse()
                        .context("--concurrency must be a positive integer")?;
                }
                "--today" => {
                    let value = iter.next().context("--today needs a date")?;
                    self.today = Some(
                        NaiveDate::parse_from_str(value, "%Y-%m-%d")
                            .with_context(|| format!("--today {} is not a YYYY-MM-DD date", value))?,
                    );
                }
                other => bail!("Unknown argument: {}", other),
            }
        }

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.quote_concurrency == 0 {
            bail!("quote concurrency must be at least 1");
        }
        if self.report_size == 0 {
            bail!("report size must be at least 1");
        }
        Ok(())
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            currencies: self.tracked_currencies.clone(),
            quote_concurrency: self.quote_concurrency,
            report_size: self.report_size,
        }
    }
}

/// Comma list of currency codes; blanks and the base currency are dropped.
pub fn parse_currency_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty() && c != BASE_CURRENCY)
        .collect()
}
