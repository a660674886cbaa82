//! Data source adapters for income-statement payloads.
//!
//! Each adapter issues exactly one GET per fetch and validates the JSON body
//! into [`FinancialRecord`]s. There is no retry: a transport failure, a
//! non-success status or an invalid payload surfaces as a [`DataFetchError`].

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::{self, Config};
use crate::error::{DataFetchError, Result};
use crate::models::{parse_payload, FilterSpec, FinancialRecord};

// ---------------------------------------------------------------------------
// IncomeSource
// ---------------------------------------------------------------------------

/// Something that can produce one company's income statements.
pub trait IncomeSource {
    /// Fetch the statement series.
    ///
    /// Sources that filter remotely receive the submitted `filter` and apply
    /// it on their side; local sources ignore it.
    fn fetch_income_statements(&self, filter: &FilterSpec) -> Result<Vec<FinancialRecord>>;

    /// True when the source applies [`FilterSpec`] itself.
    fn filters_remotely(&self) -> bool {
        false
    }
}

impl<S: IncomeSource + ?Sized> IncomeSource for Box<S> {
    fn fetch_income_statements(&self, filter: &FilterSpec) -> Result<Vec<FinancialRecord>> {
        (**self).fetch_income_statements(filter)
    }

    fn filters_remotely(&self) -> bool {
        (**self).filters_remotely()
    }
}

// ---------------------------------------------------------------------------
// DirectSource: financial data provider
// ---------------------------------------------------------------------------

/// Talks to the financial data provider directly:
/// `GET {base}/income-statement/{symbol}?period=..&apikey=..`.
pub struct DirectSource {
    client: Client,
    base_url: String,
    symbol: String,
    period: String,
    api_key: String,
}

impl DirectSource {
    /// Create a provider source. Fails when no API key is configured.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            DataFetchError::InvalidArgument(format!(
                "no API key configured (set {})",
                config::ENV_API_KEY
            ))
        })?;
        Ok(Self {
            client: build_client(config.timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            symbol: config.symbol.clone(),
            period: config.period.clone(),
            api_key,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Endpoint without the credential-bearing query string.
    pub fn endpoint(&self) -> String {
        format!("{}/income-statement/{}", self.base_url, self.symbol)
    }
}

impl IncomeSource for DirectSource {
    fn fetch_income_statements(&self, _filter: &FilterSpec) -> Result<Vec<FinancialRecord>> {
        let url = self.endpoint();
        debug!(symbol = %self.symbol, period = %self.period, "fetching income statements");
        let query = [
            ("period", self.period.as_str()),
            ("apikey", self.api_key.as_str()),
        ];
        let payload = get_json(&self.client, &url, &query)?;
        parse_payload(payload)
    }
}

// ---------------------------------------------------------------------------
// ProxySource: backend that filters server side
// ---------------------------------------------------------------------------

/// Talks to a backend proxy that applies the filter itself:
/// `GET {backend}/financial-data?start_year=..&revenue_min=..`.
pub struct ProxySource {
    client: Client,
    backend_url: String,
}

impl ProxySource {
    /// Create a proxy source. Fails when no backend URL is configured.
    pub fn new(config: &Config) -> Result<Self> {
        let backend_url = config.backend_url.as_deref().ok_or_else(|| {
            DataFetchError::InvalidArgument(format!(
                "no backend URL configured (set {})",
                config::ENV_BACKEND_URL
            ))
        })?;
        Ok(Self {
            client: build_client(config.timeout)?,
            backend_url: backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.backend_url, config::PROXY_PATH)
    }
}

impl IncomeSource for ProxySource {
    fn fetch_income_statements(&self, filter: &FilterSpec) -> Result<Vec<FinancialRecord>> {
        let url = self.endpoint();
        let query = filter.query_pairs();
        debug!(url = %url, bounds = query.len(), "fetching filtered income statements");
        let payload = get_json(&self.client, &url, &query)?;
        parse_payload(payload)
    }

    fn filters_remotely(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?)
}

fn get_json<Q: serde::Serialize + ?Sized>(client: &Client, url: &str, query: &Q) -> Result<Value> {
    let resp = client.get(url).query(query).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(DataFetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let text = resp.text()?;
    Ok(serde_json::from_str(&text)?)
}
