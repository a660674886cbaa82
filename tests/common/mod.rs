//! Shared test fixtures for the income explorer integration tests.
//!
//! Provides sample statement series, an in-process [`FixtureSource`] that
//! never touches the network, and a loopback [`StubServer`] that answers the
//! blocking HTTP client with a canned response.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use income_explorer::{
    apply_filters, Config, DataFetchError, FilterSpec, FinancialRecord, IncomeSource,
};

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

/// Three fiscal years, deliberately out of date order.
pub fn sample_records() -> Vec<FinancialRecord> {
    vec![
        FinancialRecord::new("2022-09-24", 394328.0, 99803.0)
            .with_gross_profit(170782.0)
            .with_eps(6.15)
            .with_operating_income(119437.0),
        FinancialRecord::new("2021-09-25", 365817.0, 94680.0)
            .with_gross_profit(152836.0)
            .with_eps(5.67)
            .with_operating_income(108949.0),
        FinancialRecord::new("2023-09-30", 383285.0, 96995.0)
            .with_gross_profit(169148.0)
            .with_eps(6.16)
            .with_operating_income(114301.0),
    ]
}

/// A longer series including a loss year and a malformed date.
pub fn wide_records() -> Vec<FinancialRecord> {
    let mut records = sample_records();
    records.extend([
        FinancialRecord::new("2019-09-28", 260174.0, 55256.0),
        FinancialRecord::new("2020-09-26", 274515.0, 57411.0),
        FinancialRecord::new("2008-12-31", 32479.0, -4834.0),
        FinancialRecord::new("garbage", 100000.0, 1000.0),
    ]);
    records
}

/// Provider-shaped JSON for [`sample_records`], with extra fields the
/// adapter is expected to ignore.
pub fn sample_payload() -> serde_json::Value {
    serde_json::json!([
        {
            "date": "2022-09-24",
            "symbol": "AAPL",
            "reportedCurrency": "USD",
            "revenue": 394328,
            "netIncome": 99803,
            "grossProfit": 170782,
            "eps": 6.15,
            "operatingIncome": 119437
        },
        {
            "date": "2021-09-25",
            "symbol": "AAPL",
            "reportedCurrency": "USD",
            "revenue": 365817,
            "netIncome": 94680,
            "grossProfit": 152836,
            "eps": 5.67,
            "operatingIncome": 108949
        },
        {
            "date": "2023-09-30",
            "symbol": "AAPL",
            "reportedCurrency": "USD",
            "revenue": 383285,
            "netIncome": 96995,
            "grossProfit": 169148,
            "eps": 6.16,
            "operatingIncome": 114301
        }
    ])
}

pub fn revenues(records: &[FinancialRecord]) -> Vec<f64> {
    records.iter().map(|r| r.revenue).collect()
}

pub fn dates(records: &[FinancialRecord]) -> Vec<&str> {
    records.iter().map(|r| r.date.as_str()).collect()
}

// ---------------------------------------------------------------------------
// FixtureSource
// ---------------------------------------------------------------------------

/// In-memory [`IncomeSource`] that counts calls and remembers the filters it
/// was asked for.
pub struct FixtureSource {
    records: Vec<FinancialRecord>,
    fail_status: Option<u16>,
    remote: bool,
    delay: Option<Duration>,
    panics: bool,
    pub calls: Arc<AtomicUsize>,
    pub filters: Arc<Mutex<Vec<FilterSpec>>>,
}

impl FixtureSource {
    pub fn ok(records: Vec<FinancialRecord>) -> Self {
        Self {
            records,
            fail_status: None,
            remote: false,
            delay: None,
            panics: false,
            calls: Arc::new(AtomicUsize::new(0)),
            filters: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::ok(Vec::new())
        }
    }

    /// Behave like a proxy backend: apply the filter before returning.
    pub fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    /// Block the calling thread for `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Panic inside the fetch instead of answering.
    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IncomeSource for FixtureSource {
    fn fetch_income_statements(
        &self,
        filter: &FilterSpec,
    ) -> income_explorer::Result<Vec<FinancialRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.filters.lock().unwrap().push(*filter);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if self.panics {
            panic!("fixture source panicked");
        }
        if let Some(status) = self.fail_status {
            return Err(DataFetchError::Status {
                status,
                url: "fixture://income-statement".to_string(),
            });
        }
        if self.remote {
            Ok(apply_filters(&self.records, filter))
        } else {
            Ok(self.records.clone())
        }
    }

    fn filters_remotely(&self) -> bool {
        self.remote
    }
}

// ---------------------------------------------------------------------------
// StubServer
// ---------------------------------------------------------------------------

/// Loopback HTTP server answering every request with the same response.
///
/// Request lines (`GET /path?query HTTP/1.1`) are captured for assertions.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                seen.lock().unwrap().push(request_line.trim_end().to_string());

                // Drain headers; GET requests carry no body.
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line) {
                        Ok(0) => break,
                        Ok(_) if line == "\r\n" || line == "\n" => break,
                        Ok(_) => continue,
                        Err(_) => break,
                    }
                }

                let response = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    if status < 400 { "OK" } else { "Error" },
                    body.len(),
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Provider config pointing at this server.
    pub fn direct_config(&self) -> Config {
        Config {
            api_key: Some("test-key".to_string()),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(5),
            ..Config::default()
        }
    }

    /// Proxy config pointing at this server.
    pub fn proxy_config(&self) -> Config {
        Config {
            backend_url: Some(self.base_url.clone()),
            timeout: Duration::from_secs(5),
            ..Config::default()
        }
    }
}
