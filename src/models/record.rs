use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DataFetchError, Result};

// ---------------------------------------------------------------------------
// FinancialRecord: one reporting period of an income statement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub date: String,
    pub revenue: f64,
    pub net_income: f64,
    pub gross_profit: Option<f64>,
    pub eps: Option<f64>,
    pub operating_income: Option<f64>,
}

impl FinancialRecord {
    /// Create a record carrying only the fields the filter and sort engine
    /// look at. Display-only fields start out unset.
    pub fn new(date: impl Into<String>, revenue: f64, net_income: f64) -> Self {
        Self {
            date: date.into(),
            revenue,
            net_income,
            gross_profit: None,
            eps: None,
            operating_income: None,
        }
    }

    pub fn with_gross_profit(mut self, value: f64) -> Self {
        self.gross_profit = Some(value);
        self
    }

    pub fn with_eps(mut self, value: f64) -> Self {
        self.eps = Some(value);
        self
    }

    pub fn with_operating_income(mut self, value: f64) -> Self {
        self.operating_income = Some(value);
        self
    }

    /// Calendar year: the integer before the first `-` of `date`.
    ///
    /// Returns `None` when that segment is not an integer.
    pub fn year(&self) -> Option<i32> {
        self.date.split('-').next()?.trim().parse().ok()
    }

    /// The reporting date as an instant, or `None` if `date` is malformed.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        let raw = self.date.trim();
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return day.and_hms_opt(0, 0, 0);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(dt);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.naive_utc())
    }
}

// ---------------------------------------------------------------------------
// Payload validation
// ---------------------------------------------------------------------------

/// Validate a raw provider payload and map it into typed records.
///
/// `date`, `revenue` and `netIncome` are required; the first record missing
/// one of them fails the whole payload. `grossProfit`, `eps` and
/// `operatingIncome` are optional and become `None` when absent or not
/// numeric. Numeric strings are accepted wherever a number is expected.
pub fn parse_payload(payload: Value) -> Result<Vec<FinancialRecord>> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(obj) => {
            let reason = match obj.get("Error Message").and_then(Value::as_str) {
                Some(msg) => format!("expected a JSON array, provider said: {msg}"),
                None => "expected a JSON array, got an object".to_string(),
            };
            return Err(DataFetchError::schema(0, "<root>", reason));
        }
        other => {
            return Err(DataFetchError::schema(
                0,
                "<root>",
                format!("expected a JSON array, got {}", json_kind(&other)),
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_record(index, item))
        .collect()
}

fn parse_record(index: usize, item: &Value) -> Result<FinancialRecord> {
    let obj = item.as_object().ok_or_else(|| {
        DataFetchError::schema(
            index,
            "<record>",
            format!("expected an object, got {}", json_kind(item)),
        )
    })?;

    let date = match obj.get("date") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(DataFetchError::schema(
                index,
                "date",
                format!("expected a string, got {}", json_kind(other)),
            ))
        }
        None => return Err(DataFetchError::schema(index, "date", "is missing")),
    };

    Ok(FinancialRecord {
        date,
        revenue: required_number(index, obj, "revenue")?,
        net_income: required_number(index, obj, "netIncome")?,
        gross_profit: optional_number(obj, "grossProfit"),
        eps: optional_number(obj, "eps"),
        operating_income: optional_number(obj, "operatingIncome"),
    })
}

fn required_number(index: usize, obj: &Map<String, Value>, field: &str) -> Result<f64> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(DataFetchError::schema(index, field, "is missing")),
        Some(value) => as_number(value).ok_or_else(|| {
            DataFetchError::schema(
                index,
                field,
                format!("expected a number, got {}", json_kind(value)),
            )
        }),
    }
}

fn optional_number(obj: &Map<String, Value>, field: &str) -> Option<f64> {
    obj.get(field).and_then(as_number)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
