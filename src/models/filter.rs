use serde::{Deserialize, Serialize};

use super::record::FinancialRecord;

// ---------------------------------------------------------------------------
// FilterSpec: inclusive range constraints submitted from the form
// ---------------------------------------------------------------------------

/// Six independently optional inclusive bounds.
///
/// `None` means "no constraint on that dimension". Field names double as the
/// proxy backend's query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income_max: Option<f64>,
}

impl FilterSpec {
    /// A spec with every bound unset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_year(mut self, year: i32) -> Self {
        self.start_year = Some(year);
        self
    }

    pub fn end_year(mut self, year: i32) -> Self {
        self.end_year = Some(year);
        self
    }

    pub fn revenue_min(mut self, value: f64) -> Self {
        self.revenue_min = Some(value);
        self
    }

    pub fn revenue_max(mut self, value: f64) -> Self {
        self.revenue_max = Some(value);
        self
    }

    pub fn net_income_min(mut self, value: f64) -> Self {
        self.net_income_min = Some(value);
        self
    }

    pub fn net_income_max(mut self, value: f64) -> Self {
        self.net_income_max = Some(value);
        self
    }

    /// True when no bound is set.
    pub fn is_unconstrained(&self) -> bool {
        self.bounds().is_empty()
    }

    /// The set bounds, in field order.
    pub fn bounds(&self) -> Vec<Bound> {
        [
            self.start_year.map(Bound::StartYear),
            self.end_year.map(Bound::EndYear),
            self.revenue_min.map(Bound::RevenueMin),
            self.revenue_max.map(Bound::RevenueMax),
            self.net_income_min.map(Bound::NetIncomeMin),
            self.net_income_max.map(Bound::NetIncomeMax),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// True when `record` satisfies every set bound.
    pub fn matches(&self, record: &FinancialRecord) -> bool {
        self.bounds().iter().all(|b| b.admits(record))
    }

    /// Query-string pairs for the proxy backend. Unset bounds are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.bounds()
            .iter()
            .map(|b| (b.param(), b.value_string()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Bound: a single inclusive predicate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    StartYear(i32),
    EndYear(i32),
    RevenueMin(f64),
    RevenueMax(f64),
    NetIncomeMin(f64),
    NetIncomeMax(f64),
}

impl Bound {
    /// Inclusive range test. Records with an unparseable year fail every
    /// year bound; NaN amounts fail every amount bound.
    pub fn admits(&self, record: &FinancialRecord) -> bool {
        match *self {
            Bound::StartYear(y) => record.year().is_some_and(|year| year >= y),
            Bound::EndYear(y) => record.year().is_some_and(|year| year <= y),
            Bound::RevenueMin(v) => record.revenue >= v,
            Bound::RevenueMax(v) => record.revenue <= v,
            Bound::NetIncomeMin(v) => record.net_income >= v,
            Bound::NetIncomeMax(v) => record.net_income <= v,
        }
    }

    pub fn param(&self) -> &'static str {
        match self {
            Bound::StartYear(_) => "start_year",
            Bound::EndYear(_) => "end_year",
            Bound::RevenueMin(_) => "revenue_min",
            Bound::RevenueMax(_) => "revenue_max",
            Bound::NetIncomeMin(_) => "net_income_min",
            Bound::NetIncomeMax(_) => "net_income_max",
        }
    }

    fn value_string(&self) -> String {
        match *self {
            Bound::StartYear(y) | Bound::EndYear(y) => y.to_string(),
            Bound::RevenueMin(v)
            | Bound::RevenueMax(v)
            | Bound::NetIncomeMin(v)
            | Bound::NetIncomeMax(v) => v.to_string(),
        }
    }
}
