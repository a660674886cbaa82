use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use income_explorer::{
    apply_filters, apply_sort, FilterSpec, FinancialRecord, IncomeSource, SortKey, SortOrder,
    SortSpec,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FinancialDataParams {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub revenue_min: Option<f64>,
    pub revenue_max: Option<f64>,
    pub net_income_min: Option<f64>,
    pub net_income_max: Option<f64>,
    pub sort_key: Option<String>,
    pub sort_order: Option<String>,
}

impl FinancialDataParams {
    fn filter(&self) -> FilterSpec {
        FilterSpec {
            start_year: self.start_year,
            end_year: self.end_year,
            revenue_min: self.revenue_min,
            revenue_max: self.revenue_max,
            net_income_min: self.net_income_min,
            net_income_max: self.net_income_max,
        }
    }

    /// `None` when no `sort_key` was given: the upstream order is kept.
    fn sort(&self) -> Result<Option<SortSpec>, AppError> {
        let Some(raw_key) = self.sort_key.as_deref() else {
            return Ok(None);
        };
        let key: SortKey = raw_key
            .parse()
            .map_err(|e| AppError::bad_request(format!("{e}")))?;
        let order: SortOrder = self
            .sort_order
            .as_deref()
            .unwrap_or("asc")
            .parse()
            .map_err(|e| AppError::bad_request(format!("{e}")))?;
        Ok(Some(SortSpec::new(key, order)))
    }
}

/// GET /financial-data?start_year=2020&revenue_min=300000&sort_key=revenue&sort_order=desc
///
/// Fetch the full series from the provider, then filter and optionally sort
/// it with the same engine the client uses.
pub async fn get_financial_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FinancialDataParams>,
) -> Result<Json<Vec<FinancialRecord>>, AppError> {
    let sort = params.sort()?;
    let filter = params.filter();

    let source = state.source.clone();
    let records = tokio::task::spawn_blocking(move || {
        source.fetch_income_statements(&FilterSpec::default())
    })
    .await
    .map_err(|e| AppError::internal(format!("Task join error: {e}")))??;

    let filtered = apply_filters(&records, &filter);
    let body = match sort {
        Some(spec) => apply_sort(&filtered, &spec),
        None => filtered,
    };

    debug!(
        upstream = records.len(),
        returned = body.len(),
        "served financial data"
    );
    Ok(Json(body))
}
