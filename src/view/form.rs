//! Filter form: six optional numeric inputs, packaged into a [`FilterSpec`]
//! only on explicit submission.

use crate::models::FilterSpec;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: '{value}' is not a valid {expected}")]
pub struct FormError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

// ---------------------------------------------------------------------------
// FormField
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    StartYear,
    EndYear,
    RevenueMin,
    RevenueMax,
    NetIncomeMin,
    NetIncomeMax,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::StartYear,
        FormField::EndYear,
        FormField::RevenueMin,
        FormField::RevenueMax,
        FormField::NetIncomeMin,
        FormField::NetIncomeMax,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::StartYear => "Start Year",
            FormField::EndYear => "End Year",
            FormField::RevenueMin => "Revenue Min",
            FormField::RevenueMax => "Revenue Max",
            FormField::NetIncomeMin => "Net Income Min",
            FormField::NetIncomeMax => "Net Income Max",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::StartYear => "e.g. 2020",
            FormField::EndYear => "e.g. 2024",
            FormField::RevenueMin => "e.g. 50000000",
            FormField::RevenueMax => "e.g. 100000000",
            FormField::NetIncomeMin => "e.g. 10000000",
            FormField::NetIncomeMax => "e.g. 50000000",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

// ---------------------------------------------------------------------------
// FilterForm
// ---------------------------------------------------------------------------

/// Transient input state. Typing never filters; [`submit`](Self::submit)
/// does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    inputs: [String; 6],
}

impl FilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the inputs from an existing spec.
    pub fn from_spec(spec: &FilterSpec) -> Self {
        let mut form = Self::new();
        let years = [
            (FormField::StartYear, spec.start_year),
            (FormField::EndYear, spec.end_year),
        ];
        for (field, year) in years {
            if let Some(y) = year {
                form.set(field, y.to_string());
            }
        }
        let amounts = [
            (FormField::RevenueMin, spec.revenue_min),
            (FormField::RevenueMax, spec.revenue_max),
            (FormField::NetIncomeMin, spec.net_income_min),
            (FormField::NetIncomeMax, spec.net_income_max),
        ];
        for (field, amount) in amounts {
            if let Some(v) = amount {
                form.set(field, v.to_string());
            }
        }
        form
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.inputs[field.index()] = value.into();
    }

    pub fn get(&self, field: FormField) -> &str {
        &self.inputs[field.index()]
    }

    pub fn clear(&mut self) {
        self.inputs = Default::default();
    }

    /// Package the inputs into a fresh [`FilterSpec`].
    ///
    /// Blank inputs become unset bounds. Years must be integers; amounts must
    /// be finite decimals.
    pub fn submit(&self) -> Result<FilterSpec, FormError> {
        Ok(FilterSpec {
            start_year: self.year(FormField::StartYear)?,
            end_year: self.year(FormField::EndYear)?,
            revenue_min: self.amount(FormField::RevenueMin)?,
            revenue_max: self.amount(FormField::RevenueMax)?,
            net_income_min: self.amount(FormField::NetIncomeMin)?,
            net_income_max: self.amount(FormField::NetIncomeMax)?,
        })
    }

    fn year(&self, field: FormField) -> Result<Option<i32>, FormError> {
        let raw = self.get(field).trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<i32>()
            .map(Some)
            .map_err(|_| self.invalid(field, "year"))
    }

    fn amount(&self, field: FormField) -> Result<Option<f64>, FormError> {
        let raw = self.get(field).trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid(field, "number")),
        }
    }

    fn invalid(&self, field: FormField, expected: &'static str) -> FormError {
        FormError {
            field: field.label(),
            value: self.get(field).to_string(),
            expected,
        }
    }
}
