//! Results table: one row per visible record, sortable headers with an arrow
//! on the active column, and a single placeholder row when nothing matches.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::controller::ViewState;
use crate::models::{FinancialRecord, SortKey, SortSpec};

/// Text of the row shown in place of an empty body.
pub const PLACEHOLDER: &str = "No data available.";

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Revenue,
    NetIncome,
    GrossProfit,
    Eps,
    OperatingIncome,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Date,
        Column::Revenue,
        Column::NetIncome,
        Column::GrossProfit,
        Column::Eps,
        Column::OperatingIncome,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Revenue => "Revenue",
            Column::NetIncome => "Net Income",
            Column::GrossProfit => "Gross Profit",
            Column::Eps => "EPS",
            Column::OperatingIncome => "Operating Income",
        }
    }

    /// The sort key behind this column; display-only columns have none.
    pub fn sort_key(&self) -> Option<SortKey> {
        match self {
            Column::Date => Some(SortKey::Date),
            Column::Revenue => Some(SortKey::Revenue),
            Column::NetIncome => Some(SortKey::NetIncome),
            Column::GrossProfit | Column::Eps | Column::OperatingIncome => None,
        }
    }

    fn cell(&self, record: &FinancialRecord) -> String {
        match self {
            Column::Date => record.date.clone(),
            Column::Revenue => format_amount(record.revenue),
            Column::NetIncome => format_amount(record.net_income),
            Column::GrossProfit => record.gross_profit.map_or_else(missing, format_amount),
            Column::Eps => record.eps.map_or_else(missing, |v| v.to_string()),
            Column::OperatingIncome => record.operating_income.map_or_else(missing, format_amount),
        }
    }
}

fn missing() -> String {
    "-".to_string()
}

// ---------------------------------------------------------------------------
// ResultsTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column: Column,
    pub text: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Record(Vec<String>),
    Placeholder,
}

/// Render model for the visible set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsTable {
    headers: Vec<HeaderCell>,
    rows: Vec<TableRow>,
}

impl ResultsTable {
    pub fn from_state(state: &ViewState) -> Self {
        Self::build(state.visible(), state.sort())
    }

    /// Build the table for `records`, in the order given.
    pub fn build(records: &[FinancialRecord], sort: &SortSpec) -> Self {
        let headers = Column::ALL
            .iter()
            .map(|&column| {
                let indicator = column.sort_key().and_then(|key| sort.indicator(key));
                let text = match indicator {
                    Some(arrow) => format!("{} {}", column.label(), arrow),
                    None => column.label().to_string(),
                };
                HeaderCell {
                    column,
                    text,
                    active: indicator.is_some(),
                }
            })
            .collect();

        let rows = if records.is_empty() {
            vec![TableRow::Placeholder]
        } else {
            records
                .iter()
                .map(|r| TableRow::Record(Column::ALL.iter().map(|c| c.cell(r)).collect()))
                .collect()
        };

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[HeaderCell] {
        &self.headers
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Header click at `index`: the sort key to request, if the column is
    /// sortable.
    pub fn click(&self, index: usize) -> Option<SortKey> {
        self.headers.get(index)?.column.sort_key()
    }

    pub fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(self.headers.iter().map(|h| {
                let cell = Cell::new(&h.text);
                if h.active {
                    cell.fg(Color::Cyan)
                } else {
                    cell.fg(Color::White)
                }
            }));

        for row in &self.rows {
            match row {
                TableRow::Record(cells) => {
                    table.add_row(cells.iter().map(Cell::new));
                }
                TableRow::Placeholder => {
                    let mut cells = vec![Cell::new(PLACEHOLDER).fg(Color::DarkGrey)];
                    cells.extend((1..Column::ALL.len()).map(|_| Cell::new("")));
                    table.add_row(cells);
                }
            }
        }

        table.to_string()
    }
}

/// Format an amount with en-US thousands grouping and at most three
/// fraction digits, e.g. `-1234567.5` -> `-1,234,567.5`.
pub fn format_amount(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d as char);
    }

    let negative = value < 0.0 && (grouped != "0" || !frac.is_empty());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}
