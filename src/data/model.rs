use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what spreadsheets and CSV files
/// carry. Missing values (empty cells, NaN) are `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

impl CellValue {
    /// Build a float cell, mapping NaN to `Null` the way dataframes do.
    pub fn float(v: f64) -> Self {
        if v.is_nan() {
            CellValue::Null
        } else {
            CellValue::Float(v)
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Text a free-text query is matched against. `None` when missing.
    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        Some(match self {
            CellValue::String(s) | CellValue::Date(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Null => return None,
        })
    }

    /// Coerce to a floating point metric. Numeric text is parsed; anything
    /// else (including missing) yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Bool(b) => f64::from(u8::from(*b)),
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Date(_) | CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Coerce to a calendar year. Fractional numbers truncate, dates yield
    /// their year component.
    pub fn as_year(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            CellValue::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
                    .or_else(|| leading_year(s))
            }
            CellValue::Date(d) => leading_year(d),
            _ => None,
        }
    }

    /// Whether the value is text (the dataframe "object" dtype).
    pub fn is_textual(&self) -> bool {
        matches!(self, CellValue::String(_))
    }
}

/// `YYYY-MM-DD…` → `YYYY`.
fn leading_year(s: &str) -> Option<i64> {
    if looks_like_iso_date(s) {
        s[..4].parse().ok()
    } else {
        None
    }
}

/// Cheap check for an ISO `YYYY-MM-DD` prefix.
pub fn looks_like_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.is_nan() => Ok(()),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

/// Table payloads render missing values as `""` so JSON consumers never see
/// `null` (or an invalid `NaN`).
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) | CellValue::Date(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Float(_) | CellValue::Null => serializer.serialize_str(""),
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one observation
// ---------------------------------------------------------------------------

/// One row of the source sheet: column_name → value.
pub type Row = BTreeMap<String, CellValue>;

static NULL: CellValue = CellValue::Null;

// ---------------------------------------------------------------------------
// Dataset – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All rows, in source order.
    pub rows: Vec<Row>,
    /// Column names in source (left-to-right) order.
    pub column_names: Vec<String>,
}

impl Dataset {
    /// Build a dataset, padding every row with `Null` for columns it lacks
    /// so all rows share the same column set.
    pub fn new(column_names: Vec<String>, mut rows: Vec<Row>) -> Self {
        for row in &mut rows {
            for col in &column_names {
                row.entry(col.clone()).or_insert(CellValue::Null);
            }
        }
        Dataset { rows, column_names }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `idx`, `Null` if either is out of range.
    pub fn value(&self, idx: usize, column: &str) -> &CellValue {
        self.rows
            .get(idx)
            .and_then(|row| row.get(column))
            .unwrap_or(&NULL)
    }

    /// First column (in source order) holding at least one text value.
    pub fn first_textual_column(&self) -> Option<&str> {
        self.column_names
            .iter()
            .find(|col| {
                self.rows
                    .iter()
                    .any(|row| row.get(col.as_str()).is_some_and(CellValue::is_textual))
            })
            .map(String::as_str)
    }
}
