use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::Subset;

/// Mean of a metric for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i64,
    pub value: f64,
}

/// Year-ordered series, strictly increasing by year.
pub type TrendSeries = Vec<TrendPoint>;

/// Group `subset` by year and average `metric_column` within each year.
///
/// Rows whose year or metric is missing or cannot be coerced are skipped
/// individually. An unresolved column yields an empty series.
pub fn aggregate(subset: &Subset<'_>, year_column: Option<&str>, metric_column: Option<&str>) -> TrendSeries {
    let (Some(year_col), Some(metric_col)) = (year_column, metric_column) else {
        return Vec::new();
    };

    let mut groups: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    let mut skipped = 0usize;
    for row in subset.rows() {
        let year = row.get(year_col).and_then(|v| v.as_year());
        let metric = row.get(metric_col).and_then(|v| v.as_f64());
        match (year, metric) {
            (Some(year), Some(metric)) => {
                let slot = groups.entry(year).or_insert((0.0, 0));
                slot.0 += metric;
                slot.1 += 1;
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("trend of '{metric_col}' by '{year_col}': skipped {skipped} rows");
    }

    groups
        .into_iter()
        .map(|(year, (sum, count))| TrendPoint {
            year,
            value: sum / count as f64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Trend classification
// ---------------------------------------------------------------------------

/// Direction of a price series from its first to its last year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl TrendDirection {
    /// Changes beyond ±5% count as a direction.
    pub const THRESHOLD_PCT: f64 = 5.0;

    pub fn from_pct_change(pct: f64) -> Self {
        if pct > Self::THRESHOLD_PCT {
            TrendDirection::Rising
        } else if pct < -Self::THRESHOLD_PCT {
            TrendDirection::Falling
        } else {
            TrendDirection::Stable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Falling => "falling",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Percent change from the earliest to the latest point. A zero starting
/// value counts as no change.
pub fn pct_change(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    }
}

/// Classify a series; `None` with fewer than two years.
pub fn classify(series: &[TrendPoint]) -> Option<(TrendDirection, f64)> {
    match series {
        [first, .., last] => {
            let pct = pct_change(first.value, last.value);
            Some((TrendDirection::from_pct_change(pct), pct))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Dataset, Row};

    fn dataset(rows: &[(CellValue, CellValue)]) -> Dataset {
        let rows: Vec<Row> = rows
            .iter()
            .map(|(y, p)| {
                [("year".to_string(), y.clone()), ("price".to_string(), p.clone())]
                    .into_iter()
                    .collect()
            })
            .collect();
        Dataset::new(vec!["year".into(), "price".into()], rows)
    }

    #[test]
    fn averages_per_year_in_ascending_order() {
        let ds = dataset(&[
            (CellValue::Integer(2021), CellValue::Integer(150)),
            (CellValue::Integer(2020), CellValue::Integer(100)),
            (CellValue::Integer(2020), CellValue::Integer(200)),
        ]);
        let series = aggregate(&Subset::all(&ds), Some("year"), Some("price"));
        assert_eq!(
            series,
            vec![
                TrendPoint { year: 2020, value: 150.0 },
                TrendPoint { year: 2021, value: 150.0 },
            ]
        );
    }

    #[test]
    fn bad_rows_are_skipped_individually() {
        let ds = dataset(&[
            (CellValue::Integer(2020), CellValue::Float(10.0)),
            (CellValue::String("unknown".into()), CellValue::Float(99.0)),
            (CellValue::Integer(2020), CellValue::String("n/a".into())),
            (CellValue::Null, CellValue::Float(5.0)),
            (CellValue::Integer(2022), CellValue::Float(30.0)),
        ]);
        let series = aggregate(&Subset::all(&ds), Some("year"), Some("price"));
        assert_eq!(
            series,
            vec![
                TrendPoint { year: 2020, value: 10.0 },
                TrendPoint { year: 2022, value: 30.0 },
            ]
        );
    }

    #[test]
    fn unresolved_column_gives_empty_series() {
        let ds = dataset(&[(CellValue::Integer(2020), CellValue::Float(1.0))]);
        assert!(aggregate(&Subset::all(&ds), None, Some("price")).is_empty());
        assert!(aggregate(&Subset::all(&ds), Some("year"), None).is_empty());
    }

    #[test]
    fn aggregation_is_repeatable() {
        let ds = dataset(&[
            (CellValue::Integer(2020), CellValue::Float(0.1)),
            (CellValue::Integer(2020), CellValue::Float(0.2)),
            (CellValue::Integer(2021), CellValue::Float(0.3)),
        ]);
        let subset = Subset::all(&ds);
        let a = aggregate(&subset, Some("year"), Some("price"));
        let b = aggregate(&subset, Some("year"), Some("price"));
        let bits = |s: &TrendSeries| s.iter().map(|p| p.value.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(TrendDirection::from_pct_change(5.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_pct_change(5.1), TrendDirection::Rising);
        assert_eq!(TrendDirection::from_pct_change(-5.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_pct_change(-5.1), TrendDirection::Falling);
    }

    #[test]
    fn zero_start_counts_as_no_change() {
        assert_eq!(pct_change(0.0, 500.0), 0.0);
    }

    #[test]
    fn classify_needs_two_years() {
        let one = vec![TrendPoint { year: 2020, value: 1.0 }];
        assert_eq!(classify(&one), None);

        let two = vec![
            TrendPoint { year: 2020, value: 100.0 },
            TrendPoint { year: 2023, value: 120.0 },
        ];
        let (direction, pct) = classify(&two).unwrap();
        assert_eq!(direction, TrendDirection::Rising);
        assert!((pct - 20.0).abs() < 1e-9);
    }
}
