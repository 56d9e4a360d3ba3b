use crate::data::filter::Subset;

use super::roles::RoleMap;
use super::trend::{aggregate, classify};

/// Narrative for a subset with no rows.
pub const NO_DATA_MESSAGE: &str = "No data available for the requested area or query.";

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Price statistics over a subset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub mean: f64,
    pub median: f64,
    /// Mean price within the latest year present, when it has prices.
    pub recent: Option<f64>,
}

pub fn price_stats(subset: &Subset<'_>, price_col: &str, year_col: Option<&str>) -> Option<PriceStats> {
    let prices: Vec<f64> = subset.values(price_col).filter_map(|v| v.as_f64()).collect();
    let recent = year_col.and_then(|year_col| recent_year_mean(subset, year_col, price_col));
    Some(PriceStats {
        mean: mean(&prices)?,
        median: median(&prices)?,
        recent,
    })
}

/// Mean of `metric_col` restricted to the maximum year in `year_col`.
pub fn recent_year_mean(subset: &Subset<'_>, year_col: &str, metric_col: &str) -> Option<f64> {
    let latest = subset.values(year_col).filter_map(|v| v.as_year()).max()?;
    let values: Vec<f64> = subset
        .rows()
        .filter(|row| row.get(year_col).and_then(|v| v.as_year()) == Some(latest))
        .filter_map(|row| row.get(metric_col).and_then(|v| v.as_f64()))
        .collect();
    mean(&values)
}

// ---------------------------------------------------------------------------
// Narrative
// ---------------------------------------------------------------------------

/// Sentiment word for the closing recommendation.
///
/// Deliberately crude: looks for the literal word "rising" anywhere in the
/// text assembled so far instead of re-reading the statistics.
pub fn recommendation_sentiment(assembled: &str) -> &'static str {
    if assembled.contains("rising") {
        "positive"
    } else {
        "mixed"
    }
}

/// Render the fixed-template summary of a subset.
///
/// Sentences, in order: optional area header, price statistics, average
/// demand, price trend, recommendation. Prices are rounded to integers and
/// demand to one decimal.
pub fn summarize(subset: &Subset<'_>, roles: &RoleMap, area_label: Option<&str>) -> String {
    if subset.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    let price_col = roles.price();
    let year_col = roles.year();
    let demand_col = roles.demand();

    let mut lines: Vec<String> = Vec::new();
    if let Some(area) = area_label {
        lines.push(format!("Analysis for **{area}**:"));
    }

    if let Some(stats) = price_col.and_then(|col| price_stats(subset, col, year_col)) {
        // A latest-year mean of exactly zero reads as "no figure".
        lines.push(match stats.recent.filter(|r| *r != 0.0) {
            Some(recent) => format!(
                "Average price (most recent year) ≈ {recent:.0}. Overall mean ≈ {:.0} and median ≈ {:.0}.",
                stats.mean, stats.median
            ),
            None => format!(
                "Average price ≈ {:.0} and median ≈ {:.0}.",
                stats.mean, stats.median
            ),
        });
    }

    if let Some(col) = demand_col {
        let demand: Vec<f64> = subset.values(col).filter_map(|v| v.as_f64()).collect();
        if let Some(avg) = mean(&demand) {
            lines.push(format!("Average demand score ≈ {avg:.1}."));
        }
    }

    let series = aggregate(subset, year_col, price_col);
    if let Some((direction, pct)) = classify(&series) {
        lines.push(format!(
            "Price trend over the period is {} ({pct:.1}% change from first to last recorded year).",
            direction.as_str()
        ));
    }

    let sentiment = if price_col.is_some() && year_col.is_some() {
        recommendation_sentiment(&lines.join(" "))
    } else {
        "mixed"
    };
    lines.push(format!(
        "Recommendation: this locality shows {sentiment} signals for investment; combine with on-ground checks."
    ));

    lines.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::roles::resolve_roles;
    use crate::data::filter::filter_rows;
    use crate::data::model::{CellValue, Dataset, Row};

    fn sample() -> Dataset {
        let data = [
            ("Wakad", 2020, Some(100.0), Some(4.0)),
            ("Wakad", 2020, Some(200.0), Some(5.0)),
            ("Wakad", 2021, None, Some(6.0)),
            ("Wakad", 2022, Some(180.0), None),
            ("Aundh", 2022, Some(90.0), Some(2.0)),
        ];
        let rows: Vec<Row> = data
            .iter()
            .map(|(area, year, price, demand)| {
                [
                    ("Locality".to_string(), CellValue::String(area.to_string())),
                    ("Year".to_string(), CellValue::Integer(*year)),
                    ("Price".to_string(), price.map_or(CellValue::Null, CellValue::Float)),
                    ("Demand".to_string(), demand.map_or(CellValue::Null, CellValue::Float)),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        Dataset::new(
            vec!["Locality".into(), "Year".into(), "Price".into(), "Demand".into()],
            rows,
        )
    }

    #[test]
    fn mean_and_median_skip_empty_input() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn price_stats_ignore_missing_values() {
        let ds = sample();
        let subset = filter_rows(&ds, "Locality", "wakad");
        let stats = price_stats(&subset, "Price", Some("Year")).unwrap();
        assert_eq!(stats.mean, 160.0);
        assert_eq!(stats.median, 180.0);
        assert_eq!(stats.recent, Some(180.0));
    }

    #[test]
    fn narrative_for_rising_locality() {
        let ds = sample();
        let roles = resolve_roles(&ds.column_names);
        let subset = filter_rows(&ds, "Locality", "wakad");
        let text = summarize(&subset, &roles, Some("Wakad"));
        assert_eq!(
            text,
            "Analysis for **Wakad**: \
             Average price (most recent year) ≈ 180. Overall mean ≈ 160 and median ≈ 180. \
             Average demand score ≈ 5.0. \
             Price trend over the period is rising (20.0% change from first to last recorded year). \
             Recommendation: this locality shows positive signals for investment; combine with on-ground checks."
        );
    }

    #[test]
    fn single_year_has_no_trend_sentence() {
        let ds = sample();
        let roles = resolve_roles(&ds.column_names);
        let subset = filter_rows(&ds, "Locality", "aundh");
        let text = summarize(&subset, &roles, None);
        assert!(!text.contains("Price trend"));
        assert!(text.starts_with("Average price (most recent year) ≈ 90."));
        assert!(text.ends_with("shows mixed signals for investment; combine with on-ground checks."));
    }

    #[test]
    fn empty_subset_short_circuits() {
        let ds = sample();
        let roles = resolve_roles(&ds.column_names);
        let subset = filter_rows(&ds, "Locality", "nowhere");
        assert_eq!(summarize(&subset, &roles, Some("Nowhere")), NO_DATA_MESSAGE);
    }

    #[test]
    fn zero_recent_year_mean_uses_overall_sentence() {
        let rows: Vec<Row> = [(2020, 100), (2021, 0)]
            .iter()
            .map(|(year, price)| {
                [
                    ("Locality".to_string(), CellValue::String("Baner".into())),
                    ("Year".to_string(), CellValue::Integer(*year)),
                    ("Price".to_string(), CellValue::Integer(*price)),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        let ds = Dataset::new(vec!["Locality".into(), "Year".into(), "Price".into()], rows);
        let roles = resolve_roles(&ds.column_names);
        let text = summarize(&Subset::all(&ds), &roles, None);
        assert!(text.starts_with("Average price ≈ 50 and median ≈ 50."), "{text}");
        assert!(!text.contains("most recent year"));
    }

    #[test]
    fn sentiment_is_a_plain_substring_check() {
        assert_eq!(recommendation_sentiment("trend is rising"), "positive");
        assert_eq!(recommendation_sentiment("trend is stable"), "mixed");
        assert_eq!(recommendation_sentiment("Analysis for **Sunrising Park**:"), "positive");
    }

    #[test]
    fn without_year_column_sentiment_stays_mixed() {
        let rows: Vec<Row> = vec![[
            ("area".to_string(), CellValue::String("rising heights".into())),
            ("price".to_string(), CellValue::Integer(10)),
        ]
        .into_iter()
        .collect()];
        let ds = Dataset::new(vec!["area".into(), "price".into()], rows);
        let roles = resolve_roles(&ds.column_names);
        let text = summarize(&Subset::all(&ds), &roles, Some("rising"));
        assert!(text.contains("Average price ≈ 10 and median ≈ 10."));
        assert!(text.contains("shows mixed signals"));
    }
}
