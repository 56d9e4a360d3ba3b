use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::{Subset, filter_rows};
use crate::data::model::{Dataset, Row};
use crate::error::{AnalysisError, Result};

use super::roles::{AreaColumn, RoleMap, resolve_area_column, resolve_roles};
use super::summary::summarize;
use super::trend::{TrendSeries, aggregate};

/// Rows returned per result unless the caller asks otherwise.
pub const DEFAULT_LIMIT: usize = 200;

/// Narrative of a query that matched nothing.
pub const NO_MATCHES_MESSAGE: &str = "No records found for the specified area.";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub query: String,
    pub limit: usize,
}

impl AnalyzeRequest {
    pub fn new(query: impl Into<String>) -> Self {
        AnalyzeRequest {
            query: query.into(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Parse a user-supplied row limit.
pub fn parse_limit(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| AnalysisError::InvalidLimit(raw.to_string()))
}

/// Trim labels and drop blank ones. Comma-separated entries are split.
pub fn normalize_labels<S: AsRef<str>>(labels: &[S]) -> Result<Vec<String>> {
    let labels: Vec<String> = labels
        .iter()
        .flat_map(|l| l.as_ref().split(','))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if labels.is_empty() {
        return Err(AnalysisError::NoLabels);
    }
    Ok(labels)
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Trend series keyed for charting. A series is present only when both the
/// year role and its metric role resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Chart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_trend: Option<TrendSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_trend: Option<TrendSeries>,
}

/// Everything known about one area query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub chart: Chart,
    /// Matching rows, capped at the request limit, in dataset order.
    pub table: Vec<Row>,
    /// Rows that matched before the cap.
    pub matched_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_column_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_column_used: Option<String>,
}

/// Per-label results of a comparison.
pub type ComparisonResult = BTreeMap<String, AnalysisResult>;

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Roles and area column resolved once per dataset, reused across labels.
#[derive(Debug, Clone)]
pub struct Plan {
    pub roles: RoleMap,
    pub area: AreaColumn,
}

impl Plan {
    pub fn for_dataset(dataset: &Dataset) -> Result<Self> {
        let roles = resolve_roles(&dataset.column_names);
        let area = resolve_area_column(dataset, &roles)?;
        Ok(Plan { roles, area })
    }
}

/// Answer a single-area query.
pub fn analyze(dataset: &Dataset, request: &AnalyzeRequest) -> Result<AnalysisResult> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AnalysisError::BlankQuery);
    }
    let plan = Plan::for_dataset(dataset)?;
    Ok(run(dataset, &plan, query, request.limit))
}

/// Answer one query per label, each independently of the others.
pub fn compare<S: AsRef<str>>(dataset: &Dataset, labels: &[S], limit: usize) -> Result<ComparisonResult> {
    let labels = normalize_labels(labels)?;
    let plan = Plan::for_dataset(dataset)?;
    Ok(labels
        .into_iter()
        .map(|label| {
            let result = run(dataset, &plan, &label, limit);
            (label, result)
        })
        .collect())
}

fn run(dataset: &Dataset, plan: &Plan, query: &str, limit: usize) -> AnalysisResult {
    let subset = filter_rows(dataset, &plan.area.name, query);
    log::debug!(
        "'{query}' matched {} of {} rows on '{}'",
        subset.len(),
        dataset.len(),
        plan.area.name
    );

    if subset.is_empty() {
        return AnalysisResult {
            summary: NO_MATCHES_MESSAGE.to_string(),
            chart: Chart::default(),
            table: Vec::new(),
            matched_rows: 0,
            area_column_used: Some(plan.area.name.clone()),
            price_column_used: plan.roles.price().map(str::to_string),
        };
    }

    AnalysisResult {
        summary: summarize(&subset, &plan.roles, Some(query)),
        chart: build_chart(&subset, &plan.roles),
        table: subset.rows().take(limit).cloned().collect(),
        matched_rows: subset.len(),
        area_column_used: Some(plan.area.name.clone()),
        price_column_used: plan.roles.price().map(str::to_string),
    }
}

pub fn build_chart(subset: &Subset<'_>, roles: &RoleMap) -> Chart {
    let series = |metric: Option<&str>| {
        roles
            .year()
            .and(metric)
            .map(|_| aggregate(subset, roles.year(), metric))
    };
    Chart {
        price_trend: series(roles.price()),
        demand_trend: series(roles.demand()),
    }
}
