use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::data::model::Dataset;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Roles and the keyword rule table
// ---------------------------------------------------------------------------

/// Semantic category a dataset column may represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Area,
    Year,
    Price,
    Demand,
    Size,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Area, Role::Year, Role::Price, Role::Demand, Role::Size];

    /// Lower-case keywords, any of which appearing in a column name claims
    /// the role.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Role::Area => &["area", "locality", "location", "neighbour", "local", "city"],
            Role::Year => &["year", "date"],
            Role::Price => &["price", "rate", "avg_price", "amount"],
            Role::Demand => &["demand", "interest", "queries"],
            Role::Size => &["size", "sqft", "area_size"],
        }
    }

    fn matches(self, column: &str) -> bool {
        let lower = column.to_lowercase();
        self.keywords().iter().any(|kw| lower.contains(kw))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Area => "area",
            Role::Year => "year",
            Role::Price => "price",
            Role::Demand => "demand",
            Role::Size => "size",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Role map
// ---------------------------------------------------------------------------

/// Which column (if any) plays each role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleMap(BTreeMap<Role, String>);

impl RoleMap {
    pub fn get(&self, role: Role) -> Option<&str> {
        self.0.get(&role).map(String::as_str)
    }

    pub fn area(&self) -> Option<&str> {
        self.get(Role::Area)
    }

    pub fn year(&self) -> Option<&str> {
        self.get(Role::Year)
    }

    pub fn price(&self) -> Option<&str> {
        self.get(Role::Price)
    }

    pub fn demand(&self) -> Option<&str> {
        self.get(Role::Demand)
    }

    pub fn size(&self) -> Option<&str> {
        self.get(Role::Size)
    }

    /// Roles left without a column.
    pub fn unresolved(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|r| !self.0.contains_key(r))
            .collect()
    }
}

/// Infer which column plays each role.
///
/// Columns are scanned left to right; the first column whose name contains
/// one of a role's keywords claims that role and later columns cannot take
/// it over. Roles are claimed independently, so one column may hold several
/// (`demand_price_index` is both demand and price).
pub fn resolve_roles<S: AsRef<str>>(columns: &[S]) -> RoleMap {
    let mut map = BTreeMap::new();
    for column in columns {
        let column = column.as_ref();
        for role in Role::ALL {
            if role.matches(column) {
                map.entry(role).or_insert_with(|| column.to_string());
            }
        }
    }
    log::debug!("resolved roles {map:?} from {} columns", columns.len());
    RoleMap(map)
}

// ---------------------------------------------------------------------------
// Area fallback chain
// ---------------------------------------------------------------------------

/// Column names that identify an area column only when they match exactly.
const AREA_EXACT_NAMES: &[&str] = &["final location", "final_location", "place", "name", "region"];

/// Which tier of the fallback chain produced the area column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaSource {
    /// Keyword match from [`resolve_roles`].
    Keyword,
    /// Exact match against a short list of generic place-name headers.
    ExactName,
    /// First column holding text values.
    FirstTextual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaColumn {
    pub name: String,
    pub source: AreaSource,
}

/// Tier 1: the resolver's own area role.
pub fn area_by_keyword(roles: &RoleMap) -> Option<String> {
    roles.area().map(str::to_string)
}

/// Tier 2: a column literally named like a place.
pub fn area_by_exact_name<S: AsRef<str>>(columns: &[S]) -> Option<String> {
    columns
        .iter()
        .map(|c| c.as_ref())
        .find(|c| AREA_EXACT_NAMES.contains(&c.trim().to_lowercase().as_str()))
        .map(str::to_string)
}

/// Tier 3: the first column whose values are text.
pub fn area_by_first_textual(dataset: &Dataset) -> Option<String> {
    dataset.first_textual_column().map(str::to_string)
}

/// Pick the column the row filter matches against, walking the fallback
/// chain keyword → exact name → first textual column.
pub fn resolve_area_column(dataset: &Dataset, roles: &RoleMap) -> Result<AreaColumn> {
    let found = area_by_keyword(roles)
        .map(|name| (name, AreaSource::Keyword))
        .or_else(|| area_by_exact_name(&dataset.column_names).map(|name| (name, AreaSource::ExactName)))
        .or_else(|| area_by_first_textual(dataset).map(|name| (name, AreaSource::FirstTextual)));
    if let Some((name, source)) = found {
        log::debug!("area column '{name}' via {source:?}");
        return Ok(AreaColumn { name, source });
    }
    Err(AnalysisError::RoleUnresolved {
        role: Role::Area,
        columns: dataset.column_names.clone(),
    })
}
