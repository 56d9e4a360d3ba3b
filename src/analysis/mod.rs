/// Decision logic: which columns mean what, and what the matching rows say.
///
/// ```text
///   column names ──► roles    (keyword rule table, area fallback chain)
///                      │
///   query ──► data::filter ──► Subset
///                      │
///            ┌─────────┴─────────┐
///            ▼                   ▼
///         trend              summary
///   (per-year means,     (stats, trend class,
///    classification)      narrative text)
///            └─────────┬─────────┘
///                      ▼
///                    query    (single-area and comparison results)
/// ```

pub mod query;
pub mod roles;
pub mod summary;
pub mod trend;
