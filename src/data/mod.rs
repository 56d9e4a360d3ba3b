/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Row>, column order
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  area substring match → Subset (row indices)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
