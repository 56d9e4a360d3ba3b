//! Locality facts, price/demand trends and comparisons from loosely
//! structured real-estate spreadsheets.

pub mod analysis;
pub mod data;
pub mod error;
pub mod state;

pub use analysis::query::{AnalysisResult, AnalyzeRequest, ComparisonResult, DEFAULT_LIMIT};
pub use error::{AnalysisError, Result};
pub use state::DatasetStore;
