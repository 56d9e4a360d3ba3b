use super::model::{CellValue, Dataset, Row};

// ---------------------------------------------------------------------------
// Filtered subset: indices into a borrowed dataset
// ---------------------------------------------------------------------------

/// Rows of a dataset that matched a query, in original order.
///
/// Borrows the dataset rather than copying rows, so the source stays
/// read-only for the lifetime of the subset.
#[derive(Debug, Clone)]
pub struct Subset<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> Subset<'a> {
    /// A subset covering every row of `dataset`.
    pub fn all(dataset: &'a Dataset) -> Self {
        Subset {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Indices into the source dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Matched rows in original order.
    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.rows[i])
    }

    /// Values of `column` across the matched rows (`Null` where absent).
    pub fn values<'s>(&'s self, column: &'s str) -> impl Iterator<Item = &'a CellValue> + 's {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| dataset.value(i, column))
    }
}

/// Select rows whose `area_column` value contains `query`.
///
/// Matching is case-insensitive substring search against the stringified
/// cell. The query is trimmed. Rows with a missing area value never match.
pub fn filter_rows<'a>(dataset: &'a Dataset, area_column: &str, query: &str) -> Subset<'a> {
    let needle = query.trim().to_lowercase();
    let indices = dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            row.get(area_column)
                .and_then(CellValue::as_text)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
        .map(|(i, _)| i)
        .collect();
    Subset { dataset, indices }
}
