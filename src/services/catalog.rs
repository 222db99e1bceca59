use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
};

/// Read-only movie catalog plus its precomputed similarity matrix.
///
/// Row `i` of the matrix holds the similarity of movie `i` to every movie in
/// the catalog, in catalog order. Built once at startup and shared behind an
/// `Arc`; nothing mutates it afterwards.
#[derive(Debug)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    /// First row for each title
    rows_by_title: HashMap<String, usize>,
    /// Row-major N x N scores
    scores: Vec<f64>,
}

impl CatalogIndex {
    /// Builds the index, validating that the matrix is square, matches the
    /// catalog size and contains only finite scores.
    pub fn new(entries: Vec<CatalogEntry>, matrix: Vec<Vec<f64>>) -> AppResult<Self> {
        let n = entries.len();

        if n == 0 {
            return Err(AppError::Load("Catalog is empty".to_string()));
        }

        if matrix.len() != n {
            return Err(AppError::Load(format!(
                "Similarity matrix has {} rows but catalog has {} movies",
                matrix.len(),
                n
            )));
        }

        let mut scores = Vec::with_capacity(n * n);
        for (i, row) in matrix.into_iter().enumerate() {
            if row.len() != n {
                return Err(AppError::Load(format!(
                    "Similarity matrix row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if let Some(j) = row.iter().position(|score| !score.is_finite()) {
                return Err(AppError::Load(format!(
                    "Similarity matrix entry ({}, {}) is not a finite number",
                    i, j
                )));
            }
            scores.extend(row);
        }

        let mut rows_by_title = HashMap::with_capacity(n);
        for (row, entry) in entries.iter().enumerate() {
            rows_by_title.entry(entry.title.clone()).or_insert(row);
        }

        if rows_by_title.len() < n {
            tracing::warn!(
                duplicates = n - rows_by_title.len(),
                "Catalog contains duplicate titles; lookups use the first occurrence"
            );
        }

        Ok(Self {
            entries,
            rows_by_title,
            scores,
        })
    }

    /// Loads the catalog and similarity matrix from JSON files
    pub fn load(
        catalog_path: impl AsRef<Path>,
        similarity_path: impl AsRef<Path>,
    ) -> AppResult<Self> {
        let entries: Vec<CatalogEntry> = read_json(catalog_path.as_ref())?;
        let matrix: Vec<Vec<f64>> = read_json(similarity_path.as_ref())?;

        let index = Self::new(entries, matrix)?;

        tracing::info!(
            movies = index.len(),
            catalog = %catalog_path.as_ref().display(),
            similarity = %similarity_path.as_ref().display(),
            "Catalog loaded"
        );

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed index: `new` rejects an empty catalog.
    /// Pairs with `len` for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn title_to_row(&self, title: &str) -> AppResult<usize> {
        self.rows_by_title
            .get(title)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' is not in the catalog", title)))
    }

    pub fn row_to_title(&self, row: usize) -> AppResult<&str> {
        self.entry(row).map(|entry| entry.title.as_str())
    }

    pub fn row_to_movie_id(&self, row: usize) -> AppResult<i64> {
        self.entry(row).map(|entry| entry.movie_id)
    }

    /// Similarity of `row` to every catalog movie, in catalog order
    pub fn similarity_row(&self, row: usize) -> AppResult<&[f64]> {
        let n = self.len();
        if row >= n {
            return Err(row_out_of_range(row, n));
        }
        Ok(&self.scores[row * n..(row + 1) * n])
    }

    /// All titles in catalog order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.title.as_str())
    }

    fn entry(&self, row: usize) -> AppResult<&CatalogEntry> {
        self.entries
            .get(row)
            .ok_or_else(|| row_out_of_range(row, self.len()))
    }
}

fn row_out_of_range(row: usize, len: usize) -> AppError {
    AppError::Internal(format!("Row {} out of range for catalog of {}", row, len))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::Load(format!("Cannot read {}: {}", path.display(), e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| AppError::Load(format!("Malformed data in {}: {}", path.display(), e)))
}
