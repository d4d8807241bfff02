//! Discrete intensity buckets for the co-occurrence heatmap.

use serde::Serialize;

use crate::domain::errors::DashboardResult;
use crate::domain::models::ConvergenceMatrix;

/// Highest bucket; the global maximum always lands here.
pub const MAX_BUCKET: u8 = 4;

/// A matrix bucketed into `0..=4` intensities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub labels: Vec<String>,
    pub buckets: Vec<Vec<u8>>,
    /// Normalization divisor (1 when every cell is zero).
    pub max: u64,
}

/// Bucket a single cell against the matrix maximum.
///
/// Zero is checked before the general formula and always maps to bucket 0.
pub fn bucket(value: u64, max: u64) -> u8 {
    if value == 0 {
        return 0;
    }
    let max = max.max(1);
    let scaled = (value as f64 / max as f64 * f64::from(MAX_BUCKET)).round();
    scaled.clamp(0.0, f64::from(MAX_BUCKET)) as u8
}

/// Bucket every cell of a square matrix.
///
/// Fails with `InvalidMatrix` if the matrix is not N x N for its N labels.
pub fn render(matrix: &ConvergenceMatrix) -> DashboardResult<Heatmap> {
    matrix.validate()?;
    let max = matrix.max_cell().filter(|m| *m > 0).unwrap_or(1);
    let buckets = matrix
        .matrix
        .iter()
        .map(|row| row.iter().map(|v| bucket(*v, max)).collect())
        .collect();
    Ok(Heatmap {
        labels: matrix.labels.clone(),
        buckets,
        max,
    })
}
