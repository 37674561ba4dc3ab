use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DocDdlError;
use crate::model::QualityBreakdown;

/// Relative weights of completeness and row density in the final score.
///
/// The score is `(c * completeness + d * row_density) / (c + d)`, so it stays
/// in [0, 100] for any non-negative weights with a positive sum. The default
/// favours completeness, 0.7 against 0.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct ScoreWeights {
    completeness: Decimal,
    row_density: Decimal,
}

#[derive(Deserialize)]
struct RawWeights {
    completeness: Decimal,
    row_density: Decimal,
}

impl TryFrom<RawWeights> for ScoreWeights {
    type Error = DocDdlError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        ScoreWeights::new(raw.completeness, raw.row_density)
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            completeness: Decimal::new(7, 1),
            row_density: Decimal::new(3, 1),
        }
    }
}

impl ScoreWeights {
    pub fn new(completeness: Decimal, row_density: Decimal) -> Result<Self, DocDdlError> {
        if completeness.is_sign_negative() || row_density.is_sign_negative() {
            return Err(DocDdlError::InvalidWeights(format!(
                "weights must not be negative (got {completeness} and {row_density})"
            )));
        }
        if (completeness + row_density).is_zero() {
            return Err(DocDdlError::InvalidWeights(
                "weights must not both be zero".into(),
            ));
        }
        Ok(ScoreWeights {
            completeness,
            row_density,
        })
    }

    /// Weights from a single completeness share in [0, 1]; row density gets the rest.
    pub fn from_completeness_share(share: Decimal) -> Result<Self, DocDdlError> {
        if share < Decimal::ZERO || share > Decimal::ONE {
            return Err(DocDdlError::InvalidWeights(format!(
                "completeness weight must be between 0 and 1, got {share}"
            )));
        }
        ScoreWeights::new(share, Decimal::ONE - share)
    }

    pub fn completeness(&self) -> Decimal {
        self.completeness
    }

    pub fn row_density(&self) -> Decimal {
        self.row_density
    }
}

/// Score a possibly ragged grid.
///
/// Ragged rows count as if padded with empty cells to the widest row. An
/// empty grid (no rows, or only rows without cells) scores zero throughout.
pub fn score_grid(grid: &[Vec<String>], weights: &ScoreWeights) -> QualityBreakdown {
    let rows = grid.len();
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    if rows == 0 || width == 0 {
        return QualityBreakdown::default();
    }

    let total = Decimal::from(rows * width);
    let filled = grid
        .iter()
        .flatten()
        .filter(|cell| !cell.trim().is_empty())
        .count();
    let completeness = Decimal::from(filled) * Decimal::ONE_HUNDRED / total;

    let modal = modal_row_length(grid);
    let matching = grid.iter().filter(|row| row.len() == modal).count();
    let row_density = Decimal::from(matching) * Decimal::ONE_HUNDRED / Decimal::from(rows);

    let weight_sum = weights.completeness + weights.row_density;
    let score = if weight_sum.is_zero() {
        Decimal::ZERO
    } else {
        (completeness * weights.completeness + row_density * weights.row_density) / weight_sum
    };

    QualityBreakdown {
        completeness: round2(completeness),
        row_density: round2(row_density),
        score: round2(score),
    }
}

/// Most common row length; ties go to the longer length.
fn modal_row_length(grid: &[Vec<String>]) -> usize {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for row in grid {
        *counts.entry(row.len()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(len_a, n_a), (len_b, n_b)| n_a.cmp(n_b).then(len_a.cmp(len_b)))
        .map(|(len, _)| len)
        .unwrap_or(0)
}

/// Round to two places and drop trailing zeros, so `100.00` renders as `100`.
pub fn round2(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
