/// Pearson correlation matrix over the merged dataset's indicator columns.
///
/// The calculator works on named series rather than typed records so its
/// column-presence contract is checkable: all three indicator columns must
/// be present, and the error names the ones that are not. Missing values
/// are handled by pairwise deletion — each pair's coefficient uses only
/// the rows where both values are present.

use crate::model::{ClimateError, ClimateRecord, INDICATOR_COLUMNS};
use crate::model::{COL_LOWESS5, COL_NO_SMOOTHING, COL_TEMPERATURE_CHANGE};
use std::collections::BTreeMap;

/// Named numeric series extracted from the merged records.
pub type ColumnSeries = BTreeMap<String, Vec<Option<f64>>>;

/// Square matrix serialized as label -> label -> coefficient. `None`
/// marks an undefined entry (zero variance or too few overlapping
/// observations) and serializes as JSON null.
pub type CorrelationMatrix = BTreeMap<String, BTreeMap<String, Option<f64>>>;

/// Project the merged records into the three indicator series.
pub fn numeric_columns(records: &[ClimateRecord]) -> ColumnSeries {
    let mut columns = ColumnSeries::new();
    columns.insert(
        COL_TEMPERATURE_CHANGE.to_string(),
        records.iter().map(|r| r.temperature_change).collect(),
    );
    columns.insert(
        COL_NO_SMOOTHING.to_string(),
        records.iter().map(|r| r.no_smoothing).collect(),
    );
    columns.insert(
        COL_LOWESS5.to_string(),
        records.iter().map(|r| r.lowess5).collect(),
    );
    columns
}

/// Compute the correlation matrix.
///
/// Fails with `ClimateError::MissingColumns` naming every required column
/// the input lacks.
pub fn calculate_correlation(columns: &ColumnSeries) -> Result<CorrelationMatrix, ClimateError> {
    let missing: Vec<String> = INDICATOR_COLUMNS
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ClimateError::MissingColumns(missing));
    }

    let mut matrix = CorrelationMatrix::new();
    for a in INDICATOR_COLUMNS {
        let mut row = BTreeMap::new();
        for b in INDICATOR_COLUMNS {
            // The diagonal is 1 by definition where it is defined at all;
            // the numeric path can drift an ulp, so it is pinned.
            let value = if a == b {
                pearson(&columns[a], &columns[b]).map(|_| 1.0)
            } else {
                pearson(&columns[a], &columns[b])
            };
            row.insert(b.to_string(), value);
        }
        matrix.insert(a.to_string(), row);
    }
    Ok(matrix)
}

/// Pearson correlation coefficient with pairwise deletion.
///
/// Returns `None` when fewer than two overlapping observations exist or
/// either series has zero variance over the overlap.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| (*x).zip(*y))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n_f;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }

    // Clamp float drift back into the coefficient's range.
    Some((cov / denom).clamp(-1.0, 1.0))
}
