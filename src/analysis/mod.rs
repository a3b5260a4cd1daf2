/// Statistical analysis over the merged climate dataset.
///
/// Submodules:
/// - `correlation` — Pearson correlation matrix over the three indicator
///   columns, with pairwise deletion of missing values.

pub mod correlation;
