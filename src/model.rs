/// Core data types for the climate correlation service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic and no I/O — only types (plus the serde derives the
/// JSON contract needs).

use serde::Serialize;

// ---------------------------------------------------------------------------
// Indicator column names
// ---------------------------------------------------------------------------

/// Annual surface temperature change, in degrees Celsius (IMF dataset).
pub const COL_TEMPERATURE_CHANGE: &str = "Temperature_Change";

/// Unsmoothed land-ocean temperature index anomaly (NASA GISTEMP).
pub const COL_NO_SMOOTHING: &str = "No_Smoothing";

/// Lowess(5)-smoothed land-ocean temperature index anomaly (NASA GISTEMP).
pub const COL_LOWESS5: &str = "Lowess(5)";

/// The three numeric indicators the correlation matrix is computed over,
/// in their canonical order.
pub const INDICATOR_COLUMNS: [&str; 3] =
    [COL_TEMPERATURE_CHANGE, COL_NO_SMOOTHING, COL_LOWESS5];

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One row of the merged dataset: a country-year surface temperature
/// reading joined with the global ocean index for that year, enriched
/// with geocoded coordinates.
///
/// Serialized field names match the source CSV column names exactly so the
/// JSON records mirror the input schemas, `Lowess(5)` included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "ISO2")]
    pub iso2: String,
    #[serde(rename = "ISO3")]
    pub iso3: String,
    #[serde(rename = "Indicator")]
    pub indicator: String,
    #[serde(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Temperature_Change")]
    pub temperature_change: Option<f64>,
    #[serde(rename = "No_Smoothing")]
    pub no_smoothing: Option<f64>,
    #[serde(rename = "Lowess(5)")]
    pub lowess5: Option<f64>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while loading, merging, or analyzing the climate
/// datasets. Geocoding failures are not represented here — they degrade to
/// absent coordinates and are handled by row-dropping (see `geocode`).
#[derive(Debug, PartialEq)]
pub enum ClimateError {
    /// A dataset that must be keyed by year has no Year column.
    MissingYearColumn { dataset: String },
    /// The correlation input is missing one or more required columns.
    MissingColumns(Vec<String>),
}

impl std::fmt::Display for ClimateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClimateError::MissingYearColumn { dataset } => {
                write!(f, "The {} dataset does not have a 'Year' column", dataset)
            }
            ClimateError::MissingColumns(columns) => {
                write!(
                    f,
                    "Data must contain the following columns: {}",
                    columns.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ClimateError {}
