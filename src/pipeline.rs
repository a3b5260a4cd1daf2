/// The loader/merger pipeline.
///
/// Produces the merged climate dataset: surface temperature rows
/// inner-joined with the ocean index on year, then enriched with
/// geocoded coordinates. The pure steps (`merge_tables`,
/// `attach_coordinates`) carry no I/O so the join and drop semantics are
/// testable without a network; `load_climate_data` orchestrates them
/// around file loading and geocoding.

use crate::geocode::Geocoder;
use crate::ingest::ocean::{self, OceanIndexRow};
use crate::ingest::surface::{self, SurfaceTempRow};
use crate::logging::{self, DataSource};
use crate::model::ClimateRecord;
use std::collections::HashMap;
use std::error::Error;

/// Load both datasets, merge them on year, and attach coordinates.
///
/// Fails on unreadable/malformed input files or a missing `Year` column
/// in the ocean index; geocoding anomalies degrade by row-dropping.
pub fn load_climate_data(
    surface_path: &str,
    ocean_path: &str,
    geocoder: &Geocoder,
) -> Result<Vec<ClimateRecord>, Box<dyn Error>> {
    let surface_rows = surface::load(surface_path)?;
    logging::info(
        DataSource::Surface,
        Some(surface_path),
        &format!("loaded {} country-year rows", surface_rows.len()),
    );

    let ocean_rows = ocean::load(ocean_path)?;
    logging::info(
        DataSource::Ocean,
        Some(ocean_path),
        &format!("loaded {} index rows", ocean_rows.len()),
    );

    let merged = merge_tables(surface_rows, &ocean_rows);
    logging::info(
        DataSource::System,
        None,
        &format!("inner join on Year kept {} rows", merged.len()),
    );

    let resolved = geocoder.resolve_countries(merged.iter().map(|r| r.country.as_str()));

    let mut unresolved: Vec<&str> = resolved
        .iter()
        .filter(|(_, coords)| coords.is_none())
        .map(|(country, _)| country.as_str())
        .collect();
    if !unresolved.is_empty() {
        unresolved.sort_unstable();
        logging::warn(
            DataSource::Geocoder,
            None,
            &format!(
                "{} countries unresolved, their rows will be dropped: {}",
                unresolved.len(),
                unresolved.join(", ")
            ),
        );
    }

    Ok(attach_coordinates(merged, &resolved))
}

/// Inner join on exact year equality.
///
/// Rows with no matching year in the other table are excluded, so the
/// output's year set is the intersection of both inputs' year sets.
/// Coordinates start absent; `attach_coordinates` fills them in.
pub fn merge_tables(surface: Vec<SurfaceTempRow>, ocean: &[OceanIndexRow]) -> Vec<ClimateRecord> {
    // First row per year wins; a duplicate-keyed index table is malformed input.
    let mut by_year: HashMap<i32, &OceanIndexRow> = HashMap::new();
    for row in ocean {
        by_year.entry(row.year).or_insert(row);
    }

    surface
        .into_iter()
        .filter_map(|s| {
            by_year.get(&s.year).map(|o| ClimateRecord {
                country: s.country,
                iso2: s.iso2,
                iso3: s.iso3,
                indicator: s.indicator,
                unit: s.unit,
                source: s.source,
                year: s.year,
                temperature_change: s.temperature_change,
                no_smoothing: o.no_smoothing,
                lowess5: o.lowess5,
                latitude: None,
                longitude: None,
            })
        })
        .collect()
}

/// Fill in each record's coordinates from the resolved-country map and
/// drop rows whose country resolved to nothing. Emits a drop summary so
/// the narrowing is visible to operators even though the API response
/// carries no partial-result indicator.
pub fn attach_coordinates(
    records: Vec<ClimateRecord>,
    resolved: &HashMap<String, Option<(f64, f64)>>,
) -> Vec<ClimateRecord> {
    let total = records.len();
    let mut kept = Vec::with_capacity(total);

    for mut record in records {
        if let Some((lat, lon)) = resolved.get(&record.country).copied().flatten() {
            record.latitude = Some(lat);
            record.longitude = Some(lon);
            kept.push(record);
        }
    }

    logging::log_drop_summary(DataSource::Geocoder, total, kept.len(), total - kept.len());
    kept
}
