/// Integration tests for the CSV -> reshape -> merge -> coordinate-attach
/// pipeline.
///
/// These tests exercise the loaders against real files on disk (written to
/// a scratch directory) rather than in-memory strings, covering the same
/// path the HTTP handler takes. Geocoding is driven through the
/// resolved-country map so no test here touches the network; live
/// Nominatim checks live in geocode_live.rs.
///
/// Run with: cargo test --test pipeline_integration

use climcor_service::ingest::{ocean, surface};
use climcor_service::pipeline;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("climcor_test_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture should be writable");
    path
}

const WIDE_SURFACE_CSV: &str = "\
Country,ISO2,ISO3,Indicator,Unit,Source,F2000,F2001
Iceland,IS,ISL,Temperature change,Degree Celsius,FAO,0.50,0.62
Norway,NO,NOR,Temperature change,Degree Celsius,FAO,0.40,0.55
Atlantis,AT,ATL,Temperature change,Degree Celsius,FAO,0.70,0.80
";

const OCEAN_CSV: &str = "\
Year,No_Smoothing,Lowess(5)
1999,0.33,0.42
2000,0.39,0.44
2001,0.54,0.47
";

// ---------------------------------------------------------------------------
// Loader Tests
// ---------------------------------------------------------------------------

#[test]
fn test_wide_surface_file_loads_and_melts() {
    let path = write_fixture("surface_wide.csv", WIDE_SURFACE_CSV);
    let rows = surface::load(path.to_str().unwrap()).expect("wide surface file should load");

    assert_eq!(rows.len(), 6, "3 countries x 2 year columns");
    assert!(
        rows.iter().all(|r| r.year == 2000 || r.year == 2001),
        "melted years come from the F<year> headers"
    );
}

#[test]
fn test_ocean_file_loads_per_year_rows() {
    let path = write_fixture("ocean.csv", OCEAN_CSV);
    let rows = ocean::load(path.to_str().unwrap()).expect("ocean file should load");

    assert_eq!(rows.len(), 3);
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![1999, 2000, 2001]);
}

#[test]
fn test_ocean_file_without_year_column_fails_naming_the_column() {
    let path = write_fixture(
        "ocean_no_year.csv",
        "No_Smoothing,Lowess(5)\n0.39,0.44\n",
    );
    let err = ocean::load(path.to_str().unwrap())
        .expect_err("an ocean file without a Year column must fail");
    assert!(
        err.to_string().contains("'Year' column"),
        "error should name the Year column, got '{}'",
        err
    );
}

#[test]
fn test_missing_input_file_is_an_error() {
    let result = surface::load("definitely/does/not/exist.csv");
    assert!(result.is_err(), "unreadable input must propagate as an error");
}

// ---------------------------------------------------------------------------
// End-to-End Merge Tests
// ---------------------------------------------------------------------------

#[test]
fn test_merge_from_files_keeps_only_shared_years() {
    let surface_path = write_fixture("surface_merge.csv", WIDE_SURFACE_CSV);
    let ocean_path = write_fixture("ocean_merge.csv", OCEAN_CSV);

    let surface_rows = surface::load(surface_path.to_str().unwrap()).unwrap();
    let ocean_rows = ocean::load(ocean_path.to_str().unwrap()).unwrap();
    let merged = pipeline::merge_tables(surface_rows, &ocean_rows);

    let years: HashSet<i32> = merged.iter().map(|r| r.year).collect();
    assert_eq!(
        years,
        HashSet::from([2000, 2001]),
        "1999 exists only in the ocean table and must not appear"
    );
    assert_eq!(merged.len(), 6);
}

#[test]
fn test_end_to_end_with_stubbed_coordinates_keeps_every_row() {
    // Spec scenario: every country resolves to (0.0, 0.0)
    let surface_path = write_fixture("surface_e2e.csv", WIDE_SURFACE_CSV);
    let ocean_path = write_fixture("ocean_e2e.csv", OCEAN_CSV);

    let surface_rows = surface::load(surface_path.to_str().unwrap()).unwrap();
    let ocean_rows = ocean::load(ocean_path.to_str().unwrap()).unwrap();
    let merged = pipeline::merge_tables(surface_rows, &ocean_rows);

    let resolved: HashMap<String, Option<(f64, f64)>> = merged
        .iter()
        .map(|r| (r.country.clone(), Some((0.0, 0.0))))
        .collect();

    let kept = pipeline::attach_coordinates(merged, &resolved);
    assert_eq!(kept.len(), 6, "nothing is dropped when every country resolves");
    assert!(kept
        .iter()
        .all(|r| r.latitude == Some(0.0) && r.longitude == Some(0.0)));
}

#[test]
fn test_end_to_end_drops_unresolvable_country_rows() {
    // Spec scenario: geocoding finds nothing for "Atlantis"
    let surface_path = write_fixture("surface_atlantis.csv", WIDE_SURFACE_CSV);
    let ocean_path = write_fixture("ocean_atlantis.csv", OCEAN_CSV);

    let surface_rows = surface::load(surface_path.to_str().unwrap()).unwrap();
    let ocean_rows = ocean::load(ocean_path.to_str().unwrap()).unwrap();
    let merged = pipeline::merge_tables(surface_rows, &ocean_rows);

    let resolved: HashMap<String, Option<(f64, f64)>> = merged
        .iter()
        .map(|r| {
            let coords = if r.country == "Atlantis" {
                None
            } else {
                Some((45.0, 9.0))
            };
            (r.country.clone(), coords)
        })
        .collect();

    let kept = pipeline::attach_coordinates(merged, &resolved);
    assert_eq!(kept.len(), 4, "Atlantis rows for both years are gone");
    assert!(kept.iter().all(|r| r.country != "Atlantis"));
    assert!(kept
        .iter()
        .all(|r| r.latitude.is_some() && r.longitude.is_some()));
}
