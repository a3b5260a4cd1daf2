/// Land-ocean temperature index ingestion (NASA GISTEMP dataset).
///
/// One row per year with the unsmoothed anomaly (`No_Smoothing`) and the
/// five-year lowess-smoothed anomaly (`Lowess(5)`). Unlike the surface
/// dataset there is no wide form to reshape — but the `Year` column is
/// mandatory, and its absence is a configuration error rather than
/// something to degrade around.

use crate::model::ClimateError;
use std::error::Error;

/// One year of the global land-ocean temperature index.
#[derive(Debug, Clone, PartialEq)]
pub struct OceanIndexRow {
    pub year: i32,
    pub no_smoothing: Option<f64>,
    pub lowess5: Option<f64>,
}

/// Load the ocean index CSV from disk.
pub fn load(path: &str) -> Result<Vec<OceanIndexRow>, Box<dyn Error>> {
    let contents = std::fs::read_to_string(path)?;
    parse_csv(&contents)
}

/// Parse the ocean index CSV.
///
/// Fails with `ClimateError::MissingYearColumn` when the header has no
/// `Year` column. Rows whose year cell does not parse are skipped; missing
/// anomaly cells become absent values.
pub fn parse_csv(data: &str) -> Result<Vec<OceanIndexRow>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let year_idx = match headers.iter().position(|h| h == "Year") {
        Some(i) => i,
        None => {
            return Err(ClimateError::MissingYearColumn {
                dataset: "ocean index".to_string(),
            }
            .into());
        }
    };
    let no_smoothing_idx = headers.iter().position(|h| h == "No_Smoothing");
    let lowess5_idx = headers.iter().position(|h| h == "Lowess(5)");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;

        let year: i32 = match record.get(year_idx).and_then(|s| s.trim().parse().ok()) {
            Some(y) => y,
            None => continue,
        };

        let cell = |idx: Option<usize>| -> Option<f64> {
            idx.and_then(|i| record.get(i))
                .and_then(|s| s.trim().parse().ok())
        };

        rows.push(OceanIndexRow {
            year,
            no_smoothing: cell(no_smoothing_idx),
            lowess5: cell(lowess5_idx),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OCEAN_CSV: &str = "\
Year,No_Smoothing,Lowess(5)
2000,0.39,0.44
2001,0.54,0.47
2002,0.63,0.51
";

    #[test]
    fn test_parses_one_row_per_year() {
        let rows = parse_csv(OCEAN_CSV).expect("ocean CSV should parse");
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            OceanIndexRow {
                year: 2000,
                no_smoothing: Some(0.39),
                lowess5: Some(0.44),
            }
        );
    }

    #[test]
    fn test_missing_year_column_is_an_error_naming_the_column() {
        let csv = "\
No_Smoothing,Lowess(5)
0.39,0.44
";
        let err = parse_csv(csv).expect_err("CSV without Year must fail");
        assert!(
            err.to_string().contains("'Year' column"),
            "error should name the Year column, got '{}'",
            err
        );
    }

    #[test]
    fn test_rows_with_unparseable_year_are_skipped() {
        let csv = "\
Year,No_Smoothing,Lowess(5)
2000,0.39,0.44
n/a,0.54,0.47
";
        let rows = parse_csv(csv).expect("CSV should parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2000);
    }

    #[test]
    fn test_missing_anomaly_cells_become_absent_values() {
        let csv = "\
Year,No_Smoothing,Lowess(5)
2000,,0.44
";
        let rows = parse_csv(csv).expect("CSV should parse");
        assert_eq!(rows[0].no_smoothing, None);
        assert_eq!(rows[0].lowess5, Some(0.44));
    }
}
