/// Annual surface temperature change ingestion (IMF dataset).
///
/// The published file is "wide": one row per country with a `F<year>`
/// column per year (`F1961` .. `F2022`). Some exports are already "long"
/// with an explicit `Year` column. Both forms are accepted; wide input is
/// melted to one row per Country×Year before merging.

use std::error::Error;

/// Column headers that identify a country row rather than carrying a
/// year value. Everything outside this set is treated as a year column
/// when melting.
const ID_COLUMNS: [&str; 6] = ["Country", "ISO2", "ISO3", "Indicator", "Unit", "Source"];

/// One country-year temperature change reading.
///
/// `temperature_change` is `None` when the source cell is empty or
/// non-numeric; the row is kept so the year still participates in the
/// merge, and the correlation step handles the gap via pairwise deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceTempRow {
    pub country: String,
    pub iso2: String,
    pub iso3: String,
    pub indicator: String,
    pub unit: String,
    pub source: String,
    pub year: i32,
    pub temperature_change: Option<f64>,
}

/// Load the surface temperature CSV from disk.
pub fn load(path: &str) -> Result<Vec<SurfaceTempRow>, Box<dyn Error>> {
    let contents = std::fs::read_to_string(path)?;
    parse_csv(&contents)
}

/// Parse the surface temperature CSV, melting wide year columns if the
/// header carries no `Year` column.
pub fn parse_csv(data: &str) -> Result<Vec<SurfaceTempRow>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().any(|h| h == "Year") {
        parse_long(&mut reader, &headers)
    } else {
        parse_wide(&mut reader, &headers)
    }
}

/// Extract the year from a wide column header like `F2000`.
///
/// Takes the first contiguous run of ASCII digits; returns `None` when the
/// header has no digits or the run does not fit an i32. Columns rejected
/// here are skipped during the melt.
pub fn extract_year(label: &str) -> Option<i32> {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

// Helper to parse cells that might be empty or non-numeric
fn parse_value(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "null" {
        None
    } else {
        trimmed.parse().ok()
    }
}

fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn field<'a>(record: &'a csv::StringRecord, index: Option<usize>) -> &'a str {
    index.and_then(|i| record.get(i)).unwrap_or("")
}

/// Long form: every record already carries Year and Temperature_Change.
fn parse_long(
    reader: &mut csv::Reader<&[u8]>,
    headers: &[String],
) -> Result<Vec<SurfaceTempRow>, Box<dyn Error>> {
    let year_idx = column_index(headers, "Year");
    let temp_idx = column_index(headers, "Temperature_Change");
    let id_idx: Vec<Option<usize>> = ID_COLUMNS
        .iter()
        .map(|name| column_index(headers, name))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;

        // Rows whose year cannot be parsed are dropped, matching the
        // melt path.
        let year = match extract_year(field(&record, year_idx)) {
            Some(y) => y,
            None => continue,
        };

        rows.push(SurfaceTempRow {
            country: field(&record, id_idx[0]).to_string(),
            iso2: field(&record, id_idx[1]).to_string(),
            iso3: field(&record, id_idx[2]).to_string(),
            indicator: field(&record, id_idx[3]).to_string(),
            unit: field(&record, id_idx[4]).to_string(),
            source: field(&record, id_idx[5]).to_string(),
            year,
            temperature_change: parse_value(field(&record, temp_idx)),
        });
    }
    Ok(rows)
}

/// Wide form: melt each `F<year>` column into its own row, carrying the
/// identifying columns through.
fn parse_wide(
    reader: &mut csv::Reader<&[u8]>,
    headers: &[String],
) -> Result<Vec<SurfaceTempRow>, Box<dyn Error>> {
    let id_idx: Vec<Option<usize>> = ID_COLUMNS
        .iter()
        .map(|name| column_index(headers, name))
        .collect();

    // (column index, parsed year) for every meltable column
    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !ID_COLUMNS.contains(&h.as_str()))
        .filter_map(|(i, h)| extract_year(h).map(|year| (i, year)))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        for &(col, year) in &year_columns {
            rows.push(SurfaceTempRow {
                country: field(&record, id_idx[0]).to_string(),
                iso2: field(&record, id_idx[1]).to_string(),
                iso3: field(&record, id_idx[2]).to_string(),
                indicator: field(&record, id_idx[3]).to_string(),
                unit: field(&record, id_idx[4]).to_string(),
                source: field(&record, id_idx[5]).to_string(),
                year,
                temperature_change: parse_value(record.get(col).unwrap_or("")),
            });
        }
    }
    Ok(rows)
}
