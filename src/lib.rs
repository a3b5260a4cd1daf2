/// Climate correlation service.
///
/// Merges the IMF annual surface temperature change dataset with the NASA
/// land-ocean temperature index by year, geocodes each country through
/// Nominatim, and serves the merged records with a Pearson correlation
/// matrix over the three indicators at `GET /api/data`.

pub mod analysis;
pub mod config;
pub mod geocode;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod server;
