/// Nominatim geocoding client.
///
/// Resolves free-text country names to WGS84 coordinates through the
/// OpenStreetMap Nominatim search API. Lookups are blocking; the HTTP
/// layer runs the whole pipeline on a worker thread.
///
/// Failure policy: a timeout is retried in a bounded loop with a fixed
/// delay between attempts; service-unavailable responses and every other
/// error give up immediately. A country the provider cannot resolve gets
/// absent coordinates and the merge step drops its rows.
///
/// API documentation: https://nominatim.org/release-docs/latest/api/Search/

use crate::config::GeocoderConfig;
use crate::logging::{self, DataSource};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from a single geocoding request.
#[derive(Debug)]
pub enum GeocodeError {
    /// The request exceeded the configured timeout.
    Timeout(String),
    /// Non-2xx response indicating the service itself is down (5xx).
    Unavailable(u16),
    /// Any other transport-level failure (DNS, connect, TLS).
    Request(String),
    /// The response body could not be interpreted.
    Parse(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Timeout(msg) => write!(f, "geocoding request timed out: {}", msg),
            GeocodeError::Unavailable(code) => {
                write!(f, "geocoding service unavailable (HTTP {})", code)
            }
            GeocodeError::Request(msg) => write!(f, "geocoding request failed: {}", msg),
            GeocodeError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for GeocodeError {}

// ---------------------------------------------------------------------------
// Nominatim response structures
// ---------------------------------------------------------------------------

/// One place from a Nominatim search response. Nominatim serializes
/// coordinates as strings, not numbers.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

/// Parse a Nominatim search response body into coordinates.
///
/// An empty result array means the query matched nothing — that is a
/// valid not-found outcome, not an error.
pub fn parse_search_response(body: &str) -> Result<Option<(f64, f64)>, GeocodeError> {
    let results: Vec<SearchResult> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse(e.to_string()))?;

    let place = match results.first() {
        Some(p) => p,
        None => return Ok(None),
    };

    let lat: f64 = place
        .lat
        .parse()
        .map_err(|_| GeocodeError::Parse(format!("non-numeric latitude '{}'", place.lat)))?;
    let lon: f64 = place
        .lon
        .parse()
        .map_err(|_| GeocodeError::Parse(format!("non-numeric longitude '{}'", place.lon)))?;

    Ok(Some((lat, lon)))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct Geocoder {
    client: reqwest::blocking::Client,
    base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Geocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Geocoder, Box<dyn std::error::Error>> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Geocoder {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        })
    }

    /// One search request, no retry.
    fn lookup_once(&self, country: &str) -> Result<Option<(f64, f64)>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", country), ("format", "json"), ("limit", "1")])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeError::Timeout(e.to_string())
                } else {
                    GeocodeError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(GeocodeError::Unavailable(status.as_u16()));
        }
        if !status.is_success() {
            return Err(GeocodeError::Request(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| GeocodeError::Request(e.to_string()))?;
        parse_search_response(&body)
    }

    /// Resolve one country name to coordinates.
    ///
    /// Timeouts retry up to `max_attempts` total attempts with a fixed
    /// delay in between. Every other failure, and a not-found result,
    /// yields `None` — callers drop the affected rows.
    pub fn lookup(&self, country: &str) -> Option<(f64, f64)> {
        for attempt in 1..=self.max_attempts {
            match self.lookup_once(country) {
                Ok(Some(coords)) => return Some(coords),
                Ok(None) => {
                    logging::debug(
                        DataSource::Geocoder,
                        Some(country),
                        "no results for query",
                    );
                    return None;
                }
                Err(GeocodeError::Timeout(_)) if attempt < self.max_attempts => {
                    logging::warn(
                        DataSource::Geocoder,
                        Some(country),
                        &format!(
                            "attempt {}/{} timed out, retrying in {}s",
                            attempt,
                            self.max_attempts,
                            self.retry_delay.as_secs()
                        ),
                    );
                    thread::sleep(self.retry_delay);
                }
                Err(err) => {
                    logging::log_geocode_failure(country, "lookup", &err);
                    return None;
                }
            }
        }
        None
    }

    /// Resolve every distinct country name once.
    ///
    /// The merged table repeats each country across many years; a lookup
    /// per row would multiply the dominant latency cost by the year count.
    pub fn resolve_countries<'a, I>(&self, countries: I) -> HashMap<String, Option<(f64, f64)>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        resolve_with(countries, |country| self.lookup(country))
    }
}

/// Deduplicated resolution over an arbitrary lookup function. Split from
/// `Geocoder` so the dedup behavior is testable without a network.
fn resolve_with<'a, I, F>(countries: I, mut lookup: F) -> HashMap<String, Option<(f64, f64)>>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(&str) -> Option<(f64, f64)>,
{
    let mut resolved: HashMap<String, Option<(f64, f64)>> = HashMap::new();
    for country in countries {
        if !resolved.contains_key(country) {
            let coords = lookup(country);
            resolved.insert(country.to_string(), coords);
        }
    }
    resolved
}
