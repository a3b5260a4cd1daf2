/// HTTP surface for the climate correlation service.
///
/// A thin pass-through: `GET /api/data` runs the loader/merger and the
/// correlation calculator on a blocking worker and returns both results
/// as JSON, or a 500 with the error message. All pipeline policy lives in
/// `pipeline` and `analysis`; this module only maps outcomes onto the
/// wire contract.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::correlation::{self, CorrelationMatrix};
use crate::config::Config;
use crate::geocode::Geocoder;
use crate::logging::{self, DataSource};
use crate::model::ClimateRecord;
use crate::pipeline;

pub struct AppState {
    pub config: Config,
}

#[derive(Debug, Serialize)]
pub struct ClimateDataResponse {
    data: Vec<ClimateRecord>,
    correlation: CorrelationMatrix,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// Build the application router. CORS is fully open — the service feeds a
/// browser dashboard served from another origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/data", get(climate_data_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(cors)
}

pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}

/// `GET /api/data` — merged records plus their correlation matrix.
pub async fn climate_data_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClimateDataResponse>, (StatusCode, Json<ErrorResponse>)> {
    let config = state.config.clone();
    let result = tokio::task::spawn_blocking(move || run_pipeline(&config)).await;

    match result {
        Ok(Ok(response)) => Ok(Json(response)),
        Ok(Err(message)) => {
            logging::error(
                DataSource::Http,
                Some("/api/data"),
                &format!("request failed: {}", message),
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: message }),
            ))
        }
        Err(join_err) => {
            logging::error(
                DataSource::Http,
                Some("/api/data"),
                &format!("pipeline task panicked: {}", join_err),
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal pipeline failure".to_string(),
                }),
            ))
        }
    }
}

/// The synchronous request body: load, merge, geocode, correlate.
///
/// Errors collapse to their display string here — that string is the
/// whole client-visible error contract.
fn run_pipeline(config: &Config) -> Result<ClimateDataResponse, String> {
    let geocoder = Geocoder::new(&config.geocoder).map_err(|e| e.to_string())?;

    let data = pipeline::load_climate_data(
        &config.data.surface_temperature_csv,
        &config.data.ocean_index_csv,
        &geocoder,
    )
    .map_err(|e| e.to_string())?;

    let correlation = correlation::calculate_correlation(&correlation::numeric_columns(&data))
        .map_err(|e| e.to_string())?;

    Ok(ClimateDataResponse { data, correlation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::COL_TEMPERATURE_CHANGE;
    use std::collections::BTreeMap;

    #[test]
    fn test_error_response_wire_shape() {
        let body = ErrorResponse {
            error: "The ocean index dataset does not have a 'Year' column".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": "The ocean index dataset does not have a 'Year' column"
            })
        );
    }

    #[test]
    fn test_success_response_wire_shape() {
        let mut row = BTreeMap::new();
        row.insert(COL_TEMPERATURE_CHANGE.to_string(), Some(1.0));
        let mut correlation = CorrelationMatrix::new();
        correlation.insert(COL_TEMPERATURE_CHANGE.to_string(), row);

        let body = ClimateDataResponse {
            data: Vec::new(),
            correlation,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["data"].is_array());
        assert_eq!(json["correlation"]["Temperature_Change"]["Temperature_Change"], 1.0);
    }
}
