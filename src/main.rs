use climcor_service::config::{Config, DEFAULT_CONFIG_PATH};
use climcor_service::logging::{self, DataSource, LogLevel};
use climcor_service::server::{self, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    logging::init_logger(LogLevel::Info, None);

    let config = match Config::load(DEFAULT_CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            logging::error(
                DataSource::System,
                Some(DEFAULT_CONFIG_PATH),
                &format!("failed to load configuration: {}", e),
            );
            std::process::exit(1);
        }
    };

    let port = config.server.port;
    let app = server::build_router(Arc::new(AppState { config }));

    let listener = match tokio::net::TcpListener::bind((std::net::Ipv4Addr::UNSPECIFIED, port)).await
    {
        Ok(listener) => listener,
        Err(e) => {
            logging::error(
                DataSource::System,
                None,
                &format!("failed to bind port {}: {}", port, e),
            );
            std::process::exit(1);
        }
    };

    logging::info(
        DataSource::System,
        None,
        &format!("server listening on port {}", port),
    );

    if let Err(e) = axum::serve(listener, app).await {
        logging::error(DataSource::System, None, &format!("server error: {}", e));
        std::process::exit(1);
    }
}
