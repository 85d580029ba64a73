//! jotpad API server entry point.
//!
//! # Responsibility
//! - Wire configuration, logging, storage and the router together.
//! - Own process-level failure handling (bad bind, bad database).

use axum::http::{header, HeaderValue, Method};
use jotpad_api::config::Config;
use jotpad_api::{app, AppState};
use jotpad_core::db::open_db;
use log::{error, info, warn};
use tower_http::cors::{AllowOrigin, CorsLayer};

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    if let Err(err) = jotpad_core::init_logging(&config.log_level, &config.log_dir.to_string_lossy())
    {
        // The server stays usable without file logging; say so and move on.
        eprintln!("jotpad-api: logging unavailable: {err}");
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=server_start module=api status=error error_code=db_open_failed db={} error={}",
                config.db_path.display(),
                err
            );
            eprintln!(
                "jotpad-api: cannot open database `{}`: {err}",
                config.db_path.display()
            );
            std::process::exit(1);
        }
    };

    let router = app(AppState::new(conn)).layer(cors_layer(&config.allowed_origins));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("event=server_start module=api status=error error_code=bind_failed addr={addr} error={err}");
            eprintln!("jotpad-api: cannot bind `{addr}`: {err}");
            std::process::exit(1);
        }
    };

    info!(
        "event=server_start module=api status=ok addr={addr} db={}",
        config.db_path.display()
    );
    println!("jotpad-api listening on {addr}");

    if let Err(err) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("event=server_stop module=api status=error error={err}");
        std::process::exit(1);
    }

    info!("event=server_stop module=api status=ok");
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("event=cors_config module=api status=skip origin={origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

async fn shutdown_signal() {
    // Ctrl-C is the only shutdown trigger; a failed hook just means the
    // server runs until killed.
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("event=server_signal module=api status=error error_code=ctrl_c_unavailable");
        std::future::pending::<()>().await;
    }
}
