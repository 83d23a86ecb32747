//! Read-only content API for the student journal website.
//!
//! Serves articles, issues, editors and derived statistics from an
//! in-memory store seeded at startup, plus the site's attached assets.
//!
//! # Routes
//! - `GET /api/articles?category=&search=&featured=`
//! - `GET /api/articles/{id}`
//! - `GET /api/editors`
//! - `GET /api/issues`
//! - `GET /api/issues/current`
//! - `GET /api/stats`
//! - `GET /attached_assets/*`
//!
//! # Environment
//! - `JOURNAL_PORT` (default `5000`)
//! - `JOURNAL_ASSETS_DIR` (default `attached_assets`)
//! - `JOURNAL_SEED_FILE` (optional JSON seed, built-in content otherwise)
//! - `JOURNAL_READERS_PER_ARTICLE` (default `250`)
//! - `RUST_LOG` for log filtering
use std::{sync::Arc, time::Duration};

use axum::{
	Router,
	http::{Method, header::CONTENT_TYPE},
	routing::get,
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;

use config::Config;
use error::StartupError;
use routes::{
	article_handler, articles_handler, current_issue_handler, editors_handler, issues_handler,
	stats_handler,
};
use state::AppState;

/// All routes over `state`.
pub fn router(state: Arc<AppState>) -> Router {
	let cors = CorsLayer::new()
		.allow_methods([Method::GET, Method::OPTIONS])
		.allow_headers([CONTENT_TYPE])
		.max_age(Duration::from_secs(60 * 60));

	Router::new()
		.route("/api/articles", get(articles_handler))
		.route("/api/articles/{id}", get(article_handler))
		.route("/api/editors", get(editors_handler))
		.route("/api/issues", get(issues_handler))
		.route("/api/issues/current", get(current_issue_handler))
		.route("/api/stats", get(stats_handler))
		.nest_service("/attached_assets", ServeDir::new(&state.config.assets_dir))
		.layer(cors)
		.with_state(state)
}

pub async fn start_server() -> Result<(), StartupError> {
	fmt().with_env_filter(EnvFilter::from_default_env()).init();

	info!("Initializing state...");
	let state = AppState::new(Config::load())?;

	info!("Starting server...");
	let address = format!("0.0.0.0:{}", state.config.port);
	let app = router(state);

	info!("Binding to {address}");
	let listener = TcpListener::bind(&address)
		.await
		.map_err(|source| StartupError::Bind {
			address: address.clone(),
			source,
		})?;
	info!("Server running on {address}");

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.map_err(StartupError::Serve)?;

	info!("Server shutting down...");
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		match ctrl_c().await {
			Ok(()) => info!("Received Ctrl+C, shutting down"),
			Err(e) => {
				warn!("Failed to install Ctrl+C handler: {e}");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal(SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
				info!("Received terminate signal, shutting down");
			}
			Err(e) => {
				warn!("Failed to install signal handler: {e}");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
