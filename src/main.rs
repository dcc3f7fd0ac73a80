#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod model;
mod notify;
mod openapi;
mod ratelimit;
mod route;
mod seed;
mod session;
mod store;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use argon2::Argon2;
use axum::{extract::FromRef, ServiceExt};
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

use crate::{config::Config, notify::Notifier, store::Store};

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the store, a hash configuration (since it's expensive to create),
/// or a notification transport.
#[derive(Clone, FromRef)]
pub struct AppState {
	pub store: Store,
	pub hasher: Argon2<'static>,
	pub notifier: Arc<dyn Notifier>,
	pub config: Arc<Config>,
}

#[derive(Debug, thiserror::Error)]
enum Error {
	#[error("configuration error: {0}")]
	Config(#[from] config::Error),
	#[error("tracing error: {0}")]
	Trace(#[from] trace::Error),
	#[error("seeding error: {0}")]
	Seed(#[from] seed::Error),
	#[error("invalid rate limiter configuration")]
	RateLimit,
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	let config = Config::from_env()?;
	let _guard = trace::init_tracing_subscriber(config.log_level, config.otlp_endpoint.as_deref())?;

	let state = AppState {
		store: Store::new(),
		hasher: Argon2::default(),
		notifier: Arc::new(notify::LogNotifier),
		config: Arc::new(config.clone()),
	};

	if config.seed_sample_data {
		seed::sample_data(&state.store, &state.hasher).await?;
	}

	let limits = ratelimit::RateLimits::new().ok_or(Error::RateLimit)?;
	limits.spawn_cleanup();

	let app = NormalizePathLayer::trim_trailing_slash().layer(route::app(state, Some(limits)));
	let listener = tokio::net::TcpListener::bind((config.host, config.port)).await?;

	tracing::info!(host = %config.host, port = config.port, "listening");

	axum::serve(
		listener,
		ServiceExt::<axum::extract::Request>::into_make_service_with_connect_info::<SocketAddr>(
			app,
		),
	)
	.await?;

	Ok(())
}
