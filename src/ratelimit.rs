//! Per-client rate limiting, keyed by the peer IP address.

use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	response::{IntoResponse, Response},
};
use governor::middleware::{NoOpMiddleware, StateInformationMiddleware};
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::PeerIpKeyExtractor,
	GovernorError,
};

use crate::error::AppError;

pub type Config = GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// The limiters of the API. Both need the peer address, so the router must be
/// served with connect info when they are used.
#[derive(Clone)]
pub struct RateLimits {
	/// Applied to every route: bursts of 50, one request refilled every 100ms.
	pub default: Arc<Config>,
	/// Applied on top of the default to credential and contact routes:
	/// bursts of 5, one request refilled every 2s.
	pub strict: Arc<Config>,
}

impl RateLimits {
	/// Builds both limiters, or `None` if a quota is invalid.
	pub fn new() -> Option<Self> {
		Some(Self {
			default: limiter(GovernorConfigBuilder::default().per_millisecond(100).burst_size(50))?,
			strict: limiter(GovernorConfigBuilder::default().per_second(2).burst_size(5))?,
		})
	}

	/// Drops limiter state for clients that have not been seen recently, once a minute.
	pub fn spawn_cleanup(&self) {
		let limiters = [self.default.limiter().clone(), self.strict.limiter().clone()];

		std::thread::spawn(move || loop {
			std::thread::sleep(CLEANUP_INTERVAL);

			for limiter in &limiters {
				tracing::debug!(size = limiter.len(), "rate limiting storage");

				limiter.retain_recent();
			}
		});
	}
}

fn limiter(
	builder: &mut GovernorConfigBuilder<PeerIpKeyExtractor, NoOpMiddleware>,
) -> Option<Arc<Config>> {
	builder
		.use_headers()
		.error_handler(error_handler)
		.finish()
		.map(Arc::new)
}

fn error_handler(error: GovernorError) -> Response<Body> {
	AppError::from(error).into_response()
}
