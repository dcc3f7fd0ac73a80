use std::net::IpAddr;

use tracing::level_filters::LevelFilter;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{name} must be {expected}, got {value:?}")]
	Invalid {
		name: &'static str,
		expected: &'static str,
		value: String,
	},
}

/// Runtime configuration, read from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct Config {
	pub host: IpAddr,
	pub port: u16,
	pub log_level: LevelFilter,
	/// Enables OpenTelemetry export when set.
	pub otlp_endpoint: Option<String>,
	pub seed_sample_data: bool,
	/// Sets the `Secure` flag on session cookies.
	pub secure_cookies: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			host: IpAddr::from([127, 0, 0, 1]),
			port: 3000,
			log_level: LevelFilter::INFO,
			otlp_endpoint: None,
			seed_sample_data: false,
			secure_cookies: !cfg!(debug_assertions),
		}
	}
}

fn parse<T: std::str::FromStr>(
	name: &'static str,
	expected: &'static str,
	value: Option<String>,
	default: T,
) -> Result<T, Error> {
	let Some(value) = value else {
		return Ok(default);
	};

	value.trim().parse().map_err(|_| Error::Invalid {
		name,
		expected,
		value,
	})
}

fn parse_bool(name: &'static str, value: Option<String>, default: bool) -> Result<bool, Error> {
	let Some(value) = value else {
		return Ok(default);
	};

	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(Error::Invalid {
			name,
			expected: "a boolean",
			value,
		}),
	}
}

impl Config {
	/// Reads the configuration from the process environment, loading `.env` first if present.
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the configuration through `lookup`. Unset variables fall back to their defaults,
	/// set but unparseable ones are an error.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let default = Self::default();

		Ok(Self {
			host: parse("HOST", "an IP address", lookup("HOST"), default.host)?,
			port: parse("PORT", "a port number", lookup("PORT"), default.port)?,
			log_level: parse(
				"LOG_LEVEL",
				"one of off, error, warn, info, debug or trace",
				lookup("LOG_LEVEL"),
				default.log_level,
			)?,
			otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|endpoint| !endpoint.trim().is_empty()),
			seed_sample_data: parse_bool(
				"SEED_SAMPLE_DATA",
				lookup("SEED_SAMPLE_DATA"),
				default.seed_sample_data,
			)?,
			secure_cookies: parse_bool(
				"SECURE_COOKIES",
				lookup("SECURE_COOKIES"),
				default.secure_cookies,
			)?,
		})
	}
}
