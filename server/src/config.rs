use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct Config {
	pub port: u16,
	pub assets_dir: String,
	pub seed_file: Option<String>,
	pub readers_per_article: u64,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			port: 5000,
			assets_dir: "attached_assets".to_string(),
			seed_file: None,
			readers_per_article: 250,
		}
	}
}

impl Config {
	pub fn load() -> Self {
		let defaults = Self::default();
		Self {
			port: try_load("JOURNAL_PORT", defaults.port),
			assets_dir: try_load("JOURNAL_ASSETS_DIR", defaults.assets_dir),
			seed_file: var("JOURNAL_SEED_FILE").ok(),
			readers_per_article: try_load("JOURNAL_READERS_PER_ARTICLE", defaults.readers_per_article),
		}
	}
}

fn var(key: &str) -> Result<String, ()> {
	env::var(key).map_err(|_| {
		info!("Environment variable {key} not set");
	})
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
	T::Err: Display,
{
	match var(key) {
		Ok(value) => value.parse().unwrap_or_else(|e| {
			warn!("Invalid {key} value `{value}`: {e}, using default: {default}");
			default
		}),
		Err(()) => {
			info!("{key} using default: {default}");
			default
		}
	}
}
