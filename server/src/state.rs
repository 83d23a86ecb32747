use std::sync::Arc;

use tracing::info;

use super::{config::Config, error::StartupError, seed::SeedData, store::Store};

pub struct AppState {
	pub config: Config,
	pub store: Store,
}

impl AppState {
	/// Seeds the store from the configured seed file, or the built-in
	/// journal content when none is set.
	pub fn new(config: Config) -> Result<Arc<Self>, StartupError> {
		let seed = match &config.seed_file {
			Some(path) => SeedData::from_file(path)?,
			None => {
				info!("No seed file configured, using built-in content");
				SeedData::journal()
			}
		};
		let store = Store::seeded(seed)?;

		Ok(Self::with_store(config, store))
	}

	pub fn with_store(config: Config, store: Store) -> Arc<Self> {
		Arc::new(Self { config, store })
	}
}
