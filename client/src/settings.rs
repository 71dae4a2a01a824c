use anyhow::Result;
use serde::Deserialize;

use crate::backend;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub backend: backend::Settings,
}

impl Settings {
    /// Loads `config/default.*` (if present) with `CLUB_*` environment
    /// overrides, e.g. `CLUB_BACKEND__BASE_URL`.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("CLUB").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
