use anyhow::Result;
use serde::Deserialize;

/// Runtime configuration for the voxgate binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Recognizer engine to wire: "noop" or "scripted".
    pub engine: String,

    /// Ambient locale override; unset means read the system environment.
    pub locale: Option<String>,

    /// Buffer depth of the engine and protocol event channels.
    pub channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: "noop".to_string(),
            locale: None,
            channel_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file layered with
    /// `VOXGATE_*` environment overrides. Without an explicit path, a
    /// `voxgate.toml` in the working directory is picked up when present.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        builder = match path {
            Some(path) => builder.add_source(config::File::with_name(path)),
            None => builder.add_source(config::File::with_name("voxgate").required(false)),
        };

        let settings = builder
            .add_source(config::Environment::with_prefix("VOXGATE"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
