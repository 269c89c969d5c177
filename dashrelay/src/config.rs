use fanout::config::{Config as RelayConfig, ForwardTarget};
use serde::Deserialize;
use std::fs::File;
use url::Url;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
    pub prefix: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: Option<String>,
    /// `tracing_subscriber::EnvFilter` directives, `RUST_LOG` takes precedence
    pub filter: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    #[serde(flatten)]
    pub relay: RelayConfig,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Applies command line settings on top of the file.
    ///
    /// Forward targets are appended after the ones from the file.
    pub fn apply_overrides(&mut self, host: Option<String>, port: Option<u16>, forward: Vec<Url>) {
        if let Some(host) = host {
            self.relay.listener.host = host;
        }
        if let Some(port) = port {
            self.relay.listener.port = port;
        }
        self.relay
            .forward
            .extend(forward.into_iter().map(ForwardTarget::new));
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}
