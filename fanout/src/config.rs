use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 8724;
pub const DEFAULT_CLIENT_NAME: &str = "proxy";
const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Unsupported forward target scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Duplicate forward target: {0}")]
    DuplicateForwardTarget(String),

    #[error("Empty client name")]
    EmptyClientName,

    #[error("Forward timeout cannot be 0")]
    ZeroTimeout,
}

/// Relay configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for the API, metrics and liveness endpoints
    #[serde(default)]
    pub listener: Listener,
    /// Dashboards every call is replayed against, in call order
    #[serde(default)]
    pub forward: Vec<ForwardTarget>,
    /// Identity the relay presents to forward targets
    #[serde(default)]
    pub client: ClientIdentity,
    /// Upper bound for a single call to one forward target
    #[serde(default = "default_forward_timeout_secs")]
    pub forward_timeout_secs: u64,
    /// Largest accepted inbound request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_forward_timeout_secs() -> u64 {
    DEFAULT_FORWARD_TIMEOUT_SECS
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listener: Listener::default(),
            forward: Vec::new(),
            client: ClientIdentity::default(),
            forward_timeout_secs: DEFAULT_FORWARD_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Validates the relay configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;

        if self.client.name.is_empty() {
            return Err(ValidationError::EmptyClientName);
        }

        if self.forward_timeout_secs == 0 {
            return Err(ValidationError::ZeroTimeout);
        }

        let mut seen = HashSet::new();
        for target in &self.forward {
            match target.url.scheme() {
                "http" | "https" => {}
                other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
            }

            if !seen.insert(target.id()) {
                return Err(ValidationError::DuplicateForwardTarget(target.id()));
            }
        }

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
        }
    }
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// One downstream dashboard
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ForwardTarget {
    /// Base address; calls are sent to `<url>/api`
    pub url: Url,
    /// Label used in logs and metrics. Defaults to the URL.
    pub name: Option<String>,
}

impl ForwardTarget {
    pub fn new(url: Url) -> Self {
        ForwardTarget { url, name: None }
    }

    pub fn id(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.url.as_str().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ClientIdentity {
    #[serde(default = "default_client_name")]
    pub name: String,
    #[serde(default)]
    pub key: String,
}

fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_string()
}

impl Default for ClientIdentity {
    fn default() -> Self {
        ClientIdentity {
            name: default_client_name(),
            key: String::new(),
        }
    }
}
