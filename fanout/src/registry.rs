//! Forward targets the relay replays calls against.
//!
//! The registry is built once at startup from configuration, in configuration
//! order, and stays immutable while requests are served. Dispatch walks it in
//! that same order.

use crate::config::Config;
use dashapi::{Client, ClientError, Dashboard};
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Duration;

pub struct Registry {
    /// Target id to adapter, preserving configuration order
    dashboards: IndexMap<String, Arc<dyn Dashboard>>,
}

impl Registry {
    pub fn new<I>(dashboards: I) -> Self
    where
        I: IntoIterator<Item = (String, Arc<dyn Dashboard>)>,
    {
        Registry {
            dashboards: dashboards.into_iter().collect(),
        }
    }

    /// Builds one HTTP client per configured forward target.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let timeout = Duration::from_secs(config.forward_timeout_secs);

        let mut dashboards: IndexMap<String, Arc<dyn Dashboard>> = IndexMap::new();
        for target in &config.forward {
            let client = Client::new(
                &target.url,
                config.client.name.as_str(),
                config.client.key.as_str(),
                timeout,
            )?;
            tracing::info!(target = %target.id(), api_url = %client.api_url(), "Registered forward target");
            dashboards.insert(target.id(), Arc::new(client));
        }

        if dashboards.is_empty() {
            tracing::warn!("No forward targets configured, calls will not reach any dashboard");
        }

        Ok(Registry { dashboards })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Dashboard)> {
        self.dashboards
            .iter()
            .map(|(id, dashboard)| (id.as_str(), dashboard.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }
}
