use crate::models::node::normalize_endpoint;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Whether the node at `endpoint` is currently serving. Never fails:
    /// transport errors count as unhealthy.
    async fn is_healthy(&self, endpoint: &str) -> bool;
}

/// Issues `GET {endpoint}/status` and treats any 2xx response as healthy.
pub async fn is_node_healthy(client: &Client, endpoint: &str, timeout: Duration) -> bool {
    let url = format!("{}/status", normalize_endpoint(endpoint));

    match client.get(&url).timeout(timeout).send().await {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            debug!("{url} responded with {}", response.status());
            false
        }
        Err(e) => {
            debug!("Health check to {url} failed: {e}");
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    client: Client,
    timeout: Duration,
}

impl HttpHealthProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self::new(DEFAULT_HEALTH_CHECK_TIMEOUT)
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn is_healthy(&self, endpoint: &str) -> bool {
        is_node_healthy(&self.client, endpoint, self.timeout).await
    }
}

/// Health table keyed by endpoint. Endpoints that were never registered are
/// reported unhealthy.
pub struct MockHealthProbe {
    health: Arc<Mutex<HashMap<String, bool>>>,
    probed: Arc<Mutex<Vec<String>>>,
}

impl Default for MockHealthProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthProbe {
    pub fn new() -> Self {
        Self {
            health: Arc::new(Mutex::new(HashMap::new())),
            probed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_health<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let health = entries
            .into_iter()
            .map(|(endpoint, healthy)| (endpoint.into(), healthy))
            .collect();
        Self {
            health: Arc::new(Mutex::new(health)),
            probed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn set_health(&self, endpoint: &str, healthy: bool) {
        let mut health = self.health.lock().await;
        health.insert(endpoint.to_string(), healthy);
    }

    /// Endpoints probed so far, in call order.
    pub async fn probed(&self) -> Vec<String> {
        self.probed.lock().await.clone()
    }
}

#[async_trait]
impl HealthProbe for MockHealthProbe {
    async fn is_healthy(&self, endpoint: &str) -> bool {
        self.probed.lock().await.push(endpoint.to_string());
        let health = self.health.lock().await;
        health.get(endpoint).copied().unwrap_or(false)
    }
}
