use crate::error::SelectionError;
use crate::health::HealthProbe;
use crate::models::node::StorageNode;
use crate::utils::rendezvous::RendezvousHash;
use futures::future::join_all;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::Arc;


/// Sink for selection anomalies. Only used for reporting, never for control
/// flow.
pub trait SelectionLogger: Send + Sync {
    fn error(&self, message: &str);
}

/// Forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLogger;

impl SelectionLogger for DefaultLogger {
    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Picks storage nodes for a request: samples candidates, probes them
/// concurrently, and optionally orders the healthy ones by rendezvous hash.
#[derive(Clone)]
pub struct NodeSelector {
    probe: Arc<dyn HealthProbe>,
    logger: Arc<dyn SelectionLogger>,
}

impl NodeSelector {
    pub fn new(probe: Arc<dyn HealthProbe>) -> Self {
        Self {
            probe,
            logger: Arc::new(DefaultLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn SelectionLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn is_node_healthy(&self, endpoint: &str) -> bool {
        self.probe.is_healthy(endpoint).await
    }

    /// Returns up to `num_nodes` healthy endpoints out of `all_nodes`.
    ///
    /// A `num_nodes` of 0 considers every candidate. With a non-empty
    /// `rendezvous_key` the healthy endpoints are ordered by rendezvous hash
    /// over their delegate owner wallets; otherwise they keep candidate order.
    /// Never fails: problems are reported to the logger and yield a short or
    /// empty list.
    pub async fn get_n_storage_nodes(
        &self,
        all_nodes: &[StorageNode],
        num_nodes: usize,
        rendezvous_key: &str,
    ) -> Vec<String> {
        let candidates = sample_candidates(all_nodes, num_nodes, &mut rand::rng());
        self.select_from_candidates(candidates, num_nodes, rendezvous_key)
            .await
    }

    /// Same as [`NodeSelector::get_n_storage_nodes`] with a caller supplied
    /// source of randomness for the candidate sample.
    pub async fn get_n_storage_nodes_with_rng<R: Rng + ?Sized>(
        &self,
        all_nodes: &[StorageNode],
        num_nodes: usize,
        rendezvous_key: &str,
        rng: &mut R,
    ) -> Vec<String> {
        let candidates = sample_candidates(all_nodes, num_nodes, rng);
        self.select_from_candidates(candidates, num_nodes, rendezvous_key)
            .await
    }

    async fn select_from_candidates(
        &self,
        candidates: Vec<StorageNode>,
        num_nodes: usize,
        rendezvous_key: &str,
    ) -> Vec<String> {
        let healthy = self.healthy_candidates(candidates).await;

        let endpoints = match order_endpoints(&healthy, num_nodes, rendezvous_key) {
            Ok(endpoints) => endpoints,
            Err(e) => {
                self.logger
                    .error(&format!("Failed to select storage nodes: {e}"));
                return vec![];
            }
        };

        if endpoints.is_empty() || (num_nodes > 0 && endpoints.len() < num_nodes) {
            self.logger.error(&format!(
                "Requested {num_nodes} storage nodes but only {} of {} sampled candidates are healthy",
                endpoints.len(),
                healthy.total
            ));
        }

        endpoints
    }

    async fn healthy_candidates(&self, candidates: Vec<StorageNode>) -> HealthyCandidates {
        let checks = candidates
            .iter()
            .map(|node| self.probe.is_healthy(&node.endpoint));
        let results = join_all(checks).await;

        let total = candidates.len();
        let nodes = candidates
            .into_iter()
            .zip(results)
            .filter_map(|(node, healthy)| healthy.then_some(node))
            .collect();

        HealthyCandidates { nodes, total }
    }
}

struct HealthyCandidates {
    nodes: Vec<StorageNode>,
    total: usize,
}

/// Uniform sample of `num_nodes` candidates without replacement, or all of
/// them when `num_nodes` is 0.
pub fn sample_candidates<R: Rng + ?Sized>(
    all_nodes: &[StorageNode],
    num_nodes: usize,
    rng: &mut R,
) -> Vec<StorageNode> {
    if num_nodes == 0 {
        return all_nodes.to_vec();
    }
    all_nodes.choose_multiple(rng, num_nodes).cloned().collect()
}

fn order_endpoints(
    healthy: &HealthyCandidates,
    num_nodes: usize,
    rendezvous_key: &str,
) -> Result<Vec<String>, SelectionError> {
    if rendezvous_key.is_empty() {
        return Ok(healthy
            .nodes
            .iter()
            .map(|node| node.endpoint.clone())
            .collect());
    }

    if let Some(node) = healthy
        .nodes
        .iter()
        .find(|node| node.delegate_owner_wallet.is_empty())
    {
        return Err(SelectionError::MissingWallet {
            endpoint: node.endpoint.clone(),
        });
    }

    let hash = RendezvousHash::new(
        healthy
            .nodes
            .iter()
            .map(|node| node.delegate_owner_wallet.as_str()),
    );
    let limit = if num_nodes == 0 { hash.len() } else { num_nodes };

    // Ranked indices join back to the same candidate even if wallets repeat.
    Ok(hash
        .rank(rendezvous_key)
        .into_iter()
        .take(limit)
        .filter_map(|idx| healthy.nodes.get(idx))
        .map(|node| node.endpoint.clone())
        .collect())
}
