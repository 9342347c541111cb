use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use super::{MAX_CONCURRENT_FETCHES, PEER_FETCH_TIMEOUT_SECS};
use crate::blockchain::{Block, Blockchain, validate};

/// A peer's view of its chain, as served by its `GET /api/v1/chain/` route.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Fetches a peer's chain. Abstracted so resolution can be exercised
/// against simulated peers.
#[async_trait]
pub trait ChainFetch: Send + Sync {
    /// `None` means the peer has no opinion: unreachable, timed out,
    /// non-success status, or an undecodable body.
    async fn fetch_chain(&self, peer: &str) -> Option<ChainSnapshot>;
}

/// HTTP implementation of [`ChainFetch`] used against real peers.
pub struct HttpChainFetch {
    client: Client,
}

impl HttpChainFetch {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(PEER_FETCH_TIMEOUT_SECS))
            .build()
            .expect("build HTTP client");
        Self { client }
    }
}

impl Default for HttpChainFetch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainFetch for HttpChainFetch {
    async fn fetch_chain(&self, peer: &str) -> Option<ChainSnapshot> {
        let url = format!("http://{peer}/api/v1/chain/");
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("peer {peer} unreachable: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("peer {peer} answered {}", response.status());
            return None;
        }
        match response.json::<ChainSnapshot>().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!("peer {peer} sent an undecodable chain: {e}");
                None
            }
        }
    }
}

/// Longest-valid-chain resolution across the registered peers.
pub struct ConsensusResolver<F: ChainFetch> {
    fetch: F,
}

impl<F: ChainFetch> ConsensusResolver<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }

    /// Query every peer and adopt the longest chain that is strictly longer
    /// than the local one and passes validation. Returns whether the local
    /// chain was replaced.
    ///
    /// The ledger lock is never held across a fetch; the strictly-longer
    /// rule is re-checked against the live tip at commit time, since the
    /// chain may have grown while fetches were in flight.
    pub async fn resolve(&self, peers: &[String], ledger: &Mutex<Blockchain>) -> bool {
        let local_length = ledger.lock().expect("mutex poisoned").len();
        let Some(candidate) = self.find_longer_chain(peers, local_length).await else {
            return false;
        };

        let mut bc = ledger.lock().expect("mutex poisoned");
        if candidate.len() > bc.len() {
            bc.replace_chain(candidate);
            true
        } else {
            false
        }
    }

    /// Poll the peers with bounded concurrency and fold the answers in
    /// registration order, so the selection is deterministic regardless of
    /// response timing. A candidate wins only while its reported length
    /// strictly exceeds the running maximum and its chain validates; ties
    /// keep the incumbent, and silent peers abstain.
    async fn find_longer_chain(&self, peers: &[String], local_length: usize) -> Option<Vec<Block>> {
        let snapshots: Vec<Option<ChainSnapshot>> = stream::iter(peers)
            .map(|peer| self.fetch.fetch_chain(peer))
            .buffered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        let mut max_length = local_length;
        let mut longest: Option<Vec<Block>> = None;
        for (peer, snapshot) in peers.iter().zip(snapshots) {
            let Some(snapshot) = snapshot else { continue };
            if snapshot.length <= max_length {
                debug!(
                    "peer {peer} offered length {}, no longer than {max_length}",
                    snapshot.length
                );
                continue;
            }
            if !validate::is_valid_chain(&snapshot.chain) {
                warn!("peer {peer} offered an invalid chain, skipping");
                continue;
            }
            max_length = snapshot.length;
            longest = Some(snapshot.chain);
        }
        longest
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::{ChainFetch, ChainSnapshot, ConsensusResolver};
    use crate::blockchain::{Block, Blockchain, pow};

    /// Simulated peers answering from canned snapshots; unknown peers are
    /// unreachable.
    struct StaticFetch(HashMap<String, ChainSnapshot>);

    impl StaticFetch {
        fn new(peers: &[(&str, Vec<Block>)]) -> Self {
            let map = peers
                .iter()
                .map(|(peer, chain)| {
                    let snapshot = ChainSnapshot {
                        length: chain.len(),
                        chain: chain.clone(),
                    };
                    (peer.to_string(), snapshot)
                })
                .collect();
            Self(map)
        }
    }

    #[async_trait]
    impl ChainFetch for StaticFetch {
        async fn fetch_chain(&self, peer: &str) -> Option<ChainSnapshot> {
            self.0.get(peer).cloned()
        }
    }

    fn mined_chain(length: usize) -> Vec<Block> {
        let mut bc = Blockchain::new();
        while bc.len() < length {
            bc.add_transaction("A".into(), "B".into(), json!(bc.len()));
            let (previous_proof, previous_hash) = {
                let tip = bc.previous_block();
                (tip.proof, tip.compute_hash())
            };
            bc.create_block(pow::solve(previous_proof), previous_hash);
        }
        bc.chain
    }

    fn peer(address: &str) -> Vec<String> {
        vec![address.to_string()]
    }

    #[actix_web::test]
    async fn adopts_a_strictly_longer_valid_chain() {
        let longer = mined_chain(3);
        let resolver =
            ConsensusResolver::new(StaticFetch::new(&[("10.0.0.1:8080", longer.clone())]));
        let ledger = Mutex::new(Blockchain::new());

        assert!(resolver.resolve(&peer("10.0.0.1:8080"), &ledger).await);
        assert_eq!(ledger.lock().unwrap().chain, longer);
    }

    #[actix_web::test]
    async fn an_equal_length_chain_keeps_the_incumbent() {
        let other = mined_chain(2);
        let resolver =
            ConsensusResolver::new(StaticFetch::new(&[("10.0.0.1:8080", other)]));
        let ledger = Mutex::new(Blockchain::new());
        let local = mined_chain(2);
        ledger.lock().unwrap().replace_chain(local.clone());

        assert!(!resolver.resolve(&peer("10.0.0.1:8080"), &ledger).await);
        assert_eq!(ledger.lock().unwrap().chain, local);
    }

    #[actix_web::test]
    async fn a_longer_invalid_chain_is_skipped() {
        let mut forged = mined_chain(3);
        forged[1].proof += 1;
        let resolver = ConsensusResolver::new(StaticFetch::new(&[("10.0.0.1:8080", forged)]));
        let ledger = Mutex::new(Blockchain::new());

        assert!(!resolver.resolve(&peer("10.0.0.1:8080"), &ledger).await);
        assert_eq!(ledger.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn unreachable_peers_abstain_without_aborting_resolution() {
        let longer = mined_chain(2);
        let resolver =
            ConsensusResolver::new(StaticFetch::new(&[("10.0.0.2:8080", longer.clone())]));
        let ledger = Mutex::new(Blockchain::new());
        let peers = vec!["10.0.0.1:8080".to_string(), "10.0.0.2:8080".to_string()];

        assert!(resolver.resolve(&peers, &ledger).await);
        assert_eq!(ledger.lock().unwrap().chain, longer);
    }

    #[actix_web::test]
    async fn the_longest_of_several_valid_chains_wins() {
        let two = mined_chain(2);
        let three = mined_chain(3);
        let resolver = ConsensusResolver::new(StaticFetch::new(&[
            ("10.0.0.1:8080", two),
            ("10.0.0.2:8080", three.clone()),
        ]));
        let ledger = Mutex::new(Blockchain::new());
        let peers = vec!["10.0.0.1:8080".to_string(), "10.0.0.2:8080".to_string()];

        assert!(resolver.resolve(&peers, &ledger).await);
        assert_eq!(ledger.lock().unwrap().chain, three);
    }
}
