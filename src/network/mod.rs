pub mod consensus;
pub mod peers;

pub use consensus::{ChainFetch, ChainSnapshot, ConsensusResolver, HttpChainFetch};
pub use peers::PeerRegistry;

/// Per-peer time budget for a chain fetch during consensus resolution.
pub const PEER_FETCH_TIMEOUT_SECS: u64 = 5;

/// How many peers are polled at once during consensus resolution.
pub const MAX_CONCURRENT_FETCHES: usize = 8;
