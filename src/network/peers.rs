use std::collections::HashSet;

use url::Url;

/// The set of known peer addresses, kept as normalized `host:port` strings.
/// Peers are only ever added; there is no eviction.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer address. Idempotent: re-registering an address that
    /// normalizes to an existing entry is a no-op. Whatever the normalizer
    /// produces is inserted; malformed input is accepted as given rather
    /// than rejected.
    pub fn register(&mut self, address: &str) {
        self.peers.insert(normalize(address));
    }

    /// Current peer set in sorted order, for responses and resolution.
    pub fn snapshot(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.peers.iter().cloned().collect();
        peers.sort();
        peers
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Reduce an address to `host:port`. Scheme-less input is read as HTTP;
/// input the parser cannot make sense of is kept as given, trimmed.
fn normalize(address: &str) -> String {
    let trimmed = address.trim();
    host_port(trimmed)
        .or_else(|| host_port(&format!("http://{trimmed}")))
        .unwrap_or_else(|| trimmed.to_string())
}

fn host_port(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::PeerRegistry;

    #[test]
    fn registration_is_idempotent() {
        let mut registry = PeerRegistry::new();
        registry.register("http://127.0.0.1:5001");
        registry.register("127.0.0.1:5001");
        registry.register(" 127.0.0.1:5001 ");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot(), vec!["127.0.0.1:5001".to_string()]);
    }

    #[test]
    fn full_urls_are_reduced_to_host_and_port() {
        let mut registry = PeerRegistry::new();
        registry.register("http://node.example.com:8080/api/v1/chain/");
        assert_eq!(registry.snapshot(), vec!["node.example.com:8080".to_string()]);
    }

    #[test]
    fn hostnames_without_an_explicit_port_keep_the_host_only() {
        let mut registry = PeerRegistry::new();
        registry.register("http://node.example.com");
        assert_eq!(registry.snapshot(), vec!["node.example.com".to_string()]);
    }

    #[test]
    fn unparseable_input_is_kept_as_given() {
        let mut registry = PeerRegistry::new();
        registry.register("not a url at all");
        assert_eq!(registry.snapshot(), vec!["not a url at all".to_string()]);
    }
}
