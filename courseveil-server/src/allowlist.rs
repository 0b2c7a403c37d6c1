//! Network allowlist gating course registration.

use std::net::IpAddr;

use ipnet::IpNet;

/// Networks allowed to register new courses out of the box: loopback and
/// the campus admin ranges.
pub const DEFAULT_NETWORKS: &[&str] =
    &["127.0.0.1/24", "10.0.10.0/24", "10.0.0.0/24", "10.0.1.0/24"];

/// CIDR allowlist for the course-creation endpoint.
#[derive(Debug, Clone)]
pub struct Allowlist {
    networks: Vec<IpNet>,
}

impl Allowlist {
    /// Builds an allowlist from already-parsed networks.
    #[must_use]
    pub fn new(networks: Vec<IpNet>) -> Self {
        Self { networks }
    }

    /// The built-in default networks.
    #[must_use]
    pub fn default_networks() -> Self {
        let networks = DEFAULT_NETWORKS
            .iter()
            .map(|entry| entry.parse().expect("default allowlist entries parse"))
            .collect();
        Self::new(networks)
    }

    /// Whether an address falls inside any allowed network.
    #[must_use]
    pub fn permits(&self, addr: IpAddr) -> bool {
        self.networks.iter().any(|net| net.contains(&addr))
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::default_networks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_is_allowed_by_default() {
        let allowlist = Allowlist::default_networks();
        assert!(allowlist.permits("127.0.0.1".parse().unwrap()));
        assert!(allowlist.permits("10.0.10.42".parse().unwrap()));
    }

    #[test]
    fn public_addresses_are_denied_by_default() {
        let allowlist = Allowlist::default_networks();
        assert!(!allowlist.permits("203.0.113.7".parse().unwrap()));
        assert!(!allowlist.permits("2001:db8::1".parse().unwrap()));
    }

    #[test]
    fn custom_networks_replace_defaults() {
        let allowlist = Allowlist::new(vec!["192.0.2.0/28".parse().unwrap()]);
        assert!(allowlist.permits("192.0.2.5".parse().unwrap()));
        assert!(!allowlist.permits("127.0.0.1".parse().unwrap()));
    }
}
