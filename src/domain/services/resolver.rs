//! Regional Target Resolver
//!
//! Maps a server's country to a deterministic pseudo-IP and a proxy target
//! URL. This is stable identity, not geolocation: the same server always
//! resolves to the same address for the life of the process, so in-flight
//! traffic stats stay attributable to one destination.

use crate::domain::entities::Server;

/// IP prefix assigned to countries without a mapping.
const DEFAULT_PREFIX: &str = "192.168.1.";

/// Fixed country -> IP-prefix table.
const REGION_PREFIXES: &[(&str, &str)] = &[
    ("United States", "104.16.132."),
    ("Germany", "130.41.228."),
    ("Japan", "162.159.135."),
    ("Singapore", "172.67.75."),
    ("United Kingdom", "104.26.5."),
    ("Canada", "104.18.114."),
    ("Australia", "103.21.244."),
    ("France", "172.64.163."),
    ("Netherlands", "195.85.23."),
    ("Brazil", "190.93.246."),
];

/// The outcome of resolving a server: the pseudo-IP shown to the client and
/// the URL the tunnel gateway forwards to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub pseudo_ip: String,
    pub proxy_target: String,
}

/// Resolve a server to its regional pseudo-IP and proxy target.
///
/// Pure: same server in, same target out. The target is syntactic only and
/// is never probed for reachability here.
pub fn resolve(server: &Server) -> ResolvedTarget {
    let prefix = prefix_for_country(&server.country);
    // Last octet derived from the server ID keeps the address stable
    let last_octet = 1 + (server.id.rem_euclid(254));
    let pseudo_ip = format!("{}{}", prefix, last_octet);
    let proxy_target = format!("http://{}:80", pseudo_ip);

    ResolvedTarget {
        pseudo_ip,
        proxy_target,
    }
}

/// Prefix for a country, falling back to the default for unmapped ones.
fn prefix_for_country(country: &str) -> &'static str {
    REGION_PREFIXES
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, prefix)| *prefix)
        .unwrap_or(DEFAULT_PREFIX)
}

/// Reverse lookup: which country does an IP belong to, by prefix match.
///
/// Used by the ip-check endpoint to label forwarded traffic.
pub fn country_for_ip(ip: &str) -> Option<&'static str> {
    REGION_PREFIXES
        .iter()
        .find(|(_, prefix)| ip.starts_with(prefix))
        .map(|(name, _)| *name)
}
