//! Submitter address normalization for result records.

use std::net::SocketAddr;

/// Strip a trailing `:port` suffix from a submitter address.
///
/// Everything after the last colon is dropped, so `10.0.0.5:54321`
/// becomes `10.0.0.5`. Addresses without a colon are returned as-is.
pub fn normalize_submitter(address: &str) -> &str {
    match address.rfind(':') {
        Some(idx) => &address[..idx],
        None => address,
    }
}

/// Render a peer socket address in the form [`normalize_submitter`] expects.
///
/// IPv4-mapped IPv6 peers (`::ffff:a.b.c.d`) are converted to plain IPv4
/// first so the same host always maps to the same record name.
pub fn submitter_from_peer(peer: SocketAddr) -> String {
    SocketAddr::new(peer.ip().to_canonical(), peer.port()).to_string()
}
