//! Target address resolution

use crate::ScanError;
use std::net::IpAddr;
use std::str::FromStr;

/// Resolve a scan target to a single address.
///
/// Literal IPv4/IPv6 addresses are used as-is. Hostnames go through the system
/// resolver and the first IPv4 answer is preferred. A name that does not
/// resolve is an invalid target, never a closed port.
pub async fn resolve_target(target: &str) -> crate::Result<IpAddr> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ScanError::InvalidTarget("Target cannot be empty".to_string()));
    }

    if let Ok(ip) = IpAddr::from_str(target) {
        return Ok(ip);
    }

    // Bracketed IPv6 literal, e.g. "[::1]"
    if let Some(inner) = target.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return IpAddr::from_str(inner)
            .map_err(|e| ScanError::InvalidTarget(format!("{}: {}", target, e)));
    }

    let addrs: Vec<IpAddr> = tokio::net::lookup_host((target, 0))
        .await
        .map_err(|e| ScanError::InvalidTarget(format!("Could not resolve {}: {}", target, e)))?
        .map(|addr| addr.ip())
        .collect();

    let chosen = addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            ScanError::InvalidTarget(format!("{} resolved to no addresses", target))
        })?;

    log::debug!("Resolved {} to {}", target, chosen);
    Ok(chosen)
}
