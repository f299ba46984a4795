//! Port specification parsing

use crate::ScanError;

/// Parse a port specification such as `1-1024`, `22,80,443` or `22,8000-8100`.
///
/// The result is sorted and free of duplicates.
pub fn parse_port_spec(spec: &str) -> crate::Result<Vec<u16>> {
    let mut ports = Vec::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_port(start)?;
            let end = parse_port(end)?;
            if start > end {
                return Err(ScanError::PortRangeError(format!(
                    "Start port {} cannot be greater than end port {}",
                    start, end
                )));
            }
            ports.extend(start..=end);
        } else {
            ports.push(parse_port(part)?);
        }
    }

    if ports.is_empty() {
        return Err(ScanError::PortRangeError(format!(
            "No ports in specification '{}'",
            spec
        )));
    }

    ports.sort_unstable();
    ports.dedup();
    Ok(ports)
}

fn parse_port(raw: &str) -> crate::Result<u16> {
    let raw = raw.trim();
    let port: u16 = raw
        .parse()
        .map_err(|e| ScanError::PortRangeError(format!("Invalid port '{}': {}", raw, e)))?;

    if port == 0 {
        return Err(ScanError::PortRangeError("Port 0 is not valid".to_string()));
    }
    Ok(port)
}
