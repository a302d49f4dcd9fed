//! Listen endpoint strings.
//!
//! Accepted forms:
//! - `tcp:9999`
//! - `tcp:port=9999:interface=127.0.0.1` (keys in any order)
//! - `127.0.0.1:9999` / `[::1]:9999`

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use cephprom_core::error::{Error, Result};

pub fn parse_endpoint(raw: &str) -> Result<SocketAddr> {
    let bad = |why: &str| Error::Config(format!("invalid endpoint {raw:?}: {why}"));

    let Some(rest) = raw.strip_prefix("tcp:") else {
        return raw
            .parse::<SocketAddr>()
            .map_err(|_| bad("expected tcp:<port> or <host>:<port>"));
    };

    let mut port: Option<u16> = None;
    let mut interface = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

    // IPv6 interfaces carry colons of their own; those must be escaped as `\:`.
    let unescaped = rest.replace("\\:", "\u{0}");
    for (i, part) in unescaped.split(':').enumerate() {
        let part = part.replace('\u{0}', ":");
        match part.split_once('=') {
            Some(("port", v)) => port = Some(v.parse().map_err(|_| bad("port is not a number"))?),
            Some(("interface", v)) => {
                interface = v.parse().map_err(|_| bad("interface is not an IP address"))?
            }
            Some((key, _)) => return Err(bad(&format!("unknown key {key}"))),
            None if i == 0 => port = Some(part.parse().map_err(|_| bad("port is not a number"))?),
            None => return Err(bad("unexpected positional argument")),
        }
    }

    let port = port.ok_or_else(|| bad("missing port"))?;
    Ok(SocketAddr::new(interface, port))
}
