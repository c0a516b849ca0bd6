//! SSH port range and host socket-table parsing.
//!
//! Pure functions over the text the socket utilities print; gathering that
//! text is the `SocketProbe` port's job.

use std::collections::BTreeSet;

/// Inclusive range of host ports handed out for container SSH endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub low: u16,
    pub high: u16,
}

/// The configured SSH port range.
pub const SSH_PORT_RANGE: PortRange = PortRange {
    low: 2220,
    high: 2299,
};

impl PortRange {
    /// First port of the range, scanning upwards, that is not in `reserved`.
    #[must_use]
    pub fn first_free(&self, reserved: &BTreeSet<u16>) -> Option<u16> {
        (self.low..=self.high).find(|p| !reserved.contains(p))
    }
}

/// Ports in `LISTEN` state from `ss -Htln` or `netstat -tln` style output.
///
/// Only lines carrying a `LISTEN` token are considered; the local address is
/// the fourth column and the port is whatever follows its last `:` (Linux) or
/// `.` (BSD netstat).
#[must_use]
pub fn parse_socket_listing(text: &str) -> BTreeSet<u16> {
    text.lines()
        .filter(|line| line.split_whitespace().any(|col| col == "LISTEN"))
        .filter_map(|line| line.split_whitespace().nth(3))
        .filter_map(port_from_local_address)
        .collect()
}

/// Ports in `LISTEN` state (`0A`) from `/proc/net/tcp` or `/proc/net/tcp6`.
#[must_use]
pub fn parse_proc_net_tcp(text: &str) -> BTreeSet<u16> {
    text.lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            let (local, state) = (cols.get(1)?, cols.get(3)?);
            if *state != "0A" {
                return None;
            }
            let hex = local.rsplit(':').next()?;
            u16::from_str_radix(hex, 16).ok()
        })
        .collect()
}

/// Port number at the end of a local-address column.
#[must_use]
pub fn port_from_local_address(addr: &str) -> Option<u16> {
    addr.rsplit([':', '.']).next()?.parse::<u16>().ok()
}
