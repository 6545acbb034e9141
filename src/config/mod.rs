use hostsfmt::{render_line, render_line_aligned, Entry, HostsError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub const RESERVED_HOSTNAME: &str = "%HOSTNAME%";
pub const RESERVED_LOCALHOST: &str = "localhost";
pub const RESERVED_IP6_LOCALHOST: &str = "ip6-localhost";
pub const RESERVED_IP6_LOOPBACK: &str = "ip6-loopback";
pub const RESERVED_IP6_ALLNODES: &str = "ip6-allnodes";
pub const RESERVED_IP6_ALLROUTERS: &str = "ip6-allrouters";

const IP4_LOCAL: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 1);
const IP4_LOCAL_ALT: Ipv4Addr = Ipv4Addr::new(127, 0, 1, 1);
const IP6_LOCAL: Ipv6Addr = Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1);
const IP6_ALL_NODES: Ipv6Addr = Ipv6Addr::new(65282, 0, 0, 0, 0, 0, 0, 1);
const IP6_ALL_ROUTERS: Ipv6Addr = Ipv6Addr::new(65282, 0, 0, 0, 0, 0, 0, 2);

/// Host names that may only point to the addresses listed here.
pub const RESERVED: &[ReservedEntry] = &[
    ReservedEntry {
        ip: IpAddr::V4(IP4_LOCAL),
        hostname: Cow::Borrowed(RESERVED_LOCALHOST),
    },
    ReservedEntry {
        ip: IpAddr::V4(IP4_LOCAL_ALT),
        hostname: Cow::Borrowed(RESERVED_HOSTNAME),
    },
    ReservedEntry {
        ip: IpAddr::V6(IP6_LOCAL),
        hostname: Cow::Borrowed(RESERVED_LOCALHOST),
    },
    ReservedEntry {
        ip: IpAddr::V6(IP6_LOCAL),
        hostname: Cow::Borrowed(RESERVED_IP6_LOCALHOST),
    },
    ReservedEntry {
        ip: IpAddr::V6(IP6_LOCAL),
        hostname: Cow::Borrowed(RESERVED_IP6_LOOPBACK),
    },
    ReservedEntry {
        ip: IpAddr::V6(IP6_ALL_NODES),
        hostname: Cow::Borrowed(RESERVED_IP6_ALLNODES),
    },
    ReservedEntry {
        ip: IpAddr::V6(IP6_ALL_ROUTERS),
        hostname: Cow::Borrowed(RESERVED_IP6_ALLROUTERS),
    },
];

#[derive(Debug)]
pub struct ReservedEntry<'a> {
    pub ip: IpAddr,
    pub hostname: Cow<'a, str>,
}

impl<'a> ReservedEntry<'a> {
    /// Host name of the entry, with the placeholder replaced by the system's host name.
    fn resolve<'b>(&'b self, system_hostname: &'b str) -> &'b str {
        if self.hostname == RESERVED_HOSTNAME {
            system_hostname
        } else {
            self.hostname.as_ref()
        }
    }
}

/// Returns the reserved entry that forbids mapping `host` to `ip`, if any. A reserved name may
/// only be mapped to one of the addresses it is reserved for.
pub fn reserved_conflict(
    ip: &IpAddr,
    host: &str,
    system_hostname: &str,
) -> Option<&'static ReservedEntry<'static>> {
    let host = host.to_lowercase();
    let system_hostname = system_hostname.to_lowercase();
    let mut matching = RESERVED
        .iter()
        .filter(|reserved| reserved.resolve(&system_hostname) == host)
        .peekable();
    let first = *matching.peek()?;
    if matching.any(|reserved| &reserved.ip == ip) {
        None
    } else {
        Some(first)
    }
}

/// Layout of the generated lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// `<address>  <name1>  <name2>`
    Canonical,
    /// Address padded to a fixed column, names separated by single spaces.
    Aligned,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle::Canonical
    }
}

impl LineStyle {
    pub fn render(self, entry: &Entry) -> Result<String, HostsError> {
        match self {
            LineStyle::Canonical => render_line(entry),
            LineStyle::Aligned => render_line_aligned(entry),
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
pub struct HostsfmtConfig {
    pub whitelist: BTreeSet<String>,
    #[serde(default)]
    pub style: LineStyle,
    #[serde(skip_serializing)]
    #[serde(default = "safely_false")]
    pub enable_dangerous_operations: bool,
}

impl HostsfmtConfig {
    /// Checks the whitelist, ignoring case like the hosts file itself does.
    pub fn is_whitelisted(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.whitelist
            .iter()
            .any(|allowed| allowed.to_lowercase() == host)
    }
}

impl std::fmt::Debug for HostsfmtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("HostsfmtConfig")
            .field("whitelist", &self.whitelist)
            .field("style", &self.style)
            .finish()
    }
}

fn safely_false() -> bool {
    false
}
