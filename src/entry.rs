use crate::error::HostsError;
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::str::FromStr;

/// Character starting a comment in a hosts file.
pub const COMMENT_SIGN: char = '#';

/// Capabilities of a single hosts entry: one address mapped to a set of host names.
pub trait HostEntry {
    /// Address of the entry.
    fn ip(&self) -> IpAddr;

    /// Host names of the entry, lexicographically sorted.
    fn host_names(&self) -> Vec<String>;

    /// Adds a host name, stored lower-cased. Adding a name that is already present (in any case)
    /// does nothing.
    fn add_host_name(&mut self, host_name: &str) -> Result<(), HostsError>;

    /// Checks whether the literal `host_name` is stored. Names are stored lower-cased, so callers
    /// wanting a case-insensitive check have to lower-case the needle first.
    fn contains(&self, host_name: &str) -> bool;
}

/// Brings an address into the form used as table key and in rendered lines: IPv4-mapped IPv6
/// addresses (`::ffff:a.b.c.d`) become plain IPv4 addresses.
pub fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        IpAddr::V4(_) => ip,
    }
}

/// Hosts entry backed by an ordered set of lower-cased host names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    ip: IpAddr,
    host_names: BTreeSet<String>,
}

impl Entry {
    /// Creates an entry for `ip` holding all of `host_names`. The first invalid host name aborts
    /// construction.
    pub fn new<I, S>(ip: IpAddr, host_names: I) -> Result<Self, HostsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entry = Entry::with_ip(ip);
        for host_name in host_names {
            entry.add_host_name(host_name.as_ref())?;
        }
        Ok(entry)
    }

    /// Creates an entry without host names. IPv4-mapped IPv6 addresses are stored as IPv4.
    pub fn with_ip(ip: IpAddr) -> Self {
        Entry {
            ip: canonical_ip(ip),
            host_names: BTreeSet::new(),
        }
    }

    /// Like [`Entry::new`], but takes the address as text.
    pub fn parse<I, S>(ip: &str, host_names: I) -> Result<Self, HostsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ip = IpAddr::from_str(ip).map_err(|_| HostsError::InvalidAddress(ip.to_string()))?;
        Entry::new(ip, host_names)
    }

    /// Number of distinct host names.
    pub fn len(&self) -> usize {
        self.host_names.len()
    }

    /// Checks whether the entry holds no host names at all.
    pub fn is_empty(&self) -> bool {
        self.host_names.is_empty()
    }

    /// Iterates the host names in sorted order without copying them.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.host_names.iter().map(String::as_str)
    }
}

impl HostEntry for Entry {
    fn ip(&self) -> IpAddr {
        self.ip
    }

    fn host_names(&self) -> Vec<String> {
        self.host_names.iter().cloned().collect()
    }

    fn add_host_name(&mut self, host_name: &str) -> Result<(), HostsError> {
        validate_host_name(host_name)?;
        let host_name = host_name.to_lowercase();
        if !self.host_names.contains(&host_name) {
            self.host_names.insert(host_name);
        }
        Ok(())
    }

    fn contains(&self, host_name: &str) -> bool {
        self.host_names.contains(host_name)
    }
}

fn validate_host_name(host_name: &str) -> Result<(), HostsError> {
    if host_name.is_empty()
        || host_name
            .chars()
            .any(|c| c.is_whitespace() || c == COMMENT_SIGN)
    {
        return Err(HostsError::InvalidHostName(host_name.to_string()));
    }
    Ok(())
}

/// Produces an independent copy of `entry`, failing with [`HostsError::NilEntry`] if there is
/// none.
pub fn clone_entry<E>(entry: Option<&E>) -> Result<Entry, HostsError>
where
    E: HostEntry + ?Sized,
{
    let entry = entry.ok_or(HostsError::NilEntry)?;
    Entry::new(entry.ip(), entry.host_names())
}
