use crate::entry::{canonical_ip, Entry, HostEntry};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::iter::FromIterator;
use std::net::IpAddr;

/// Capabilities of a table of hosts entries, holding at most one entry per address. Addresses are
/// compared in canonical form, an IPv4-mapped IPv6 address is the same as its IPv4 address.
pub trait HostTable {
    /// Merges the host names of `entry` into the table's entry for the same address, creating
    /// that entry if needed. Names the table's entries would reject are skipped.
    fn add_entry<E>(&mut self, entry: &E)
    where
        E: HostEntry + ?Sized;

    /// Merges every entry of `entries`, see [`HostTable::add_entry`].
    fn add_entries<I>(&mut self, entries: I)
    where
        I: IntoIterator,
        I::Item: Borrow<Entry>,
    {
        for entry in entries {
            let entry: &Entry = entry.borrow();
            self.add_entry(entry);
        }
    }

    /// Checks whether the table has an entry for the address of `entry` holding at least all of
    /// its host names.
    fn contains<E>(&self, entry: &E) -> bool
    where
        E: HostEntry + ?Sized;

    /// Sorted copy of the host names stored for `ip`.
    fn entries_of_ip(&self, ip: &IpAddr) -> Option<Vec<String>>;

    /// Copies of all entries, one per address. Order is up to the implementation.
    fn all_entries(&self) -> Vec<Entry>;
}

fn merge_into<E>(internal: &mut Entry, entry: &E)
where
    E: HostEntry + ?Sized,
{
    for host_name in entry.host_names() {
        internal.add_host_name(&host_name).ok();
    }
}

fn is_superset<E>(internal: Option<&Entry>, entry: &E) -> bool
where
    E: HostEntry + ?Sized,
{
    match internal {
        Some(internal) => entry
            .host_names()
            .iter()
            .all(|host_name| internal.contains(host_name)),
        None => false,
    }
}

macro_rules! host_table {
    ($(#[$attr:meta])* $name:ident, $map:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            entries: $map<IpAddr, Entry>,
        }

        impl $name {
            /// Creates an empty set.
            pub fn new() -> Self {
                Self::default()
            }

            /// Number of distinct addresses.
            pub fn len(&self) -> usize {
                self.entries.len()
            }

            /// Checks whether the set holds no entries.
            pub fn is_empty(&self) -> bool {
                self.entries.is_empty()
            }
        }

        impl HostTable for $name {
            fn add_entry<E>(&mut self, entry: &E)
            where
                E: HostEntry + ?Sized,
            {
                let ip = canonical_ip(entry.ip());
                let internal = self
                    .entries
                    .entry(ip)
                    .or_insert_with(|| Entry::with_ip(ip));
                merge_into(internal, entry);
            }

            fn contains<E>(&self, entry: &E) -> bool
            where
                E: HostEntry + ?Sized,
            {
                is_superset(self.entries.get(&canonical_ip(entry.ip())), entry)
            }

            fn entries_of_ip(&self, ip: &IpAddr) -> Option<Vec<String>> {
                self.entries
                    .get(&canonical_ip(*ip))
                    .map(|entry| entry.host_names())
            }

            fn all_entries(&self) -> Vec<Entry> {
                self.entries.values().cloned().collect()
            }
        }

        impl FromIterator<Entry> for $name {
            fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
                let mut set = $name::new();
                set.add_entries(iter);
                set
            }
        }

        impl Extend<Entry> for $name {
            fn extend<T: IntoIterator<Item = Entry>>(&mut self, iter: T) {
                self.add_entries(iter);
            }
        }
    };
}

host_table!(
    /// Hosts table backed by a hash map. Iteration order of [`HostTable::all_entries`] is
    /// unspecified.
    EntrySet,
    HashMap
);

host_table!(
    /// Hosts table backed by an ordered map, [`HostTable::all_entries`] returns entries ordered
    /// by address.
    SortedEntrySet,
    BTreeMap
);
