#![deny(missing_docs)]
//! Library for the hosts file common on Linux/UNIX systems. Reads the file into a deduplicated
//! table mapping each IP address to its host names, and writes such a table back in a canonical
//! form: one line per address, host names lower-cased and sorted, lines sorted.
//!
//! Comments and original formatting are not preserved. Every line of the input has to be empty,
//! a comment, or an IP address followed by at least one host name, otherwise reading fails as a
//! whole. Uses the nom parser combinator library for tokenizing lines.
//!
//! ```
//! use hostsfmt::{parse_hosts, render_hosts};
//!
//! let set = parse_hosts("127.0.0.1 localhost # loopback\n::1 Localhost ip6-localhost\n").unwrap();
//! assert_eq!(
//!     render_hosts(&set).unwrap(),
//!     format!("127.0.0.1  localhost{0}::1  ip6-localhost  localhost{0}", hostsfmt::LINE_ENDING)
//! );
//! ```

mod document;
mod entry;
mod entry_set;
mod error;
mod hostsfile;
pub mod parse;

pub use document::{
    parse_hosts, read_entry_set, read_table, render_hosts, write_entry_set, write_entry_set_with,
    LINE_ENDING,
};
pub use entry::{canonical_ip, clone_entry, Entry, HostEntry, COMMENT_SIGN};
pub use entry_set::{EntrySet, HostTable, SortedEntrySet};
pub use error::HostsError;
pub use hostsfile::{read_path, write_path, write_path_with};
pub use parse::{parse_entry, parse_line, render_line, render_line_aligned, HostsLine};
