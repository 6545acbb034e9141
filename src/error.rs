use std::io;
use std::net::IpAddr;
use thiserror::Error;

/// Errors produced while building, parsing or rendering hosts entries.
#[derive(Error, Debug)]
pub enum HostsError {
    /// Text in address position is not an IPv4 or IPv6 literal.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// Host name is empty or contains whitespace or a `#` character.
    #[error("invalid host name: {0:?}")]
    InvalidHostName(String),

    /// An entry without any host name cannot be rendered as a line.
    #[error("no host names for address {0}")]
    EmptyHostNameList(IpAddr),

    /// Fewer than two whitespace separated tokens remain after stripping comments.
    #[error("invalid line: {0:?}")]
    InvalidLine(String),

    /// An entry was required but none was given.
    #[error("entry is absent")]
    NilEntry,

    /// Error of the underlying stream, passed through as is.
    #[error(transparent)]
    Io(#[from] io::Error),
}
