use crate::entry::{Entry, HostEntry};
use crate::entry_set::{EntrySet, HostTable};
use crate::error::HostsError;
use crate::parse::{parse_line, render_line, HostsLine};
use std::io::{BufRead, Cursor, Write};
use tracing::{debug, trace, warn};

/// Line terminator written after every rendered line.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Line terminator written after every rendered line.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Reads a whole hosts file into a new table of type `T`.
///
/// Empty and comment lines are skipped. The first malformed line aborts reading and its error is
/// returned, entries read up to that point are discarded.
pub fn read_table<T, R>(reader: R) -> Result<T, HostsError>
where
    T: HostTable + Default,
    R: BufRead,
{
    let mut table = T::default();
    let mut count_entries = 0usize;
    let mut count_skipped = 0usize;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Ok(HostsLine::Entry(entry, _)) => {
                trace!(line = idx + 1, ip = %entry.ip(), "entry");
                table.add_entry(&entry);
                count_entries += 1;
            }
            Ok(_) => count_skipped += 1,
            Err(err) => {
                warn!(line = idx + 1, %err, "rejecting hosts file");
                return Err(err);
            }
        }
    }
    debug!(entries = count_entries, skipped = count_skipped, "read hosts file");
    Ok(table)
}

/// Reads a whole hosts file into an [`EntrySet`], see [`read_table`].
pub fn read_entry_set<R: BufRead>(reader: R) -> Result<EntrySet, HostsError> {
    read_table(reader)
}

/// Parses hosts file contents held in memory.
pub fn parse_hosts(content: &str) -> Result<EntrySet, HostsError> {
    read_entry_set(Cursor::new(content))
}

/// Writes all entries of `table` as canonical lines, sorted lexicographically, each followed by
/// [`LINE_ENDING`].
pub fn write_entry_set<T, W>(table: &T, writer: W) -> Result<(), HostsError>
where
    T: HostTable + ?Sized,
    W: Write,
{
    write_entry_set_with(table, writer, |entry: &Entry| render_line(entry))
}

/// Like [`write_entry_set`], rendering each entry with `formatter`. Nothing is written if any
/// entry fails to render.
pub fn write_entry_set_with<T, W, F>(
    table: &T,
    mut writer: W,
    formatter: F,
) -> Result<(), HostsError>
where
    T: HostTable + ?Sized,
    W: Write,
    F: Fn(&Entry) -> Result<String, HostsError>,
{
    let mut lines = table
        .all_entries()
        .iter()
        .map(|entry| formatter(entry))
        .collect::<Result<Vec<String>, HostsError>>()?;
    lines.sort();
    for line in &lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(LINE_ENDING.as_bytes())?;
    }
    writer.flush()?;
    debug!(lines = lines.len(), "wrote hosts file");
    Ok(())
}

/// Renders `table` into a string, see [`write_entry_set`].
pub fn render_hosts<T>(table: &T) -> Result<String, HostsError>
where
    T: HostTable + ?Sized,
{
    let mut buf = Vec::new();
    write_entry_set(table, &mut buf)?;
    // only valid UTF-8 is ever written into the buffer
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
