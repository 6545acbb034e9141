use crate::document::{read_entry_set, write_entry_set_with};
use crate::entry::Entry;
use crate::entry_set::{EntrySet, HostTable};
use crate::error::HostsError;
use crate::parse::render_line;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::debug;

/// Reads the hosts file at `path`. Failing to open the file is reported as
/// [`HostsError::Io`].
pub fn read_path<P: AsRef<Path>>(path: P) -> Result<EntrySet, HostsError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading hosts file");
    let file = File::open(path)?;
    read_entry_set(BufReader::new(file))
}

/// Writes `table` in canonical form to `path`, creating or truncating the file.
///
/// All entries are rendered before the file is touched. The file itself is written in place, an
/// I/O failure halfway leaves it incomplete.
pub fn write_path<T, P>(table: &T, path: P) -> Result<(), HostsError>
where
    T: HostTable + ?Sized,
    P: AsRef<Path>,
{
    write_path_with(table, path, |entry: &Entry| render_line(entry))
}

/// Like [`write_path`], rendering each entry with `formatter`.
pub fn write_path_with<T, P, F>(table: &T, path: P, formatter: F) -> Result<(), HostsError>
where
    T: HostTable + ?Sized,
    P: AsRef<Path>,
    F: Fn(&Entry) -> Result<String, HostsError>,
{
    let path = path.as_ref();
    let mut buf = Vec::with_capacity(1024 * 8);
    write_entry_set_with(table, &mut buf, formatter)?;

    debug!(path = %path.display(), len = buf.len(), "writing hosts file");
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(&buf)?;
    file.flush()?;
    Ok(())
}
