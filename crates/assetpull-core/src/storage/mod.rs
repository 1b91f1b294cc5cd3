//! Disk I/O and file lifecycle for downloaded assets.
//!
//! Bytes stream into a `.part` temp file which is renamed to the final name
//! only once the transfer succeeded, so the nominal filename never holds a
//! partial download.

mod writer;

pub use writer::StorageWriter;
pub(crate) use writer::remove_if_exists;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `hero.jpg` → `hero.jpg.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
