//! Unpacking of the export archive into in-memory files.

use crate::error::Result;
use std::io::{Cursor, Read};
use tracing::debug;

/// One file from the export archive.
///
/// `path` is the archive-relative name, `<namespace>/<language>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    pub path: String,
    pub content: Vec<u8>,
}

impl VirtualFile {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Read every file entry of a zip archive held in memory.
///
/// Directory entries are skipped. Entries keep archive order.
pub fn unpack(bytes: &[u8]) -> Result<Vec<VirtualFile>> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut files = Vec::with_capacity(zip.len());

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        if !entry.is_file() {
            continue;
        }

        let path = entry.name().to_string();
        // Declared sizes are untrusted
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;

        debug!("Unpacked {} ({} bytes)", path, content.len());
        files.push(VirtualFile { path, content });
    }

    Ok(files)
}
