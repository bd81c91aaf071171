//! Tree relocation: moves a source tree into a destination tree.
//!
//! A relocation pass walks the source directory, renames every file into the
//! matching destination path (overwriting what is there), recreates folders
//! on the destination side and removes source folders once they are empty.
//! Entries whose name contains the sentinel pattern are in-flight transfers
//! of an external sync agent and are never moved or deleted.
//!
//! Every failure is logged and skipped so the pass always runs to the end;
//! whatever is left behind is picked up by the next pass.

mod plan;

pub use plan::{DrainPlan, PlannedAction, PlannedEntry};

use std::ffi::OsStr;
use std::fs::{self, DirEntry};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::WatchPair;

/// Name fragment marking in-flight transfer files of Syncthing.
pub const DEFAULT_SENTINEL: &str = ".syncthing";

/// Permissions for folders created on the destination side (Unix only).
pub const DEFAULT_DIR_MODE: u32 = 0o760;

/// Deepest folder level a pass descends into.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Something that can drain a watch pair.
///
/// Implemented by [`Relocator`]; the quiescence detector only needs this
/// seam, which keeps it testable without touching the filesystem.
pub trait Drain: Send + Sync + 'static {
    fn drain(&self, pair: &WatchPair);
}

/// Moves the contents of a source tree into a destination tree.
#[derive(Debug, Clone)]
pub struct Relocator {
    sentinel: String,
    dir_mode: u32,
    max_depth: usize,
}

impl Default for Relocator {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            dir_mode: DEFAULT_DIR_MODE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Relocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different sentinel name fragment.
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Use different permissions for created folders.
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    /// Limit how deep a pass descends.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn dir_mode(&self) -> u32 {
        self.dir_mode
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns true if an entry with this name must never be touched.
    pub fn is_sentinel(&self, name: &OsStr) -> bool {
        !self.sentinel.is_empty() && name.to_string_lossy().contains(&self.sentinel)
    }

    /// Run one relocation pass from `source` into `destination`.
    ///
    /// Never fails: a missing or unreadable source is an empty pass, and
    /// every per-entry failure is logged and leaves that entry in place.
    pub fn relocate(&self, source: &Path, destination: &Path) {
        let Some(entries) = list_entries(source) else {
            return;
        };
        if entries.is_empty() {
            return;
        }

        if let Err(e) = self.create_dir(destination) {
            warn!(
                "Error creating destination folder {}: {}",
                destination.display(),
                e
            );
            return;
        }

        self.relocate_entries(entries, destination, 0);
    }

    fn relocate_entries(&self, entries: Vec<DirEntry>, destination: &Path, depth: usize) {
        for entry in entries {
            let name = entry.file_name();
            let source_path = entry.path();
            let destination_path = destination.join(&name);

            if self.is_sentinel(&name) {
                debug!("Sync agent entry found, skipping: {}", source_path.display());
                continue;
            }

            // file_type() does not follow symlinks, so linked folders move as links
            let is_dir = match entry.file_type() {
                Ok(file_type) => file_type.is_dir(),
                Err(e) => {
                    warn!("Error reading type of {}: {}", source_path.display(), e);
                    continue;
                }
            };

            if is_dir {
                self.relocate_dir(&source_path, &destination_path, depth + 1);
            } else {
                move_file(&source_path, &destination_path);
            }
        }
    }

    fn relocate_dir(&self, source: &Path, destination: &Path, depth: usize) {
        debug!("Found folder: {}", source.display());

        if depth > self.max_depth {
            warn!(
                "Folder nested deeper than {} levels, leaving it in place: {}",
                self.max_depth,
                source.display()
            );
            return;
        }

        if let Err(e) = self.create_dir(destination) {
            warn!("Error creating folder {}: {}", destination.display(), e);
            return;
        }
        debug!("Created folder: {}", destination.display());

        if let Some(entries) = list_entries(source) {
            self.relocate_entries(entries, destination, depth);
        }

        match is_dir_empty(source) {
            Ok(true) => match fs::remove_dir(source) {
                Ok(()) => debug!("Deleted folder: {}", source.display()),
                Err(e) => warn!("Could not remove folder {}: {}", source.display(), e),
            },
            Ok(false) => debug!("Folder still has entries, keeping: {}", source.display()),
            Err(e) => warn!("Could not inspect folder {}: {}", source.display(), e),
        }
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.dir_mode);
        }

        builder.create(path)
    }
}

impl Drain for Relocator {
    fn drain(&self, pair: &WatchPair) {
        self.relocate(&pair.source, &pair.destination);
    }
}

/// Rename a single file, replacing whatever sits at the destination.
fn move_file(source: &Path, destination: &Path) {
    match fs::rename(source, destination) {
        Ok(()) => debug!("Moved file: {}", destination.display()),
        Err(e) => warn!(
            "Error moving file {} to {}: {}",
            source.display(),
            destination.display(),
            e
        ),
    }
}

/// Read the immediate entries of a folder. `None` means nothing to do.
fn list_entries(path: &Path) -> Option<Vec<DirEntry>> {
    let read_dir = match fs::read_dir(path) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Folder does not exist: {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Error listing folder {}: {}", path.display(), e);
            return None;
        }
    };

    let entries = read_dir
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Error reading entry in {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    Some(entries)
}

fn is_dir_empty(path: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}
