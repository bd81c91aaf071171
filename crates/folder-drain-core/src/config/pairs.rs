//! Folder pairs configuration file
//!
//! The file holds one `source:destination` pair per line. Blank lines and
//! lines starting with `#` or `//` are ignored.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "folder_pairs.conf";

/// Separator between source and destination on a pair line.
const PAIR_DELIMITER: char = ':';

/// One configured source folder and the folder its contents are moved into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WatchPair {
    /// Folder that is watched and drained
    pub source: PathBuf,
    /// Folder that receives the drained entries
    pub destination: PathBuf,
}

impl WatchPair {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for WatchPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.source.display(),
            self.destination.display()
        )
    }
}

/// A loaded folder pairs file
#[derive(Debug, Clone)]
pub struct PairsFile {
    /// Where the pairs were read from
    pub path: PathBuf,
    /// Valid pairs, in file order
    pub pairs: Vec<WatchPair>,
}

impl PairsFile {
    /// Load the pairs file at `path`.
    ///
    /// A missing file is created empty and reported as [`Error::ConfigCreated`]
    /// so the operator can fill it in. A file without a single valid pair is
    /// reported as [`Error::NoPairs`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            fs::File::create(&path)?;
            info!("Configuration file created: {}", path.display());
            return Err(Error::ConfigCreated { path });
        }

        let content = fs::read_to_string(&path)?;
        let pairs = Self::parse(&content);
        if pairs.is_empty() {
            return Err(Error::NoPairs { path });
        }

        Ok(Self { path, pairs })
    }

    /// Parse pair lines, skipping comments, blanks and malformed lines.
    pub fn parse(content: &str) -> Vec<WatchPair> {
        content
            .lines()
            .enumerate()
            .filter_map(|(index, line)| parse_line(index + 1, line))
            .collect()
    }
}

fn parse_line(line_number: usize, line: &str) -> Option<WatchPair> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
        return None;
    }

    let Some((source, destination)) = trimmed.split_once(PAIR_DELIMITER) else {
        warn!("Ignoring line {}: missing '{}' delimiter", line_number, PAIR_DELIMITER);
        return None;
    };

    let (source, destination) = (source.trim(), destination.trim());
    if source.is_empty() || destination.is_empty() {
        warn!("Ignoring line {}: empty source or destination", line_number);
        return None;
    }

    Some(WatchPair::new(source, destination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "\
# incoming scans
// legacy comment

/srv/incoming:/srv/archive
   # indented comment
";
        let pairs = PairsFile::parse(content);
        assert_eq!(pairs, vec![WatchPair::new("/srv/incoming", "/srv/archive")]);
    }

    #[test]
    fn test_parse_splits_on_first_delimiter() {
        let pairs = PairsFile::parse("/a/in:/b/out:extra\n");
        assert_eq!(pairs, vec![WatchPair::new("/a/in", "/b/out:extra")]);
    }

    #[test]
    fn test_parse_trims_and_rejects_malformed() {
        let content = " /a : /b \nno-delimiter\n:/only-dest\n/only-src:\n";
        let pairs = PairsFile::parse(content);
        assert_eq!(pairs, vec![WatchPair::new("/a", "/b")]);
    }

    #[test]
    fn test_parse_keeps_file_order() {
        let pairs = PairsFile::parse("/one:/1\n/two:/2\n/three:/3\n");
        let sources: Vec<_> = pairs.iter().map(|p| p.source.clone()).collect();
        assert_eq!(
            sources,
            vec![
                PathBuf::from("/one"),
                PathBuf::from("/two"),
                PathBuf::from("/three")
            ]
        );
    }

    #[test]
    fn test_load_missing_file_creates_it() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);

        let err = PairsFile::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigCreated { .. }));
        assert!(err.is_fatal_config());
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_load_without_pairs_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "# nothing here yet\n\n").unwrap();

        let err = PairsFile::load(&path).unwrap_err();
        assert!(matches!(err, Error::NoPairs { .. }));
    }

    #[test]
    fn test_unreadable_file_is_not_a_config_error() {
        let temp = TempDir::new().unwrap();

        let err = PairsFile::load(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_fatal_config());
    }

    #[test]
    fn test_load_valid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "/in:/out\n// skip\n/in2:/out2\n").unwrap();

        let file = PairsFile::load(&path).unwrap();
        assert_eq!(file.path, path);
        assert_eq!(file.pairs.len(), 2);
        assert_eq!(file.pairs[1], WatchPair::new("/in2", "/out2"));
    }

    #[test]
    fn test_watch_pair_display() {
        let pair = WatchPair::new("/in", "/out");
        assert_eq!(pair.to_string(), "/in -> /out");
    }
}
