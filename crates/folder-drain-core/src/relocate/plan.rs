//! Dry run mode for previewing a relocation pass without making changes

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::Relocator;
use crate::config::WatchPair;

/// Action a relocation pass would take for one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannedAction {
    /// File moves to a free destination path
    Move,
    /// File replaces an existing destination entry
    Overwrite,
    /// Folder is recreated on the destination side
    CreateFolder,
    /// Folder merges into an existing destination folder
    MergeFolder,
    /// Sync agent entry, left alone together with its contents
    SkipSentinel,
    /// Folder is nested too deep and stays in place
    SkipTooDeep,
}

impl std::fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move => write!(f, "Move"),
            Self::Overwrite => write!(f, "Overwrite"),
            Self::CreateFolder => write!(f, "Create folder"),
            Self::MergeFolder => write!(f, "Merge folder"),
            Self::SkipSentinel => write!(f, "Skip (sync agent)"),
            Self::SkipTooDeep => write!(f, "Skip (too deep)"),
        }
    }
}

/// A single entry in the preview
#[derive(Debug, Clone, Serialize)]
pub struct PlannedEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub action: PlannedAction,
}

/// What one relocation pass over a pair would do
#[derive(Debug, Clone, Serialize)]
pub struct DrainPlan {
    pub pair: WatchPair,
    /// Entries in walk order, parents before children
    pub entries: Vec<PlannedEntry>,
    pub total_move: usize,
    pub total_overwrite: usize,
    pub total_skipped: usize,
}

impl DrainPlan {
    /// Create a new empty plan for a pair
    pub fn new(pair: WatchPair) -> Self {
        Self {
            pair,
            entries: Vec::new(),
            total_move: 0,
            total_overwrite: 0,
            total_skipped: 0,
        }
    }

    /// Add an entry and update the totals
    pub fn add_entry(&mut self, entry: PlannedEntry) {
        match entry.action {
            PlannedAction::Move => self.total_move += 1,
            PlannedAction::Overwrite => self.total_overwrite += 1,
            PlannedAction::SkipSentinel | PlannedAction::SkipTooDeep => self.total_skipped += 1,
            PlannedAction::CreateFolder | PlannedAction::MergeFolder => {}
        }
        self.entries.push(entry);
    }

    /// Number of files the pass would move, overwrites included
    pub fn total_files(&self) -> usize {
        self.total_move + self.total_overwrite
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Relocator {
    /// Preview a pass from `source` into `destination`.
    ///
    /// Mirrors [`Relocator::relocate`]: links are not followed and sentinel
    /// folders are not descended into. A missing source gives an empty plan.
    pub fn plan(&self, source: &Path, destination: &Path) -> DrainPlan {
        let mut plan = DrainPlan::new(WatchPair::new(source, destination));
        if !source.is_dir() {
            return plan;
        }

        let mut walker = WalkDir::new(source)
            .min_depth(1)
            .max_depth(self.max_depth() + 1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = walker.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry while planning: {}", e);
                    continue;
                }
            };

            let Ok(relative) = entry.path().strip_prefix(source) else {
                continue;
            };
            let target = destination.join(relative);
            let is_dir = entry.file_type().is_dir();

            let action = if self.is_sentinel(entry.file_name()) {
                PlannedAction::SkipSentinel
            } else if is_dir && entry.depth() > self.max_depth() {
                PlannedAction::SkipTooDeep
            } else if is_dir {
                if target.is_dir() {
                    PlannedAction::MergeFolder
                } else {
                    PlannedAction::CreateFolder
                }
            } else if target.symlink_metadata().is_ok() {
                PlannedAction::Overwrite
            } else {
                PlannedAction::Move
            };

            if is_dir
                && matches!(
                    action,
                    PlannedAction::SkipSentinel | PlannedAction::SkipTooDeep
                )
            {
                walker.skip_current_dir();
            }

            plan.add_entry(PlannedEntry {
                source: entry.path().to_path_buf(),
                destination: target,
                action,
            });
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn actions(plan: &DrainPlan, root: &Path) -> Vec<(String, PlannedAction)> {
        plan.entries
            .iter()
            .map(|e| {
                let relative = e.source.strip_prefix(root).unwrap();
                (relative.to_string_lossy().replace('\\', "/"), e.action)
            })
            .collect()
    }

    #[test]
    fn test_plan_reports_actions_without_touching_files() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("in");
        let destination = temp.path().join("out");
        fs::create_dir_all(source.join("a/b")).unwrap();
        fs::create_dir_all(source.join("c.syncthing")).unwrap();
        fs::write(source.join("a/x.txt"), "x").unwrap();
        fs::write(source.join("a/b/y.txt"), "y").unwrap();
        fs::write(source.join("c.syncthing/z.txt"), "z").unwrap();
        fs::create_dir_all(destination.join("a")).unwrap();
        fs::write(destination.join("a/x.txt"), "old").unwrap();

        let plan = Relocator::new().plan(&source, &destination);

        assert_eq!(
            actions(&plan, &source),
            vec![
                ("a".to_string(), PlannedAction::MergeFolder),
                ("a/b".to_string(), PlannedAction::CreateFolder),
                ("a/b/y.txt".to_string(), PlannedAction::Move),
                ("a/x.txt".to_string(), PlannedAction::Overwrite),
                ("c.syncthing".to_string(), PlannedAction::SkipSentinel),
            ]
        );
        assert_eq!(plan.total_move, 1);
        assert_eq!(plan.total_overwrite, 1);
        assert_eq!(plan.total_skipped, 1);
        assert_eq!(plan.total_files(), 2);

        // Nothing moved
        assert!(source.join("a/x.txt").exists());
        assert_eq!(fs::read_to_string(destination.join("a/x.txt")).unwrap(), "old");
    }

    #[test]
    fn test_plan_for_missing_source_is_empty() {
        let temp = TempDir::new().unwrap();
        let plan = Relocator::new().plan(&temp.path().join("nope"), temp.path());
        assert!(plan.is_empty());
        assert_eq!(plan.total_files(), 0);
    }

    #[test]
    fn test_plan_marks_too_deep_folders() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("in");
        fs::create_dir_all(source.join("one/two")).unwrap();
        fs::write(source.join("one/two/deep.txt"), "deep").unwrap();

        let plan = Relocator::new()
            .with_max_depth(1)
            .plan(&source, &temp.path().join("out"));

        assert_eq!(
            actions(&plan, &source),
            vec![
                ("one".to_string(), PlannedAction::CreateFolder),
                ("one/two".to_string(), PlannedAction::SkipTooDeep),
            ]
        );
    }

    #[test]
    fn test_plan_serializes_snake_case_actions() {
        let value = serde_json::to_value(PlannedAction::SkipSentinel).unwrap();
        assert_eq!(value, serde_json::json!("skip_sentinel"));
    }
}
