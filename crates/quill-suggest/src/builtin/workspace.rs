//! Workspace source: files and directories for `#` references.

use crate::error::SuggestError;
use crate::icons::{icon_for_path, FOLDER_ICON};
use crate::score::similarity;
use crate::traits::SuggestionSource;
use async_trait::async_trait;
use ignore::WalkBuilder;
use quill_core::{Suggestion, Trigger};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tokio::sync::RwLock;

/// Combined files and directories shown for an empty query.
const RECENT_LIMIT: usize = 15;
const MAX_FILES: usize = 20_000;

/// A tracked file and its modification time in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub modified: u64,
}

/// A directory holding tracked files, directly or below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: String,
    pub name: String,
    pub file_count: usize,
    pub latest: u64,
}

enum Scope {
    Files,
    Dirs,
    All,
}

/// Split a `file:`/`f:`/`dir:`/`d:` prefix off the query.
fn split_scope(query: &str) -> (Scope, &str) {
    for (prefix, scope) in [
        ("file:", Scope::Files),
        ("f:", Scope::Files),
        ("dir:", Scope::Dirs),
        ("d:", Scope::Dirs),
    ] {
        if let Some(rest) = query.strip_prefix(prefix) {
            return (scope, rest);
        }
    }
    (Scope::All, query)
}

fn special_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new("codebase", "codebase")
            .with_kind("codebase")
            .with_description("Searches for relevant files in the codebase"),
        Suggestion::new("codebase-all", "codebase-all")
            .with_kind("codebase")
            .with_description("Uses the ENTIRE codebase as context"),
        Suggestion::new("filetree", "filetree")
            .with_kind("filetree")
            .with_description("Displays a file tree"),
    ]
}

fn split_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", path),
    }
}

/// Snapshot of the workspace, most recently modified files first.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceIndex {
    files: Vec<FileEntry>,
    limit: usize,
}

impl WorkspaceIndex {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, u64)>) -> Self {
        let mut files: Vec<FileEntry> = entries
            .into_iter()
            .map(|(path, modified)| FileEntry { path, modified })
            .collect();
        files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));
        Self { files, limit: 10 }
    }

    /// Walk `root`, honouring ignore files.
    pub fn scan(root: &Path) -> Result<Self, SuggestError> {
        if !root.is_dir() {
            return Err(SuggestError::Scan(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let walker = WalkBuilder::new(root)
            .git_ignore(true)
            .require_git(false)
            .hidden(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut entries = Vec::new();
        for entry in walker.flatten() {
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let modified = entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            let path = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            entries.push((path, modified));
            if entries.len() >= MAX_FILES {
                tracing::warn!(root = %root.display(), "workspace scan truncated");
                break;
            }
        }
        tracing::debug!(root = %root.display(), files = entries.len(), "workspace scanned");
        Ok(Self::from_entries(entries))
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Every ancestor directory of a tracked file, latest activity first.
    pub fn directories(&self) -> Vec<DirEntry> {
        let mut dirs: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
        for file in &self.files {
            let mut dir = split_path(&file.path).0;
            while !dir.is_empty() {
                let slot = dirs.entry(dir).or_insert((0, 0));
                slot.0 += 1;
                slot.1 = slot.1.max(file.modified);
                dir = split_path(dir).0;
            }
        }
        let mut out: Vec<DirEntry> = dirs
            .into_iter()
            .map(|(path, (file_count, latest))| DirEntry {
                path: path.to_string(),
                name: split_path(path).1.to_string(),
                file_count,
                latest,
            })
            .collect();
        out.sort_by(|a, b| b.latest.cmp(&a.latest).then_with(|| a.path.cmp(&b.path)));
        out
    }

    fn file_suggestions(&self) -> Vec<Suggestion> {
        self.files
            .iter()
            .map(|file| {
                let (dir, name) = split_path(&file.path);
                let suggestion = Suggestion::new(name, format!("file:{}", file.path))
                    .with_kind("file")
                    .with_description(dir);
                match icon_for_path(&file.path) {
                    Some(icon) => suggestion.with_icon(icon),
                    None => suggestion,
                }
            })
            .collect()
    }

    fn dir_suggestions(&self, needle: &str) -> Vec<Suggestion> {
        let needle = needle.to_lowercase();
        self.directories()
            .into_iter()
            .filter(|d| {
                needle.is_empty()
                    || d.path.to_lowercase().contains(&needle)
                    || d.name.to_lowercase().contains(&needle)
            })
            .map(|d| {
                Suggestion::new(d.name, format!("dir:{}", d.path))
                    .with_kind("directory")
                    .with_description(format!("{} files in {}", d.file_count, d.path))
                    .with_icon(FOLDER_ICON)
            })
            .collect()
    }

    /// Suggestions for a `#` query.
    pub fn suggest(&self, query: &str) -> Vec<Suggestion> {
        if query.is_empty() {
            return self.recent();
        }
        let (scope, needle) = split_scope(query);
        let candidates = match scope {
            Scope::Files => self.file_suggestions(),
            Scope::Dirs => self.dir_suggestions(needle),
            Scope::All => {
                let mut all = self.dir_suggestions(needle);
                all.extend(self.file_suggestions());
                all.extend(special_suggestions());
                all
            }
        };
        if needle.is_empty() {
            return candidates.into_iter().take(self.limit).collect();
        }

        let mut scored: Vec<(Suggestion, f64)> = candidates
            .into_iter()
            .map(|s| {
                let description = s.description.as_deref().unwrap_or("");
                let mut score = 0.7 * similarity(&s.name, needle) + 0.3 * similarity(description, needle);
                if s.kind.as_deref() == Some("directory") {
                    score *= 0.9;
                }
                (s, score)
            })
            .collect();
        scored.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.value.len().cmp(&b.0.value.len()))
        });
        scored.into_iter().take(self.limit).map(|(s, _)| s).collect()
    }

    /// Two files per directory, newest first, then the special references.
    fn recent(&self) -> Vec<Suggestion> {
        let mut files = self.file_suggestions().into_iter();
        let mut dirs = self.dir_suggestions("").into_iter();
        let mut out = Vec::new();
        loop {
            let mut progressed = false;
            for _ in 0..2 {
                if let Some(file) = files.next() {
                    out.push(file);
                    progressed = true;
                }
            }
            if let Some(dir) = dirs.next() {
                out.push(dir);
                progressed = true;
            }
            if !progressed || out.len() >= RECENT_LIMIT {
                break;
            }
        }
        out.truncate(RECENT_LIMIT);
        out.extend(special_suggestions());
        out
    }
}

/// `#` source backed by a lazily scanned workspace index.
pub struct WorkspaceSource {
    root: PathBuf,
    limit: usize,
    index: RwLock<Option<Arc<WorkspaceIndex>>>,
}

impl WorkspaceSource {
    pub fn new(root: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            root: root.into(),
            limit,
            index: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rescan the workspace.
    pub async fn refresh(&self) -> Result<Arc<WorkspaceIndex>, SuggestError> {
        let root = self.root.clone();
        let limit = self.limit;
        let index = tokio::task::spawn_blocking(move || WorkspaceIndex::scan(&root))
            .await
            .map_err(|e| SuggestError::Task(e.to_string()))??
            .with_limit(limit);
        let index = Arc::new(index);
        *self.index.write().await = Some(index.clone());
        Ok(index)
    }

    async fn current(&self) -> Result<Arc<WorkspaceIndex>, SuggestError> {
        if let Some(index) = self.index.read().await.as_ref() {
            return Ok(index.clone());
        }
        self.refresh().await
    }
}

#[async_trait]
impl SuggestionSource for WorkspaceSource {
    fn name(&self) -> &str {
        "workspace"
    }

    fn trigger(&self) -> Trigger {
        Trigger::Hashtag
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, SuggestError> {
        let index = self.current().await?;
        Ok(index.suggest(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> WorkspaceIndex {
        WorkspaceIndex::from_entries([
            ("a/one.rs".to_string(), 50),
            ("a/two.py".to_string(), 40),
            ("b/three.md".to_string(), 30),
            ("four.txt".to_string(), 20),
        ])
    }

    fn values(list: &[Suggestion]) -> Vec<&str> {
        list.iter().map(|s| s.value.as_str()).collect()
    }

    #[test]
    fn test_empty_query_interleaves_files_and_dirs() {
        let list = sample().suggest("");
        assert_eq!(
            values(&list),
            vec![
                "file:a/one.rs",
                "file:a/two.py",
                "dir:a",
                "file:b/three.md",
                "file:four.txt",
                "dir:b",
                "codebase",
                "codebase-all",
                "filetree",
            ]
        );
        assert_eq!(list[0].name, "one.rs");
        assert_eq!(list[0].description.as_deref(), Some("a"));
        assert_eq!(list[0].icon.as_deref(), Some("rust.svg"));
        assert_eq!(list[2].description.as_deref(), Some("2 files in a"));
        assert_eq!(list[2].icon.as_deref(), Some(FOLDER_ICON));
    }

    #[test]
    fn test_empty_query_caps_recent_list() {
        let index = WorkspaceIndex::from_entries(
            (0..40).map(|i| (format!("d{}/f{i}.rs", i % 7), i as u64)),
        );
        let list = index.suggest("");
        assert_eq!(list.len(), RECENT_LIMIT + 3);
        assert_eq!(list.last().unwrap().value, "filetree");
    }

    #[test]
    fn test_directories_include_ancestors() {
        let index = WorkspaceIndex::from_entries([
            ("src/core/a.rs".to_string(), 5),
            ("src/b.rs".to_string(), 9),
        ]);
        let dirs = index.directories();
        assert_eq!(dirs[0].path, "src");
        assert_eq!(dirs[0].file_count, 2);
        assert_eq!(dirs[0].latest, 9);
        assert_eq!(dirs[1].path, "src/core");
        assert_eq!(dirs[1].name, "core");
    }

    #[test]
    fn test_query_ranks_by_name() {
        let list = sample().suggest("one");
        assert_eq!(list[0].value, "file:a/one.rs");
        assert!(list.len() <= 10);
    }

    #[test]
    fn test_scope_prefixes() {
        let files = sample().suggest("f:");
        assert!(files.iter().all(|s| s.kind.as_deref() == Some("file")));
        assert_eq!(files.len(), 4);

        let dirs = sample().suggest("dir:b");
        assert_eq!(values(&dirs), vec!["dir:b"]);
    }

    #[test]
    fn test_limit_applies_to_scored_results() {
        let index = WorkspaceIndex::from_entries(
            (0..30).map(|i| (format!("src/mod{i}.rs"), i as u64)),
        )
        .with_limit(5);
        assert_eq!(index.suggest("mod").len(), 5);
    }

    #[tokio::test]
    async fn test_workspace_source_honours_gitignore() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("target/debug/out.rs"), "").unwrap();
        fs::write(dir.path().join(".gitignore"), "target/\n").unwrap();

        let source = WorkspaceSource::new(dir.path(), 10);
        let list = source.suggest("f:").await.unwrap();
        let found = values(&list);
        assert!(found.contains(&"file:src/main.rs"));
        assert!(!found.iter().any(|v| v.contains("target")));
    }

    #[tokio::test]
    async fn test_workspace_source_missing_root() {
        let source = WorkspaceSource::new("/definitely/not/here", 10);
        assert!(matches!(
            source.suggest("").await,
            Err(SuggestError::Scan(_))
        ));
    }
}
