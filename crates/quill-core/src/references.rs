//! Extract the references a canonical value points at.

use crate::codec::REFERENCE_PATTERN;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference found in canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Reference {
    File(String),
    Dir(String),
    Mention(String),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::File(path) => write!(f, "#file:{path}"),
            Reference::Dir(path) => write!(f, "#dir:{path}"),
            Reference::Mention(name) => write!(f, "@{name}"),
        }
    }
}

/// All references in `value`, in order of first appearance.
pub fn references(value: &str) -> Vec<Reference> {
    let mut out: Vec<Reference> = Vec::new();
    for caps in REFERENCE_PATTERN.captures_iter(value) {
        let found = if let (Some(reference), Some(path)) = (caps.get(1), caps.get(2)) {
            let path = path.as_str().to_string();
            if reference.as_str().starts_with("#file:") {
                Reference::File(path)
            } else {
                Reference::Dir(path)
            }
        } else if let Some(name) = caps.get(4) {
            Reference::Mention(name.as_str().to_string())
        } else {
            continue;
        };
        if !out.contains(&found) {
            out.push(found);
        }
    }
    out
}

/// Only the file paths referenced by `value`.
pub fn referenced_files(value: &str) -> Vec<String> {
    references(value)
        .into_iter()
        .filter_map(|r| match r {
            Reference::File(path) => Some(path),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_in_order_without_duplicates() {
        let refs = references("@bob look at #file:a.rs and #dir:src then #file:a.rs @bob");
        assert_eq!(
            refs,
            vec![
                Reference::Mention("bob".to_string()),
                Reference::File("a.rs".to_string()),
                Reference::Dir("src".to_string()),
            ]
        );
    }

    #[test]
    fn test_referenced_files() {
        assert_eq!(referenced_files("#file:x/y.py #dir:x @z"), vec!["x/y.py"]);
        assert!(referenced_files("nothing here").is_empty());
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(Reference::Dir("a/b".to_string()).to_string(), "#dir:a/b");
    }
}
