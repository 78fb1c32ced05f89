//! Offline value tools: parse, normalize, refs.

use quill_core::{referenced_files, references};

pub fn parse(text: &str) -> anyhow::Result<()> {
    let doc = quill_core::parse(text);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

pub fn normalize(text: &str) {
    println!("{}", quill_core::normalize(text));
}

pub fn refs(text: &str, files_only: bool) {
    if files_only {
        for path in referenced_files(text) {
            println!("{path}");
        }
    } else {
        for reference in references(text) {
            println!("{reference}");
        }
    }
}
