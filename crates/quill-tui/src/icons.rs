//! Icon glyph cache owned by the popup.

use std::collections::HashMap;
use std::path::PathBuf;

const BUILTIN_GLYPHS: &[(&str, &str)] = &[
    ("folder.svg", "▸"),
    ("typescript.svg", "TS"),
    ("javascript.svg", "JS"),
    ("python.svg", "PY"),
    ("java.svg", "JV"),
    ("cplusplus.svg", "C+"),
    ("c.svg", "C"),
    ("csharp.svg", "C#"),
    ("go.svg", "GO"),
    ("ruby.svg", "RB"),
    ("php.svg", "PH"),
    ("swift.svg", "SW"),
    ("kotlin.svg", "KT"),
    ("rust.svg", "RS"),
    ("html5.svg", "<>"),
    ("css3.svg", "#"),
    ("sass.svg", "SC"),
    ("react.svg", "RX"),
    ("vuejs.svg", "VU"),
    ("markdown.svg", "MD"),
    ("nodejs.svg", "{}"),
    ("mysql.svg", "DB"),
];

/// Glyphs keyed by icon name. Lookups check `icon_dir/<icon>` first, then
/// the built-in table; misses are remembered as empty strings.
#[derive(Debug, Default)]
pub struct IconCache {
    dir: Option<PathBuf>,
    glyphs: HashMap<String, String>,
}

impl IconCache {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            glyphs: HashMap::new(),
        }
    }

    pub fn get(&mut self, icon: &str) -> &str {
        if !self.glyphs.contains_key(icon) {
            let glyph = self.load(icon);
            self.glyphs.insert(icon.to_string(), glyph);
        }
        self.glyphs.get(icon).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    fn load(&self, icon: &str) -> String {
        if let Some(dir) = &self.dir {
            if let Ok(content) = std::fs::read_to_string(dir.join(icon)) {
                if let Some(line) = content.lines().map(str::trim).find(|l| !l.is_empty()) {
                    return line.to_string();
                }
            }
        }
        match BUILTIN_GLYPHS.iter().find(|(name, _)| *name == icon) {
            Some((_, glyph)) => glyph.to_string(),
            None => {
                tracing::debug!(icon, "no glyph for icon");
                String::new()
            }
        }
    }
}
