//! File extension to icon name mapping.

use std::path::Path;

pub const FOLDER_ICON: &str = "folder.svg";

const EXTENSION_ICONS: &[(&str, &str)] = &[
    ("ts", "typescript.svg"),
    ("js", "javascript.svg"),
    ("py", "python.svg"),
    ("java", "java.svg"),
    ("cpp", "cplusplus.svg"),
    ("c", "c.svg"),
    ("cs", "csharp.svg"),
    ("go", "go.svg"),
    ("rb", "ruby.svg"),
    ("php", "php.svg"),
    ("swift", "swift.svg"),
    ("kt", "kotlin.svg"),
    ("rs", "rust.svg"),
    ("html", "html5.svg"),
    ("css", "css3.svg"),
    ("scss", "sass.svg"),
    ("jsx", "react.svg"),
    ("tsx", "react.svg"),
    ("vue", "vuejs.svg"),
    ("md", "markdown.svg"),
    ("json", "nodejs.svg"),
    ("sql", "mysql.svg"),
];

/// Icon for a file path, by extension.
pub fn icon_for_path(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?;
    EXTENSION_ICONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, icon)| *icon)
}
