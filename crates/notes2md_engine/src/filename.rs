use std::path::Path;

pub const HTML_SUFFIX: &str = ".html";

/// `true` for names ending in exactly `.html`; `.htm` and `.HTML` are not picked up.
/// The rest of the name does not have to be valid UTF-8.
pub fn is_html_name(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(HTML_SUFFIX.as_bytes()))
}

/// `note.html` -> `note.md`. Only the trailing suffix is replaced.
pub fn markdown_filename(html_name: &str) -> Option<String> {
    html_name
        .strip_suffix(HTML_SUFFIX)
        .map(|stem| format!("{stem}.md"))
}
