//! Prompt template rendering.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// Canonical spelling of the content placeholder.
pub const CONTENT_TOKEN: &str = "{{ file_content }}";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*file_content\s*\}\}").expect("token regex is valid"));

/// Replace every occurrence of the content token with `content`.
///
/// The token tolerates interior whitespace (`{{file_content}}`,
/// `{{  file_content  }}`). The content is inserted verbatim: it is not
/// expanded as a replacement pattern and not re-scanned for tokens. A
/// template without the token is returned unchanged.
pub fn render(template: &str, content: &str) -> String {
    TOKEN_RE
        .replace_all(template, NoExpand(content))
        .into_owned()
}
