//! Type-safe config field path.

use crate::logger::paint;
use owo_colors::{Stream, Style};
use std::fmt;

/// A config field path such as `deploy.folder`.
///
/// Sections expose their paths as constants so diagnostics never carry
/// a hand-typed string:
///
/// ```ignore
/// diag.error(DeployConfig::FIELDS.folder, "folder not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = format!("`{}`", self.0);
        write!(f, "{}", paint(path, Stream::Stdout, Style::new().bright_blue()))
    }
}
