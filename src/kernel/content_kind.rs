use std::path::Path;

/// Category of a file's content, used to pick remote processing behaviour.
///
/// Derived from the file extension only; content is never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Markup,
    Style,
    Script,
    Markdown,
    Data,
    Xml,
    #[default]
    Plain,
}

impl ContentKind {
    pub const ALL: [ContentKind; 7] = [
        ContentKind::Markup,
        ContentKind::Style,
        ContentKind::Script,
        ContentKind::Markdown,
        ContentKind::Data,
        ContentKind::Xml,
        ContentKind::Plain,
    ];

    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            return Self::Plain;
        };
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Self::Markup,
            "css" => Self::Style,
            "js" | "mjs" | "cjs" => Self::Script,
            "md" | "markdown" => Self::Markdown,
            "json" => Self::Data,
            "xml" => Self::Xml,
            _ => Self::Plain,
        }
    }

    /// Inverse of [`ContentKind::file_type`].
    pub fn from_file_type(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.file_type().eq_ignore_ascii_case(value.trim()))
    }

    /// Name the remote tool endpoint expects in `file_type`.
    pub fn file_type(self) -> &'static str {
        match self {
            Self::Markup => "html",
            Self::Style => "css",
            Self::Script => "javascript",
            Self::Markdown => "markdown",
            Self::Data => "json",
            Self::Xml => "xml",
            Self::Plain => "text",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Markup => "HTML",
            Self::Style => "CSS",
            Self::Script => "JavaScript",
            Self::Markdown => "Markdown",
            Self::Data => "JSON",
            Self::Xml => "XML",
            Self::Plain => "Plain Text",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/content_kind.rs"]
mod tests;
