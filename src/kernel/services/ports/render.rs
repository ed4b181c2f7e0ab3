//! Rendering sink contract. The sink only ever receives HTML markup.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderedKind {
    Html,
    Text,
}

const PRE_OPEN: &str =
    "<html><body><pre style='font-family: monospace; white-space: pre-wrap;'>";
const PRE_CLOSE: &str = "</pre></body></html>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    kind: RenderedKind,
    markup: String,
}

impl PreviewDocument {
    /// HTML bodies pass through untouched; anything else is escaped and
    /// wrapped as preformatted text.
    pub fn from_body(kind: RenderedKind, body: &str) -> Self {
        let markup = match kind {
            RenderedKind::Html => body.to_string(),
            RenderedKind::Text => {
                let mut out = String::with_capacity(PRE_OPEN.len() + body.len() + PRE_CLOSE.len());
                out.push_str(PRE_OPEN);
                out.push_str(&escape_angle_brackets(body));
                out.push_str(PRE_CLOSE);
                out
            }
        };
        Self { kind, markup }
    }

    pub fn kind(&self) -> RenderedKind {
        self.kind
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

pub fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

pub trait RenderSink {
    fn load_content(&mut self, markup: &str);
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/render.rs"]
mod tests;
