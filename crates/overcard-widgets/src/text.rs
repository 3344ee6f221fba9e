#![forbid(unsafe_code)]

//! Text component: one or more styled lines.

use overcard_core::{FontSpec, Rgba, TextAlignment};

use crate::view::{DisplayUnit, TextView};
use crate::{DismissRequest, Render, RenderContext};

/// A single styled line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub content: String,
    pub font: FontSpec,
    pub color: Rgba,
    pub alignment: TextAlignment,
}

impl TextLine {
    /// Body font, label color, centered.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font: FontSpec::default(),
            color: Rgba::LABEL,
            alignment: TextAlignment::Center,
        }
    }

    /// Bold title line.
    pub fn title(content: impl Into<String>) -> Self {
        Self::new(content).font(FontSpec::title())
    }

    /// Secondary-colored caption line.
    pub fn caption(content: impl Into<String>) -> Self {
        Self::new(content)
            .font(FontSpec::caption())
            .color(Rgba::SECONDARY_LABEL)
    }

    #[must_use]
    pub fn font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Ordered lines of text. Always holds at least one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    lines: Vec<TextLine>,
}

impl Text {
    pub fn new(first: impl Into<TextLine>) -> Self {
        Self {
            lines: vec![first.into()],
        }
    }

    /// Append a line below the existing ones.
    #[must_use]
    pub fn line(mut self, line: impl Into<TextLine>) -> Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }
}

impl From<&str> for TextLine {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for TextLine {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl From<TextLine> for Text {
    fn from(line: TextLine) -> Self {
        Self::new(line)
    }
}

impl From<&str> for Text {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for Text {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl Render for Text {
    fn render(&self, _ctx: &RenderContext, _request_dismiss: DismissRequest) -> DisplayUnit {
        DisplayUnit::Text(TextView {
            lines: self.lines.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_keep_insertion_order() {
        let text = Text::new(TextLine::title("Title"))
            .line("Body")
            .line(TextLine::caption("fine print"));
        let contents: Vec<&str> = text.lines().iter().map(|l| l.content.as_str()).collect();
        assert_eq!(contents, ["Title", "Body", "fine print"]);
    }

    #[test]
    fn defaults() {
        let line = TextLine::new("x");
        assert_eq!(line.alignment, TextAlignment::Center);
        assert_eq!(line.color, Rgba::LABEL);
        assert_eq!(line.font, FontSpec::default());
    }

    #[test]
    fn render_copies_lines() {
        let text = Text::from("hello").line("world");
        match text.render(&RenderContext::default(), DismissRequest::noop()) {
            DisplayUnit::Text(view) => assert_eq!(view.lines.len(), 2),
            other => panic!("expected text view, got {other:?}"),
        }
    }
}
