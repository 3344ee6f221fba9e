#![forbid(unsafe_code)]

//! The closed set of card components.

use crate::action::Action;
use crate::image::Image;
use crate::input::TextInput;
use crate::text::Text;
use crate::view::DisplayUnit;
use crate::{DismissRequest, Render, RenderContext};

/// Variant tag, used for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Text,
    Image,
    Action,
    TextInput,
}

/// One entry in a card's component sequence.
#[derive(Debug)]
pub enum Component {
    Text(Text),
    Image(Image),
    Action(Action),
    TextInput(TextInput),
}

impl Component {
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Text(_) => ComponentKind::Text,
            Self::Image(_) => ComponentKind::Image,
            Self::Action(_) => ComponentKind::Action,
            Self::TextInput(_) => ComponentKind::TextInput,
        }
    }

    #[must_use]
    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Self::Action(action) => Some(action),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text_input(&self) -> Option<&TextInput> {
        match self {
            Self::TextInput(input) => Some(input),
            _ => None,
        }
    }

    pub fn as_text_input_mut(&mut self) -> Option<&mut TextInput> {
        match self {
            Self::TextInput(input) => Some(input),
            _ => None,
        }
    }
}

impl Render for Component {
    fn render(&self, ctx: &RenderContext, request_dismiss: DismissRequest) -> DisplayUnit {
        match self {
            Self::Text(text) => text.render(ctx, request_dismiss),
            Self::Image(image) => image.render(ctx, request_dismiss),
            Self::Action(action) => action.render(ctx, request_dismiss),
            Self::TextInput(input) => input.render(ctx, request_dismiss),
        }
    }
}

impl From<Text> for Component {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<Image> for Component {
    fn from(image: Image) -> Self {
        Self::Image(image)
    }
}

impl From<Action> for Component {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

impl From<TextInput> for Component {
    fn from(input: TextInput) -> Self {
        Self::TextInput(input)
    }
}
