use glint_engine::paint::Color;
use glint_engine::text::FontId;

use crate::component::{Component, ComponentBase};
use crate::graphics::Graphics;

/// Horizontal inset of the text inside the field.
const TEXT_INSET: i32 = 6;

/// A single-line text display over a horizontal gradient background.
///
/// Shows `placeholder` (in a dimmer color) while `text` is empty. Editing is
/// left to the application; the field only renders.
pub struct TextField {
    base: ComponentBase,
    text: String,
    placeholder: String,
    font: Option<FontId>,

    left: Color,
    right: Color,
    text_color: Color,
    placeholder_color: Color,
}

impl TextField {
    pub fn new() -> Self {
        Self {
            base: ComponentBase::new(),
            text: String::new(),
            placeholder: String::new(),
            font: None,
            left: Color::new(1.0, 0.0, 0.0, 1.0),
            right: Color::new(0.0, 0.0, 1.0, 0.1),
            text_color: Color::WHITE,
            placeholder_color: Color::new(1.0, 1.0, 1.0, 0.5),
        }
    }

    pub fn with_bounds(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        self.base.set_bounds(x, y, width, height);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn font(mut self, font: FontId) -> Self {
        self.font = Some(font);
        self
    }

    /// Background gradient, left edge to right edge.
    pub fn gradient(mut self, left: Color, right: Color) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    pub fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn placeholder_text(&self) -> &str {
        &self.placeholder
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for TextField {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&self, g: &mut dyn Graphics) {
        let b = &self.base;
        g.draw_horizontal_gradient_rect(b.x(), b.y(), b.width(), b.height(), self.left, self.right);

        let (label, color) = if self.text.is_empty() {
            (self.placeholder.as_str(), self.placeholder_color)
        } else {
            (self.text.as_str(), self.text_color)
        };
        if label.is_empty() {
            return;
        }

        let previous = g.font();
        if self.font.is_some() {
            g.set_font(self.font);
        }

        let (_, th) = g.text_size(label);
        g.draw_text(label, b.x() + TEXT_INSET, b.y() + (b.height() - th as i32) / 2, color);

        g.set_font(previous);
    }
}
