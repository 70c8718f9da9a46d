use glint_engine::paint::Color;
use glint_engine::text::FontId;

use crate::component::{Component, ComponentBase};
use crate::graphics::Graphics;

/// A push button with a centred text label.
///
/// The hovered flag and the action are driven by the application; the
/// toolkit does not route pointer events.
///
/// # Example
/// ```rust,ignore
/// Button::new("Save")
///     .with_bounds(20, 20, 120, 32)
///     .background(Color::rgb(0.2, 0.6, 1.0))
///     .on_action(|| log::info!("saved"))
/// ```
pub struct Button {
    base: ComponentBase,
    text: String,
    hovered: bool,
    on_action: Option<Box<dyn FnMut()>>,
    font: Option<FontId>,

    background: Color,
    hover_background: Color,
    disabled_background: Color,
    text_color: Color,
    disabled_text_color: Color,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new(),
            text: text.into(),
            hovered: false,
            on_action: None,
            font: None,
            background: Color::rgb(0.22, 0.24, 0.28),
            hover_background: Color::rgb(0.30, 0.33, 0.38),
            disabled_background: Color::rgb(0.16, 0.16, 0.18),
            text_color: Color::WHITE,
            disabled_text_color: Color::rgb(0.5, 0.5, 0.5),
        }
    }

    pub fn with_bounds(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        self.base.set_bounds(x, y, width, height);
        self
    }

    /// Callback invoked by [`fire_action`](Self::fire_action).
    pub fn on_action(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_action = Some(Box::new(f));
        self
    }

    /// Font for the label; the window's current font is used when unset.
    pub fn font(mut self, font: FontId) -> Self {
        self.font = Some(font);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Background color while hovered.
    pub fn hover_background(mut self, color: Color) -> Self {
        self.hover_background = color;
        self
    }

    pub fn disabled_background(mut self, color: Color) -> Self {
        self.disabled_background = color;
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

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn set_on_action(&mut self, f: impl FnMut() + 'static) {
        self.on_action = Some(Box::new(f));
    }

    /// Invokes the action when the button is enabled and has one.
    /// Returns whether it ran.
    pub fn fire_action(&mut self) -> bool {
        if !self.base.is_enabled() {
            return false;
        }
        match &mut self.on_action {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }

    fn colors(&self) -> (Color, Color) {
        if !self.base.is_enabled() {
            (self.disabled_background, self.disabled_text_color)
        } else if self.hovered {
            (self.hover_background, self.text_color)
        } else {
            (self.background, self.text_color)
        }
    }
}

impl Component for Button {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&self, g: &mut dyn Graphics) {
        let b = &self.base;
        let (bg, fg) = self.colors();
        g.draw_rect(b.x(), b.y(), b.width(), b.height(), bg);

        if self.text.is_empty() {
            return;
        }

        let previous = g.font();
        if self.font.is_some() {
            g.set_font(self.font);
        }

        let (tw, th) = g.text_size(&self.text);
        let tx = b.x() + (b.width() - tw as i32) / 2;
        let ty = b.y() + (b.height() - th as i32) / 2;
        g.draw_text(&self.text, tx, ty, fg);

        g.set_font(previous);
    }

    fn dispose(&mut self) {
        self.on_action = None;
    }
}
