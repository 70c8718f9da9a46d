//! Glint UI — a retained component tree on top of `glint-engine`.
//!
//! Each [`Window`] owns a root [`Container`]; every frame the tree is
//! rendered depth-first through a [`Graphics`] context backed by the window's
//! sprite batch.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use glint_ui::prelude::*;
//!
//! let mut assets = Assets::new();
//! assets.open_font("DejaVuSans.ttf", 18.0)?;
//!
//! let mut window = Window::new("Hello", 640, 480);
//! window.add(Button::new("Click me").with_bounds(20, 20, 140, 36).on_action(|| println!("clicked")));
//!
//! Application::new(assets).window(window).run();
//! ```
//!
//! # Custom components
//!
//! Implement [`Component`] for any type holding a [`ComponentBase`], then add
//! it to a container like any built-in widget.

pub mod app;
pub mod assets;
pub mod component;
pub mod container;
pub mod graphics;
pub mod widgets;
pub mod window;

pub use app::Application;
pub use assets::Assets;
pub use component::{Component, ComponentBase, ComponentId};
pub use container::Container;
pub use graphics::{BatchGraphics, Graphics};
pub use window::{Window, WindowEvent, WindowHandle, WindowKind, WindowListener};

/// Everything needed to build windows and write components.
pub mod prelude {
    pub use crate::app::Application;
    pub use crate::assets::Assets;
    pub use crate::component::{Component, ComponentBase, ComponentId};
    pub use crate::container::Container;
    pub use crate::graphics::Graphics;
    pub use crate::widgets::{Button, ImageView, TextField};
    pub use crate::window::{Window, WindowEvent, WindowHandle, WindowKind, WindowListener};

    pub use glint_engine::bitmap::{Bitmap, BitmapId};
    pub use glint_engine::paint::Color;
    pub use glint_engine::text::FontId;
}
