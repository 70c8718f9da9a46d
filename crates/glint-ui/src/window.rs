use winit::dpi::LogicalSize;

use glint_engine::paint::Color;
use glint_engine::render::BatchConfig;
use glint_engine::window::RuntimeConfig;

use crate::component::{Component, ComponentId};
use crate::container::Container;
use crate::graphics::Graphics;

/// Handle to a window registered with an [`Application`](crate::Application).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WindowHandle(pub(crate) u64);

/// What kind of top-level window this is.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum WindowKind {
    /// Regular decorated application window.
    #[default]
    Frame,
    /// Decorated window belonging to an owner; closes with it.
    Dialog,
    /// Undecorated window belonging to an owner; closes with it.
    Popup,
}

/// Passed to [`WindowListener`] callbacks.
#[derive(Debug, Clone, Copy)]
pub struct WindowEvent<'a> {
    pub window: WindowHandle,
    pub title: &'a str,
    pub kind: WindowKind,
}

/// Receives window lifecycle notifications. Every method defaults to a no-op.
pub trait WindowListener {
    /// The window was created and shown for the first time.
    fn on_opened(&mut self, event: &WindowEvent<'_>) {
        let _ = event;
    }

    /// The window closed (by the user, its owner, or the application).
    fn on_closed(&mut self, event: &WindowEvent<'_>) {
        let _ = event;
    }

    fn on_focused(&mut self, event: &WindowEvent<'_>) {
        let _ = event;
    }

    fn on_unfocused(&mut self, event: &WindowEvent<'_>) {
        let _ = event;
    }
}

/// A top-level window: a root [`Container`] plus window attributes.
///
/// # Example
/// ```rust,ignore
/// let mut window = Window::new("Example Window", 1920, 1080).fullscreen(true);
/// window.add(Button::new("OK").with_bounds(20, 20, 120, 32));
/// ```
pub struct Window {
    title: String,
    width: u32,
    height: u32,
    resizable: bool,
    fullscreen: bool,
    visible: bool,
    kind: WindowKind,
    owner: Option<WindowHandle>,
    clear_color: Color,
    batch_config: BatchConfig,
    listener: Option<Box<dyn WindowListener>>,
    root: Container,
}

impl Window {
    /// A regular application window.
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            resizable: true,
            fullscreen: false,
            visible: true,
            kind: WindowKind::Frame,
            owner: None,
            clear_color: Color::BLACK,
            batch_config: BatchConfig::default(),
            listener: None,
            root: Container::new(),
        }
    }

    /// A dialog owned by `owner`.
    pub fn dialog(title: impl Into<String>, owner: WindowHandle, width: u32, height: u32) -> Self {
        Self { kind: WindowKind::Dialog, owner: Some(owner), ..Self::new(title, width, height) }
    }

    /// An undecorated popup owned by `owner`.
    pub fn popup(title: impl Into<String>, owner: WindowHandle, width: u32, height: u32) -> Self {
        Self {
            kind: WindowKind::Popup,
            owner: Some(owner),
            resizable: false,
            ..Self::new(title, width, height)
        }
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Borderless fullscreen on the current monitor.
    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Color the window is cleared to before each frame.
    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Sprite batch settings for this window's graphics context.
    pub fn batch_config(mut self, config: BatchConfig) -> Self {
        self.batch_config = config;
        self
    }

    pub fn listener(mut self, listener: impl WindowListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Adds a component to the window's root container.
    pub fn add(&mut self, child: impl Component) -> ComponentId {
        self.root.add(child)
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, child: impl Component) -> Self {
        self.root.add(child);
        self
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Container {
        &mut self.root
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn owner(&self) -> Option<WindowHandle> {
        self.owner
    }

    pub fn background(&self) -> Color {
        self.clear_color
    }

    pub(crate) fn sprite_config(&self) -> &BatchConfig {
        &self.batch_config
    }

    /// Runtime configuration for opening this window under `handle`.
    pub(crate) fn runtime_config(&self, handle: WindowHandle) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width as f64, self.height as f64),
            resizable: self.resizable,
            fullscreen: self.fullscreen,
            visible: self.visible,
            decorations: self.kind != WindowKind::Popup,
            tag: handle.0,
            owner: self.owner.map(|o| o.0),
        }
    }

    /// Renders the component tree.
    pub fn render(&self, g: &mut dyn Graphics) {
        self.root.render(g);
    }

    /// Disposes every component in the tree.
    pub fn dispose(&mut self) {
        self.root.dispose();
    }

    pub(crate) fn notify(&mut self, handle: WindowHandle, f: impl FnOnce(&mut dyn WindowListener, &WindowEvent<'_>)) {
        let Some(listener) = self.listener.as_mut() else { return; };
        let event = WindowEvent { window: handle, title: &self.title, kind: self.kind };
        f(listener.as_mut(), &event);
    }
}
