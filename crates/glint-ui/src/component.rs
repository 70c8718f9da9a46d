use std::sync::atomic::{AtomicU64, Ordering};

use crate::graphics::Graphics;

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

// ── ComponentId ───────────────────────────────────────────────────────────

/// Unique identifier of a component, allocated when the component is built.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocate a new, globally unique `ComponentId`.
    pub fn new() -> Self {
        ComponentId(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

// ── ComponentBase ─────────────────────────────────────────────────────────

/// State every component carries: bounds, flags, identity and parent link.
///
/// Coordinates are relative to the parent container. Width and height are
/// clamped to be non-negative on every write.
#[derive(Debug, Clone)]
pub struct ComponentBase {
    id: ComponentId,
    parent: Option<ComponentId>,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    visible: bool,
    enabled: bool,
}

impl ComponentBase {
    pub fn new() -> Self {
        Self {
            id: ComponentId::new(),
            parent: None,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            visible: true,
            enabled: true,
        }
    }

    #[inline]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The container this component was added to.
    #[inline]
    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ComponentId>) {
        self.parent = parent;
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    pub fn set_location(&mut self, x: i32, y: i32) {
        self.set_x(x);
        self.set_y(y);
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set_width(&mut self, width: i32) {
        self.width = width.max(0);
    }

    pub fn set_height(&mut self, height: i32) {
        self.height = height.max(0);
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.set_width(width);
        self.set_height(height);
    }

    /// Sets location and size at once.
    pub fn set_bounds(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.set_location(x, y);
        self.set_size(width, height);
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Default for ComponentBase {
    fn default() -> Self {
        Self::new()
    }
}

// ── Component ─────────────────────────────────────────────────────────────

/// The trait every element of a window's tree implements.
///
/// # Implementing a custom component
///
/// ```rust,ignore
/// use glint_ui::prelude::*;
///
/// pub struct Swatch { base: ComponentBase, color: Color }
///
/// impl Component for Swatch {
///     fn base(&self) -> &ComponentBase { &self.base }
///     fn base_mut(&mut self) -> &mut ComponentBase { &mut self.base }
///     fn render(&self, g: &mut dyn Graphics) {
///         let b = &self.base;
///         g.draw_rect(b.x(), b.y(), b.width(), b.height(), self.color);
///     }
/// }
/// ```
pub trait Component: 'static {
    fn base(&self) -> &ComponentBase;

    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Draws this component. Its location is in the coordinate space of the
    /// graphics context, which the parent container has already translated.
    fn render(&self, g: &mut dyn Graphics);

    /// Releases resources held by the component. Called once when the owning
    /// window closes; containers forward it to their children.
    fn dispose(&mut self) {}

    #[inline]
    fn id(&self) -> ComponentId {
        self.base().id()
    }
}
