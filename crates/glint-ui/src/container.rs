use crate::component::{Component, ComponentBase, ComponentId};
use crate::graphics::Graphics;

/// A component that owns an ordered list of children.
///
/// Children are positioned relative to the container's origin and rendered
/// depth-first in insertion order. Invisible children (and everything below
/// them) are skipped.
///
/// # Example
/// ```rust,ignore
/// let mut panel = Container::new();
/// panel.base_mut().set_location(40, 40);
/// panel.add(Button::new("OK").with_bounds(0, 0, 120, 32));
/// ```
pub struct Container {
    base: ComponentBase,
    children: Vec<Box<dyn Component>>,
}

impl Container {
    pub fn new() -> Self {
        Self { base: ComponentBase::new(), children: Vec::new() }
    }

    /// Appends `child`, records this container as its parent and returns its id.
    pub fn add(&mut self, child: impl Component) -> ComponentId {
        self.add_boxed(Box::new(child))
    }

    pub fn add_boxed(&mut self, mut child: Box<dyn Component>) -> ComponentId {
        child.base_mut().set_parent(Some(self.base.id()));
        let id = child.id();
        self.children.push(child);
        id
    }

    /// Detaches the direct child `id`, clearing its parent link.
    pub fn remove(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let index = self.children.iter().position(|c| c.id() == id)?;
        let mut child = self.children.remove(index);
        child.base_mut().set_parent(None);
        Some(child)
    }

    pub fn children(&self) -> &[Box<dyn Component>] {
        &self.children
    }

    /// Mutable access to a direct child.
    pub fn child_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component + 'static)> {
        self.children.iter_mut().find(|c| c.id() == id).map(|c| c.as_mut())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Renders the children with the graphics origin moved to this
    /// container's location.
    pub(crate) fn render_children(&self, g: &mut dyn Graphics) {
        let (x, y) = (self.base.x(), self.base.y());
        g.translate(x, y);
        for child in self.children.iter().filter(|c| c.base().is_visible()) {
            child.render(g);
        }
        g.translate(-x, -y);
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Container {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&self, g: &mut dyn Graphics) {
        self.render_children(g);
    }

    fn dispose(&mut self) {
        for child in &mut self.children {
            child.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glint_engine::paint::Color;

    use super::*;
    use crate::graphics::recording::{Op, RecordingGraphics};

    /// Draws a 1×1 rect at its location and logs render/dispose calls.
    struct Probe {
        base: ComponentBase,
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        disposed: Rc<Cell<u32>>,
    }

    impl Probe {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>, disposed: &Rc<Cell<u32>>) -> Self {
            Self { base: ComponentBase::new(), name, log: log.clone(), disposed: disposed.clone() }
        }

        fn at(mut self, x: i32, y: i32) -> Self {
            self.base.set_location(x, y);
            self
        }
    }

    impl Component for Probe {
        fn base(&self) -> &ComponentBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ComponentBase {
            &mut self.base
        }

        fn render(&self, g: &mut dyn Graphics) {
            self.log.borrow_mut().push(self.name);
            g.draw_rect(self.base.x(), self.base.y(), 1, 1, Color::WHITE);
        }

        fn dispose(&mut self) {
            self.disposed.set(self.disposed.get() + 1);
        }
    }

    fn shared() -> (Rc<RefCell<Vec<&'static str>>>, Rc<Cell<u32>>) {
        (Rc::new(RefCell::new(Vec::new())), Rc::new(Cell::new(0)))
    }

    #[test]
    fn add_records_parent() {
        let (log, disposed) = shared();
        let mut c = Container::new();
        let id = c.add(Probe::new("a", &log, &disposed));
        assert_eq!(c.len(), 1);
        assert_eq!(c.children()[0].base().parent(), Some(c.id()));
        assert_eq!(c.children()[0].id(), id);
    }

    #[test]
    fn remove_clears_parent() {
        let (log, disposed) = shared();
        let mut c = Container::new();
        let id = c.add(Probe::new("a", &log, &disposed));
        let child = c.remove(id).unwrap();
        assert!(child.base().parent().is_none());
        assert!(c.is_empty());
        assert!(c.remove(id).is_none());
    }

    #[test]
    fn renders_depth_first_in_insertion_order() {
        let (log, disposed) = shared();
        let mut inner = Container::new();
        inner.add(Probe::new("b1", &log, &disposed));
        inner.add(Probe::new("b2", &log, &disposed));

        let mut root = Container::new();
        root.add(Probe::new("a", &log, &disposed));
        root.add(inner);
        root.add(Probe::new("c", &log, &disposed));

        root.render(&mut RecordingGraphics::default());
        assert_eq!(*log.borrow(), vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn invisible_subtrees_are_skipped() {
        let (log, disposed) = shared();
        let mut inner = Container::new();
        inner.add(Probe::new("hidden-child", &log, &disposed));
        inner.base_mut().set_visible(false);

        let mut root = Container::new();
        let hidden = root.add(Probe::new("hidden", &log, &disposed));
        root.add(inner);
        root.add(Probe::new("shown", &log, &disposed));
        root.child_mut(hidden).unwrap().base_mut().set_visible(false);

        root.render(&mut RecordingGraphics::default());
        assert_eq!(*log.borrow(), vec!["shown"]);
    }

    #[test]
    fn child_coordinates_are_relative_to_container() {
        let (log, disposed) = shared();
        let mut inner = Container::new();
        inner.base_mut().set_location(100, 50);
        inner.add(Probe::new("p", &log, &disposed).at(5, 6));

        let mut root = Container::new();
        root.base_mut().set_location(10, 20);
        root.add(inner);
        root.add(Probe::new("q", &log, &disposed).at(1, 1));

        let mut g = RecordingGraphics::default();
        root.render(&mut g);
        assert_eq!(g.origin(), (0, 0));
        assert_eq!(
            g.ops,
            vec![
                Op::Rect { x: 115, y: 76, w: 1, h: 1, color: Color::WHITE },
                Op::Rect { x: 11, y: 21, w: 1, h: 1, color: Color::WHITE },
            ]
        );
    }

    #[test]
    fn dispose_reaches_every_descendant() {
        let (log, disposed) = shared();
        let mut inner = Container::new();
        inner.add(Probe::new("x", &log, &disposed));
        inner.add(Probe::new("y", &log, &disposed));

        let mut root = Container::new();
        root.add(Probe::new("z", &log, &disposed));
        root.add(inner);

        root.dispose();
        assert_eq!(disposed.get(), 3);
    }
}
