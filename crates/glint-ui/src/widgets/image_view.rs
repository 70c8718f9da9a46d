use glint_engine::bitmap::{BitmapId, BitmapStore};

use crate::component::{Component, ComponentBase};
use crate::graphics::Graphics;

/// Draws a stored bitmap at its natural size.
pub struct ImageView {
    base: ComponentBase,
    image: BitmapId,
}

impl ImageView {
    pub fn new(image: BitmapId) -> Self {
        Self { base: ComponentBase::new(), image }
    }

    /// Like [`new`](Self::new), sized to the bitmap's dimensions.
    pub fn sized(image: BitmapId, store: &BitmapStore) -> Self {
        let mut view = Self::new(image);
        if let Some(bitmap) = store.get(image) {
            view.base.set_size(bitmap.width() as i32, bitmap.height() as i32);
        }
        view
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.base.set_location(x, y);
        self
    }

    pub fn image(&self) -> BitmapId {
        self.image
    }

    pub fn set_image(&mut self, image: BitmapId) {
        self.image = image;
    }
}

impl Component for ImageView {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&self, g: &mut dyn Graphics) {
        g.draw_image(self.image, self.base.x(), self.base.y());
    }
}

#[cfg(test)]
mod tests {
    use glint_engine::bitmap::Bitmap;
    use glint_engine::paint::Color;

    use super::*;
    use crate::graphics::recording::{Op, RecordingGraphics};

    #[test]
    fn sized_view_takes_bitmap_dimensions() {
        let mut store = BitmapStore::new();
        let id = store.insert(Bitmap::solid(Color::WHITE, 32, 16));
        let view = ImageView::sized(id, &store).at(4, 5);
        assert_eq!((view.base().width(), view.base().height()), (32, 16));

        let mut g = RecordingGraphics::default();
        view.render(&mut g);
        assert_eq!(g.ops, vec![Op::Image { image: id, x: 4, y: 5 }]);
    }
}
