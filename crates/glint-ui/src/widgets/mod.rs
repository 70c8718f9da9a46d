//! Built-in components.

pub mod button;
pub mod image_view;
pub mod text_field;

pub use button::Button;
pub use image_view::ImageView;
pub use text_field::TextField;
