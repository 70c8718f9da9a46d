use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Windows are identified by their winit id and by the `tag` given in their
/// [`RuntimeConfig`](crate::window::RuntimeConfig).
pub trait App {
    /// Called once after a window and its GPU surface have been created.
    fn on_window_opened(&mut self, window_id: WindowId, tag: u64) {
        let _ = (window_id, tag);
    }

    /// Called once before a window is destroyed, whether the user closed it,
    /// its owner closed, or the app asked for it.
    fn on_window_closed(&mut self, window_id: WindowId, tag: u64) {
        let _ = (window_id, tag);
    }

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
