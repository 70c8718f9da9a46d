use std::collections::HashMap;

use anyhow::Context;
use winit::event::WindowEvent as WinitEvent;
use winit::window::WindowId;

use glint_engine::core::{App as EngineApp, AppControl, FrameCtx};
use glint_engine::device::GpuInit;
use glint_engine::render::SpriteBatch;
use glint_engine::window::Runtime;

use crate::assets::Assets;
use crate::graphics::{BatchGraphics, Graphics};
use crate::window::{Window, WindowHandle};

// ── Application ───────────────────────────────────────────────────────────

/// Top-level UI application builder.
///
/// Register windows, then start the event loop with [`run`](Self::run). The
/// loop ends when the last window closes.
///
/// # Example
///
/// ```rust,ignore
/// let mut assets = Assets::new();
/// assets.open_font("/usr/share/fonts/TTF/DejaVuSans.ttf", 18.0)?;
///
/// Application::new(assets)
///     .window(Window::new("Example Window", 1920, 1080).with(Button::new("OK")))
///     .run();
/// ```
pub struct Application {
    assets: Assets,
    windows: Vec<(WindowHandle, Window)>,
    gpu_init: GpuInit,
}

impl Application {
    pub fn new(assets: Assets) -> Self {
        Self { assets, windows: Vec::new(), gpu_init: GpuInit::default() }
    }

    /// Builder form of [`add_window`](Self::add_window).
    pub fn window(mut self, window: Window) -> Self {
        self.add_window(window);
        self
    }

    /// Registers a window; the returned handle can own dialogs and popups.
    pub fn add_window(&mut self, window: Window) -> WindowHandle {
        let handle = WindowHandle(self.windows.len() as u64);
        self.windows.push((handle, window));
        handle
    }

    /// Device and surface options used for every window.
    pub fn gpu_init(mut self, gpu_init: GpuInit) -> Self {
        self.gpu_init = gpu_init;
        self
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut Assets {
        &mut self.assets
    }

    /// Runs the event loop until every window has closed.
    pub fn try_run(self) -> anyhow::Result<()> {
        let (state, configs) = UiAppState::prepare(self.assets, self.windows)?;
        Runtime::run(configs, self.gpu_init, state)
    }

    /// Like [`try_run`](Self::try_run), but logs a failure and exits the
    /// process with status 1.
    ///
    /// This never returns.
    pub fn run(self) -> ! {
        match self.try_run() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                log::error!("glint runtime error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

// ── UiAppState ────────────────────────────────────────────────────────────

struct WindowSlot {
    window: Window,
    batch: SpriteBatch,
}

/// Implements `glint_engine::core::App` for a set of [`Window`]s.
///
/// Windows are keyed by the runtime tag, which is the raw [`WindowHandle`].
struct UiAppState {
    assets: Assets,
    slots: HashMap<u64, WindowSlot>,
    tags: HashMap<WindowId, u64>,
}

impl UiAppState {
    /// Builds a sprite batch per window and the runtime configuration to open
    /// each with. Fails when a window names an owner that was never
    /// registered or its shader cannot be loaded.
    fn prepare(
        assets: Assets,
        windows: Vec<(WindowHandle, Window)>,
    ) -> anyhow::Result<(Self, Vec<glint_engine::window::RuntimeConfig>)> {
        let known: Vec<WindowHandle> = windows.iter().map(|(h, _)| *h).collect();

        let mut slots = HashMap::with_capacity(windows.len());
        let mut configs = Vec::with_capacity(windows.len());
        for (handle, window) in windows {
            if let Some(owner) = window.owner() {
                anyhow::ensure!(
                    known.contains(&owner),
                    "window {:?} is owned by unregistered window {owner:?}",
                    window.title()
                );
            }

            let batch = SpriteBatch::new(window.sprite_config().clone())
                .with_context(|| format!("failed to set up rendering for window {:?}", window.title()))?;

            configs.push(window.runtime_config(handle));
            slots.insert(handle.0, WindowSlot { window, batch });
        }

        Ok((Self { assets, slots, tags: HashMap::new() }, configs))
    }

    fn opened(&mut self, tag: u64) {
        if let Some(slot) = self.slots.get_mut(&tag) {
            slot.window.notify(WindowHandle(tag), |l, e| l.on_opened(e));
        }
    }

    fn closed(&mut self, tag: u64) {
        let Some(mut slot) = self.slots.remove(&tag) else { return; };
        slot.window.notify(WindowHandle(tag), |l, e| l.on_closed(e));
        slot.window.dispose();
        log::debug!("disposed window {:?}", slot.window.title());
    }

    fn focus_changed(&mut self, tag: u64, focused: bool) {
        let Some(slot) = self.slots.get_mut(&tag) else { return; };
        let handle = WindowHandle(tag);
        if focused {
            slot.window.notify(handle, |l, e| l.on_focused(e));
        } else {
            slot.window.notify(handle, |l, e| l.on_unfocused(e));
        }
    }
}

impl EngineApp for UiAppState {
    fn on_window_opened(&mut self, window_id: WindowId, tag: u64) {
        self.tags.insert(window_id, tag);
        self.opened(tag);
    }

    fn on_window_closed(&mut self, window_id: WindowId, tag: u64) {
        self.tags.remove(&window_id);
        self.closed(tag);
    }

    fn on_window_event(&mut self, window_id: WindowId, event: &WinitEvent) -> AppControl {
        if let WinitEvent::Focused(focused) = event {
            if let Some(&tag) = self.tags.get(&window_id) {
                self.focus_changed(tag, *focused);
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(slot) = self.slots.get_mut(&ctx.window.tag) else {
            return AppControl::Continue;
        };

        let assets = &self.assets;
        let WindowSlot { window, batch } = slot;

        ctx.render(window.background(), |rctx, target| {
            let mut g = BatchGraphics::begin(batch, rctx, target, assets.sources(), assets.default_font());
            window.render(&mut g as &mut dyn Graphics);
            g.finish();
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use glint_engine::render::BatchConfig;

    use super::*;
    use crate::component::{Component, ComponentBase};
    use crate::window::{WindowEvent, WindowListener};

    struct Log(Rc<RefCell<Vec<String>>>);

    impl WindowListener for Log {
        fn on_opened(&mut self, e: &WindowEvent<'_>) {
            self.0.borrow_mut().push(format!("open {}", e.title));
        }
        fn on_closed(&mut self, e: &WindowEvent<'_>) {
            self.0.borrow_mut().push(format!("close {}", e.title));
        }
        fn on_focused(&mut self, e: &WindowEvent<'_>) {
            self.0.borrow_mut().push(format!("focus {}", e.title));
        }
        fn on_unfocused(&mut self, e: &WindowEvent<'_>) {
            self.0.borrow_mut().push(format!("blur {}", e.title));
        }
    }

    struct Disposable {
        base: ComponentBase,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Component for Disposable {
        fn base(&self) -> &ComponentBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut ComponentBase {
            &mut self.base
        }
        fn render(&self, _g: &mut dyn Graphics) {}
        fn dispose(&mut self) {
            self.log.borrow_mut().push("dispose".to_string());
        }
    }

    #[test]
    fn handles_are_sequential() {
        let mut app = Application::new(Assets::new());
        let a = app.add_window(Window::new("a", 10, 10));
        let b = app.add_window(Window::dialog("b", a, 10, 10));
        assert_eq!((a, b), (WindowHandle(0), WindowHandle(1)));
    }

    #[test]
    fn prepare_builds_configs_with_tags_and_owners() {
        let mut app = Application::new(Assets::new());
        let main = app.add_window(Window::new("main", 800, 600));
        app.add_window(Window::popup("menu", main, 100, 200));

        let (state, configs) = UiAppState::prepare(app.assets, app.windows).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!((configs[0].tag, configs[0].owner), (0, None));
        assert_eq!((configs[1].tag, configs[1].owner), (1, Some(0)));
        assert_eq!(state.slots.len(), 2);
    }

    #[test]
    fn unknown_owner_is_rejected() {
        let mut app = Application::new(Assets::new());
        app.add_window(Window::dialog("orphan", WindowHandle(42), 10, 10));
        assert!(UiAppState::prepare(app.assets, app.windows).is_err());
    }

    #[test]
    fn missing_custom_shader_is_rejected() {
        let config = BatchConfig { shader_path: Some(PathBuf::from("/nonexistent/sprite.wgsl")), ..BatchConfig::default() };
        let app = Application::new(Assets::new()).window(Window::new("w", 10, 10).batch_config(config));
        assert!(UiAppState::prepare(app.assets, app.windows).is_err());
    }

    #[test]
    fn lifecycle_reaches_listener_and_disposes_on_close() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut window = Window::new("main", 10, 10).listener(Log(log.clone()));
        window.add(Disposable { base: ComponentBase::new(), log: log.clone() });

        let app = Application::new(Assets::new()).window(window);
        let (mut state, _) = UiAppState::prepare(app.assets, app.windows).unwrap();

        state.opened(0);
        state.focus_changed(0, true);
        state.focus_changed(0, false);
        state.closed(0);
        state.closed(0);

        assert_eq!(*log.borrow(), vec!["open main", "focus main", "blur main", "close main", "dispose"]);
        assert!(state.slots.is_empty());
    }
}
