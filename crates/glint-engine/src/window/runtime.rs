use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};

/// Window configuration.
///
/// `tag` is an application-chosen identifier reported back through
/// [`App`](crate::core::App) callbacks; `owner` names the tag of the window
/// this one belongs to. Owned windows close together with their owner.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
    /// Borderless fullscreen on the current monitor.
    pub fullscreen: bool,
    pub visible: bool,
    /// Title bar and borders.
    pub decorations: bool,
    pub tag: u64,
    pub owner: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: true,
            fullscreen: false,
            visible: true,
            decorations: true,
            tag: 0,
            owner: None,
        }
    }
}

impl RuntimeConfig {
    /// winit attributes for this configuration.
    pub fn window_attributes(&self) -> WindowAttributes {
        let fullscreen = self.fullscreen.then_some(Fullscreen::Borderless(None));
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.initial_size)
            .with_resizable(self.resizable)
            .with_maximized(self.fullscreen)
            .with_fullscreen(fullscreen)
            .with_visible(self.visible)
            .with_decorations(self.decorations)
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn create_window(&mut self, config: RuntimeConfig) {
        self.commands.push(Command::CreateWindow(config));
    }

    /// Closes a window and every window it owns.
    pub fn close_window(&mut self, id: WindowId) {
        self.commands.push(Command::CloseWindow(id));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    /// Stops the runtime with `err`; [`Runtime::run`] returns it.
    pub fn fail(&mut self, err: anyhow::Error) {
        self.commands.push(Command::Fail(err));
    }
}

enum Command {
    CreateWindow(RuntimeConfig),
    CloseWindow(WindowId),
    Exit,
    Fail(anyhow::Error),
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens `initial` windows once the event loop resumes and runs until the
    /// last window closes.
    pub fn run<A>(initial: Vec<RuntimeConfig>, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        anyhow::ensure!(!initial.is_empty(), "no windows to open");

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    tag: u64,
    owner: Option<u64>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: Vec<RuntimeConfig>,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: Vec<RuntimeConfig>, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn fail(&mut self, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.request_exit();
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let window = event_loop
            .create_window(config.window_attributes())
            .with_context(|| format!("failed to create window {:?}", config.title))?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            tag: config.tag,
            owner: config.owner,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
            .try_build()
            .with_context(|| format!("GPU initialization failed for window {:?}", config.title))?;

        log::debug!("opened window {:?} (tag {}, owner {:?})", config.title, config.tag, config.owner);
        self.windows.insert(id, entry);
        self.app.on_window_opened(id, config.tag);
        entry_request_redraw(&self.windows, id);
        Ok(id)
    }

    fn window_links(&self) -> Vec<(u64, Option<u64>)> {
        self.windows
            .values()
            .map(|e| (*e.borrow_tag(), *e.borrow_owner()))
            .collect()
    }

    /// Closes `id` and every window it owns, owned windows first.
    fn close_window_tree(&mut self, id: WindowId) {
        let Some(root) = self.windows.get(&id).map(|e| *e.borrow_tag()) else {
            return;
        };
        for tag in close_order(&self.window_links(), root) {
            self.close_tag(tag);
        }
    }

    /// Closes every open window, owned windows before their owners.
    fn close_all_windows(&mut self) {
        for tag in shutdown_order(&self.window_links()) {
            self.close_tag(tag);
        }
    }

    fn close_tag(&mut self, tag: u64) {
        let ids: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|(_, e)| *e.borrow_tag() == tag)
            .map(|(id, _)| *id)
            .collect();
        for wid in ids {
            self.app.on_window_closed(wid, tag);
            self.windows.remove(&wid);
            log::debug!("closed window tag {tag}");
        }
    }

    /// Applies a command that needs no event loop; window creation is handed
    /// back to the caller.
    fn apply_command(&mut self, cmd: Command) -> Option<RuntimeConfig> {
        match cmd {
            Command::CreateWindow(cfg) => return Some(cfg),
            Command::CloseWindow(id) => self.close_window_tree(id),
            Command::Exit => self.request_exit(),
            Command::Fail(err) => self.fail(err),
        }
        None
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            if let Some(cfg) = self.apply_command(cmd) {
                if let Err(e) = self.create_window_entry(event_loop, cfg) {
                    self.fail(e);
                }
            }
        }

        if self.windows.is_empty() {
            self.request_exit();
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

fn entry_request_redraw(windows: &HashMap<WindowId, WindowEntry>, id: WindowId) {
    if let Some(entry) = windows.get(&id) {
        entry.with_window(|w| w.request_redraw());
    }
}

/// Tags to close when `root` closes: everything it transitively owns
/// (deepest first), then `root` itself. Ownership cycles are broken.
fn close_order(links: &[(u64, Option<u64>)], root: u64) -> Vec<u64> {
    fn visit(links: &[(u64, Option<u64>)], tag: u64, out: &mut Vec<u64>) {
        if out.contains(&tag) {
            return;
        }
        out.push(tag);
        for &(child, owner) in links {
            if owner == Some(tag) && child != tag {
                visit(links, child, out);
            }
        }
    }

    let mut order = Vec::new();
    visit(links, root, &mut order);
    order.reverse();
    order
}

/// Close order for every window in `links`: each top-level tree in turn
/// (by tag), owned windows first. Windows only reachable through an
/// ownership cycle come last.
fn shutdown_order(links: &[(u64, Option<u64>)]) -> Vec<u64> {
    let is_open = |tag: u64| links.iter().any(|&(t, _)| t == tag);

    let mut roots: Vec<u64> = links
        .iter()
        .filter(|&&(_, owner)| owner.is_none_or(|o| !is_open(o)))
        .map(|&(tag, _)| tag)
        .collect();
    roots.sort_unstable();

    let mut rest: Vec<u64> = links.iter().map(|&(tag, _)| tag).collect();
    rest.sort_unstable();

    let mut order: Vec<u64> = Vec::with_capacity(links.len());
    for root in roots.into_iter().chain(rest) {
        if order.contains(&root) {
            continue;
        }
        for tag in close_order(links, root) {
            if !order.contains(&tag) {
                order.push(tag);
            }
        }
    }
    order
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        for config in std::mem::take(&mut self.initial) {
            if let Err(e) = self.create_window_entry(event_loop, config) {
                self.fail(e.context("failed to create initial window"));
                event_loop.exit();
                return;
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Early exits (fatal errors, RuntimeCtx::exit) leave windows open.
        self.close_all_windows();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        for entry in self.windows.values() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if !self.windows.contains_key(&window_id) {
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.request_exit();
            event_loop.exit();
            return;
        }

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.close_window_tree(window_id);
                if self.windows.is_empty() {
                    self.request_exit();
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                let mut runtime_ctx = RuntimeCtx::default();
                let mut app_control = AppControl::Continue;

                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let app = &mut self.app;
                    entry.with_mut(|fields| {
                        let mut ctx = FrameCtx {
                            window: WindowCtx {
                                id: window_id,
                                tag: *fields.tag,
                                window: fields.window,
                            },
                            gpu: fields.gpu,
                            runtime: &mut runtime_ctx,
                        };

                        app_control = app.on_frame(&mut ctx);
                    });
                }

                if app_control == AppControl::Exit {
                    runtime_ctx.exit();
                }

                self.apply_commands(event_loop, runtime_ctx);
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_a_plain_visible_window() {
        let attrs = RuntimeConfig::default().window_attributes();
        assert_eq!(attrs.title, "glint");
        assert!(attrs.resizable);
        assert!(attrs.visible);
        assert!(attrs.decorations);
        assert!(!attrs.maximized);
        assert!(attrs.fullscreen.is_none());
    }

    #[test]
    fn flags_map_to_attributes() {
        let config = RuntimeConfig {
            title: "Example Window".into(),
            resizable: false,
            fullscreen: true,
            visible: false,
            decorations: false,
            ..Default::default()
        };
        let attrs = config.window_attributes();
        assert_eq!(attrs.title, "Example Window");
        assert!(!attrs.resizable);
        assert!(!attrs.visible);
        assert!(!attrs.decorations);
        assert!(attrs.maximized);
        assert!(matches!(attrs.fullscreen, Some(Fullscreen::Borderless(None))));
    }

    #[test]
    fn closing_an_owner_closes_owned_windows_first() {
        // 1 owns 2 and 3; 3 owns 4; 5 is unrelated.
        let links = [(1, None), (2, Some(1)), (3, Some(1)), (4, Some(3)), (5, None)];
        let order = close_order(&links, 1);
        assert_eq!(order.len(), 4);
        assert_eq!(order.last(), Some(&1));
        assert!(!order.contains(&5));
        let pos = |t| order.iter().position(|&x| x == t).unwrap();
        assert!(pos(4) < pos(3));
    }

    #[test]
    fn closing_a_leaf_closes_only_it() {
        let links = [(1, None), (2, Some(1))];
        assert_eq!(close_order(&links, 2), vec![2]);
    }

    #[test]
    fn ownership_cycles_terminate() {
        let links = [(1, Some(2)), (2, Some(1))];
        let order = close_order(&links, 1);
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn shutdown_closes_every_window_owned_first() {
        // 1 owns 2, 2 owns 3; 4 is top-level; 5 names a window that is gone.
        let links = [(3, Some(2)), (1, None), (4, None), (2, Some(1)), (5, Some(9))];
        let order = shutdown_order(&links);
        assert_eq!(order, vec![3, 2, 1, 4, 5]);
    }

    #[test]
    fn shutdown_includes_cycles() {
        let links = [(7, None), (1, Some(2)), (2, Some(1))];
        let order = shutdown_order(&links);
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], 7);
        assert!(order.contains(&1) && order.contains(&2));
    }

    struct Idle;

    impl CoreApp for Idle {
        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            AppControl::Continue
        }
    }

    #[test]
    fn fail_command_becomes_the_run_error() {
        let mut state = AppState::new(Vec::new(), GpuInit::default(), Idle);
        let mut ctx = RuntimeCtx::default();
        ctx.fail(anyhow::anyhow!("surface out of memory"));
        ctx.fail(anyhow::anyhow!("second failure"));

        for cmd in ctx.commands.drain(..) {
            assert!(state.apply_command(cmd).is_none());
        }

        assert!(state.exit_requested);
        let err = state.fatal.take().unwrap();
        assert_eq!(err.to_string(), "surface out of memory");
    }

    #[test]
    fn create_commands_are_handed_back() {
        let mut state = AppState::new(Vec::new(), GpuInit::default(), Idle);
        let cfg = state.apply_command(Command::CreateWindow(RuntimeConfig { tag: 4, ..Default::default() }));
        assert_eq!(cfg.map(|c| c.tag), Some(4));
        assert!(!state.exit_requested);
    }
}
