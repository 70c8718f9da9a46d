use anyhow::Context;
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_ui::prelude::*;

/// Logs lifecycle events of the main window.
struct MainWindowLog;

impl WindowListener for MainWindowLog {
    fn on_opened(&mut self, event: &WindowEvent<'_>) {
        log::info!("{:?} opened", event.title);
    }

    fn on_closed(&mut self, event: &WindowEvent<'_>) {
        log::info!("{:?} closed", event.title);
    }

    fn on_focused(&mut self, event: &WindowEvent<'_>) {
        log::debug!("{:?} focused", event.title);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let mut assets = Assets::new();
    match load_font() {
        Some(bytes) => {
            assets.load_font(&bytes, 24.0).context("failed to load the system font")?;
        }
        None => log::warn!("no system font found; text will not render"),
    }

    let banner = assets.insert_bitmap(Bitmap::vertical_gradient(
        Color::rgb(0.2, 0.6, 1.0),
        Color::rgb(0.0, 0.1, 0.3),
        400,
        120,
    ));
    let banner = ImageView::sized(banner, assets.bitmaps()).at(100, 60);

    let mut panel = Container::new();
    panel.base_mut().set_location(100, 220);
    panel.add(
        Button::new("Click me")
            .with_bounds(0, 0, 200, 48)
            .on_action(|| log::info!("button clicked")),
    );
    panel.add(
        TextField::new()
            .with_bounds(0, 80, 400, 48)
            .placeholder("Type here"),
    );

    let mut window = Window::new("Example Window", 1920, 1080)
        .fullscreen(true)
        .listener(MainWindowLog);
    window.add(banner);
    window.add(panel);

    Application::new(assets).window(window).try_run()
}

fn load_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}
