use std::sync::Once;

/// GPU stack crates that log heavily at `info`.
const GPU_CRATES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax (e.g. "info",
/// "glint_engine=debug,glint_ui=trace"). When it is `None`, `RUST_LOG` is
/// consulted, then `info` is used.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Cap the wgpu/naga crates at `warn` unless the filter names them.
    pub quiet_gpu: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            quiet_gpu: true,
        }
    }
}

impl LoggingConfig {
    /// The filter string handed to `env_logger`.
    fn resolved_filter(&self) -> String {
        let base = self
            .env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string());

        if !self.quiet_gpu {
            return base;
        }

        let mut filter = base;
        for krate in GPU_CRATES {
            if !filter.contains(krate) {
                filter.push_str(&format!(",{krate}=warn"));
            }
        }
        filter
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolved_filter();
        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized ({filter})");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_gets_gpu_caps() {
        let config = LoggingConfig { env_filter: Some("debug".into()), ..Default::default() };
        assert_eq!(config.resolved_filter(), "debug,wgpu_core=warn,wgpu_hal=warn,naga=warn");
    }

    #[test]
    fn named_gpu_crates_are_left_alone() {
        let config = LoggingConfig { env_filter: Some("info,naga=trace".into()), ..Default::default() };
        assert_eq!(config.resolved_filter(), "info,naga=trace,wgpu_core=warn,wgpu_hal=warn");
    }

    #[test]
    fn quiet_gpu_can_be_disabled() {
        let config = LoggingConfig {
            env_filter: Some("warn".into()),
            quiet_gpu: false,
            ..Default::default()
        };
        assert_eq!(config.resolved_filter(), "warn");
    }
}
