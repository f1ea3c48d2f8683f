use log::LevelFilter;

/// Initializes the global logger. `RUST_LOG` is honored, but `level` wins.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
