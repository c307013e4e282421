/// Config files picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["latprobe.toml", "latprobe.json"];
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TIMEOUT: &str = "10s";
