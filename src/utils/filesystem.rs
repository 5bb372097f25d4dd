pub const DEFAULT_CONFIG_PATH: &str = "/etc/a-axis-pin-finder/config.yaml";

/// Config file location, `PIN_FINDER_CONFIG` wins over the packaged default.
pub fn get_config_path() -> String {
    config_path_from(std::env::var("PIN_FINDER_CONFIG").ok())
}

fn config_path_from(override_path: Option<String>) -> String {
    override_path
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}
