use std::path::PathBuf;

pub fn get_config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config").join("userdir")
}

pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}
