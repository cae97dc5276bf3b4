use serde::Deserialize;
use std::path::PathBuf;

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_location_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    /// Base URL of the park-tracker backend.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Local JSON snapshot of the parks list; used instead of the API
    /// when set.
    #[serde(default)]
    pub parks_file: Option<PathBuf>,
    /// Override for the visited-set file location.
    #[serde(default)]
    pub visited_path: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long to wait for geolocation before falling back to the
    /// default origin.
    #[serde(default = "default_location_timeout_secs")]
    pub location_timeout_secs: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            parks_file: None,
            visited_path: None,
            timeout_secs: default_timeout_secs(),
            location_timeout_secs: default_location_timeout_secs(),
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Where the visited set lives: explicit override, else the platform
    /// data directory, else the current directory.
    pub fn visited_path(&self) -> PathBuf {
        if let Some(ref path) = self.visited_path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("parktrack").join("visited.json"))
            .unwrap_or_else(|| PathBuf::from("visited.json"))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("parktrack.toml"));
    paths.push(PathBuf::from(".parktrack.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("parktrack").join("config.toml"));
        paths.push(config_dir.join("parktrack.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".parktrack.toml"));
        paths.push(home.join(".config").join("parktrack").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.location_timeout_secs, 5);
        assert!(config.parks_file.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: FileConfig = toml::from_str(
            r#"
            api_base_url = "https://parks.example.com"
            parks_file = "data/parks.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://parks.example.com");
        assert_eq!(config.parks_file, Some(PathBuf::from("data/parks.json")));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_visited_path_override() {
        let config: FileConfig = toml::from_str(r#"visited_path = "/tmp/v.json""#).unwrap();
        assert_eq!(config.visited_path(), PathBuf::from("/tmp/v.json"));
    }
}
