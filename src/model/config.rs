use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Snapshot file, relative to the data dir unless absolute
    #[serde(default = "default_file")]
    pub file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            file: default_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// List tasks that are hidden until a later day
    #[serde(default)]
    pub show_hidden: bool,
    /// List tasks that were checked off on an earlier day
    #[serde(default = "default_true")]
    pub show_done_earlier: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            show_hidden: false,
            show_done_earlier: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_level(),
        }
    }
}

fn default_file() -> String {
    "daylist.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "warn".to_string()
}
