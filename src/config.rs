//! Environment configuration.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub log_file: Option<PathBuf>,
    pub debug: bool,
    /// Page size of the initial history fetch for a newly listened channel.
    pub history_limit: usize,
    pub prompt: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            debug: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_file: env_string_opt("CHATTERM_LOG_FILE").map(PathBuf::from),
            debug: env_flag("CHATTERM_DEBUG"),
            history_limit: env_string_opt("CHATTERM_HISTORY_LIMIT")
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_HISTORY_LIMIT),
            prompt: env_string_opt("CHATTERM_PROMPT").unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
