use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the logged-in user is remembered between launches.
    pub session_file: PathBuf,
}

impl Config {
    pub fn new() -> Self {
        Self {
            session_file: env::var("BRAINBLAST_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".brainblast-session.json")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
