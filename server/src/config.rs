//! Server configuration via clap, with environment fallbacks.

use std::path::PathBuf;

use clap::Parser;

/// HTTP service for the todo store.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version)]
pub struct Config {
    /// Address to bind.
    #[arg(long = "host", env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(short = 'p', long = "port", env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Snapshot file to load at startup and rewrite after each change.
    /// Without it the store lives in memory only.
    #[arg(long = "data-file", env = "TODO_DATA_FILE")]
    pub data_file: Option<PathBuf>,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
