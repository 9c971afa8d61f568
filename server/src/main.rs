use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use todo_core::TodoStore;
use todo_server::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let store = match &config.data_file {
        Some(path) => TodoStore::open(path)
            .with_context(|| format!("failed to open snapshot {}", path.display()))?,
        None => TodoStore::new(),
    };

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    todo_server::run(listener, store).await?;
    Ok(())
}
