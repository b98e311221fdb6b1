use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{Config, StaticFilesConfig};
use crate::http::connection::Connection;
use crate::http::resource::ResourceResolver;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen_addr))?;
    info!(
        "Listening on {}, serving {}",
        cfg.server.listen_addr, cfg.static_files.root
    );

    serve(listener, &cfg.static_files).await
}

/// Accepts connections forever, one task per connection.
pub async fn serve(listener: TcpListener, static_files: &StaticFilesConfig) -> anyhow::Result<()> {
    let resolver = ResourceResolver::from_config(static_files);

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let resolver = resolver.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, resolver);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
