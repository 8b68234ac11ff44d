use crate::adapters::http::{router, AppState};
use crate::adapters::smtp::SmtpRelay;
use crate::core::ConfigProvider;
use crate::utils::error::{ContactError, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ContactServer<C: ConfigProvider> {
    config: C,
}

impl<C: ConfigProvider> ContactServer<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    /// 解析 bind 位址，主機名稱 (例如 localhost) 也會透過 DNS 解析
    pub async fn resolve_bind_addrs(&self) -> Result<Vec<SocketAddr>> {
        let host = self.config.bind_address();
        let port = self.config.port();
        let invalid = |reason: String| ContactError::InvalidConfigValueError {
            field: "bind".to_string(),
            value: format!("{}:{}", host, port),
            reason,
        };

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| invalid(e.to_string()))?
            .collect();

        if addrs.is_empty() {
            return Err(invalid("host did not resolve to any address".to_string()));
        }
        Ok(addrs)
    }

    pub async fn bind_listener(&self) -> Result<TcpListener> {
        let addrs = self.resolve_bind_addrs().await?;
        let listener = TcpListener::bind(addrs.as_slice()).await?;
        Ok(listener)
    }

    /// 建立 SMTP relay 與 HTTP 狀態，並在背景測試 SMTP 連線
    pub fn build_state(&self) -> Result<AppState> {
        let relay = Arc::new(SmtpRelay::new(
            &self.config.smtp_settings(),
            self.config.retry_policy(),
        )?);

        let startup_check = Arc::clone(&relay);
        tokio::spawn(async move {
            startup_check.verify().await;
        });

        let static_dir = self.config.static_dir();
        if !Path::new(static_dir).join("index.html").is_file() {
            tracing::warn!("⚠️ No index.html found in static directory '{}'", static_dir);
        }

        Ok(AppState::new(relay, static_dir))
    }

    pub async fn run(&self) -> Result<()> {
        let listener = self.bind_listener().await?;
        let state = self.build_state()?;

        tracing::info!("🚀 Server running on {}", listener.local_addr()?);
        tracing::info!("📁 Serving static files from: {}", self.config.static_dir());

        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
