use anyhow::Result;
use defaultwiki_core::TemplateSource;
use std::path::PathBuf;

mod handlers;
mod state;

pub use handlers::{AppError, ValidTitle, router};
pub use state::AppState;

/// Configuration for the wiki server
#[derive(Debug, Clone)]
pub struct WikiServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to serve on
    pub port: u16,
    /// Directory holding `<title>.txt` pages and `settings.toml`
    pub data_root: PathBuf,
    /// Directory served under `/assets`
    pub assets: PathBuf,
    /// Read templates from this directory instead of the bundled ones
    pub templates: Option<PathBuf>,
    /// Auto-open browser
    pub open: bool,
}

impl Default for WikiServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1789,
            data_root: PathBuf::from("data"),
            assets: PathBuf::from("static"),
            templates: None,
            open: false,
        }
    }
}

impl WikiServerConfig {
    pub fn template_source(&self) -> TemplateSource {
        match &self.templates {
            Some(dir) => TemplateSource::Directory(dir.clone()),
            None => TemplateSource::Bundled,
        }
    }
}

pub struct WikiServer {
    config: WikiServerConfig,
}

impl WikiServer {
    pub fn new(config: WikiServerConfig) -> Self {
        Self { config }
    }

    /// Build the application state, bind, and serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let state = AppState::new(
            &self.config.data_root,
            &self.config.template_source(),
            &self.config.assets,
        )?;

        if !self.config.assets.exists() {
            log::warn!(
                "Assets directory does not exist: {}",
                self.config.assets.display()
            );
        }

        let app = router(state);

        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;

        log::info!("DefaultWiki listening on http://{}", addr);
        log::info!("Pages stored in {}", self.config.data_root.display());

        if self.config.open {
            if let Err(e) = open::that(format!("http://{}", addr)) {
                log::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log::info!("DefaultWiki stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
