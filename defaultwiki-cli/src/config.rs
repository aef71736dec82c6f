use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File};
use defaultwiki_server::WikiServerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "./defaultwiki.toml";

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WikiConfig {
    pub server: ServeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServeConfig {
    /// Host to bind to
    pub host: String,
    /// Port to serve on
    pub port: u16,
    /// Directory holding the pages
    pub data: String,
    /// Directory served under /assets
    pub assets: String,
    /// Template directory overriding the bundled templates
    pub templates: Option<String>,
    /// Configuration file path
    pub config: String,
    /// Open browser automatically
    pub open: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1789,
            data: "data".to_string(),
            assets: "static".to_string(),
            templates: None,
            config: DEFAULT_CONFIG_FILE.to_string(),
            open: false,
        }
    }
}

impl WikiConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (DEFAULTWIKI_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let explicit_file = arg(args, "config");
        let config_file = explicit_file
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        let defaults = Self::default();
        builder = builder.add_source(ConfigBuilder::try_from(&defaults)?);

        // 2. Add configuration file; only an explicitly requested one must exist
        builder = builder.add_source(
            File::from(Path::new(&config_file)).required(explicit_file.is_some()),
        );

        // 3. Add environment variables with DEFAULTWIKI_ prefix
        builder = builder.add_source(
            Environment::with_prefix("DEFAULTWIKI")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        // 4. Override with CLI arguments (highest priority)
        builder = builder.set_override("server.config", config_file)?;
        for key in ["host", "data", "assets", "templates"] {
            if let Some(value) = arg(args, key) {
                builder = builder.set_override(format!("server.{}", key), value)?;
            }
        }
        if let Some(port) = args.try_get_one::<u16>("port").ok().flatten() {
            builder = builder.set_override("server.port", port.to_string())?;
        }
        if args.try_get_one::<bool>("open").ok().flatten() == Some(&true) {
            builder = builder.set_override("server.open", true)?;
        }

        // Build and deserialize
        let config = builder.build()?;
        let wiki_config: WikiConfig = config.try_deserialize()?;

        Ok(wiki_config)
    }

    /// Get the serve configuration
    pub fn serve_config(&self) -> &ServeConfig {
        &self.server
    }

    pub fn server_config(&self) -> WikiServerConfig {
        let serve = &self.server;
        WikiServerConfig {
            host: serve.host.clone(),
            port: serve.port,
            data_root: PathBuf::from(&serve.data),
            assets: PathBuf::from(&serve.assets),
            templates: serve.templates.as_ref().map(PathBuf::from),
            open: serve.open,
        }
    }
}

/// A string argument the user actually passed. Arguments that are not
/// defined for the current command count as absent.
fn arg(args: &ArgMatches, id: &str) -> Option<String> {
    args.try_get_one::<String>(id).ok().flatten().cloned()
}

/// Load configuration specifically for serve commands
pub fn load_serve_config(args: &ArgMatches) -> Result<WikiConfig> {
    WikiConfig::load(args)
}
