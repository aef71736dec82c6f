use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use defaultwiki_core::{PageStore, Renderer, SettingsStore, TemplateSet, TemplateSource};

/// Shared by every request. Only the settings can change after startup,
/// and only through [`SettingsStore::update`].
#[derive(Clone)]
pub struct AppState {
    pub store: PageStore,
    pub renderer: Arc<Renderer>,
    pub templates: Arc<TemplateSet>,
    pub settings: Arc<SettingsStore>,
    pub assets: PathBuf,
}

impl AppState {
    /// Opens the data directory and compiles every template. Any template
    /// problem is returned here so the server never starts half-broken.
    pub fn new(data_root: &Path, templates: &TemplateSource, assets: &Path) -> Result<Self> {
        let store = PageStore::open(data_root)
            .with_context(|| format!("Failed to open data directory {}", data_root.display()))?;
        let templates = TemplateSet::load(templates).context("Failed to load templates")?;
        let settings = SettingsStore::in_data_root(data_root);

        Ok(Self {
            store,
            renderer: Arc::new(Renderer::new()),
            templates: Arc::new(templates),
            settings: Arc::new(settings),
            assets: assets.to_path_buf(),
        })
    }
}
