use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};

/// Page templates that can be rendered by name.
pub const PAGE_TEMPLATES: [&str; 4] = ["edit", "view", "admin", "pages"];

/// Shared partials, in the order they are merged into every page template.
pub const PARTIALS: [&str; 2] = ["layout/modals", "layout/nav"];

const BUNDLED: [(&str, &str); 6] = [
    ("edit", include_str!("../views/edit.html")),
    ("view", include_str!("../views/view.html")),
    ("admin", include_str!("../views/admin.html")),
    ("pages", include_str!("../views/pages.html")),
    ("layout/nav", include_str!("../views/layout/nav.html")),
    ("layout/modals", include_str!("../views/layout/modals.html")),
];

#[derive(Debug)]
pub enum TemplateError {
    TeraError(tera::Error),
    IoError(PathBuf, std::io::Error),
    Missing(String),
    Unknown(String),
}

impl From<tera::Error> for TemplateError {
    fn from(err: tera::Error) -> Self {
        TemplateError::TeraError(err)
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::TeraError(e) => {
                // Tera keeps the useful part (line, unknown variable...) in the source chain
                write!(f, "Template error: {}", e)?;
                let mut source = std::error::Error::source(e);
                while let Some(cause) = source {
                    write!(f, ": {}", cause)?;
                    source = std::error::Error::source(cause);
                }
                Ok(())
            }
            TemplateError::IoError(path, e) => write!(f, "IO error reading {}: {}", path.display(), e),
            TemplateError::Missing(name) => write!(f, "Template not found: {}", name),
            TemplateError::Unknown(name) => write!(f, "No such page template: {}", name),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Where template markup comes from.
#[derive(Debug, Clone, Default)]
pub enum TemplateSource {
    /// The templates compiled into the binary.
    #[default]
    Bundled,
    /// A directory laid out like the bundled set: `view.html`,
    /// `layout/nav.html`, ...
    Directory(PathBuf),
}

impl TemplateSource {
    pub fn read(&self, name: &str) -> Result<String, TemplateError> {
        match self {
            TemplateSource::Bundled => BUNDLED
                .iter()
                .find(|(bundled, _)| *bundled == name)
                .map(|(_, markup)| markup.to_string())
                .ok_or_else(|| TemplateError::Missing(name.to_string())),
            TemplateSource::Directory(dir) => {
                let path = dir.join(file_name(name));
                std::fs::read_to_string(&path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => TemplateError::Missing(name.to_string()),
                    _ => TemplateError::IoError(path, e),
                })
            }
        }
    }
}

/// Every page template, each already merged with the shared partials.
///
/// Built once at startup. A template that is missing or does not parse
/// fails the whole set.
pub struct TemplateSet {
    templates: HashMap<String, Tera>,
}

impl TemplateSet {
    pub fn load(source: &TemplateSource) -> Result<Self, TemplateError> {
        let mut templates = HashMap::new();
        for name in PAGE_TEMPLATES {
            templates.insert(name.to_string(), compose(source, name)?);
            log::debug!("Loaded template {}", name);
        }

        Ok(Self { templates })
    }

    pub fn bundled() -> Result<Self, TemplateError> {
        Self::load(&TemplateSource::Bundled)
    }

    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, TemplateError> {
        Self::load(&TemplateSource::Directory(dir.as_ref().to_path_buf()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Render the page template `name` against `view`.
    pub fn render<T: Serialize>(&self, name: &str, view: &T) -> Result<String, TemplateError> {
        let tera = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::Unknown(name.to_string()))?;
        let context = Context::from_serialize(view)?;

        Ok(tera.render(&file_name(name), &context)?)
    }
}

/// Modals first, then the navigation, then the page itself. Each addition
/// replaces anything of the same name added before it, so the page template
/// is the one that ends up in charge.
fn compose(source: &TemplateSource, name: &str) -> Result<Tera, TemplateError> {
    let mut tera = Tera::default();

    for partial in PARTIALS {
        tera.add_raw_template(&file_name(partial), &source.read(partial)?)?;
    }
    tera.add_raw_template(&file_name(name), &source.read(name)?)?;

    Ok(tera)
}

fn file_name(name: &str) -> String {
    format!("{}.html", name)
}
