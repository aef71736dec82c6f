use serde::Serialize;

use crate::settings::Settings;
use crate::store::Page;

pub const ADMIN_TITLE: &str = "Administration";

/// Everything the `view`, `admin` and `pages` templates can see.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageView {
    pub title: String,
    /// Sanitized HTML, rendered with `| safe`.
    pub body: String,
    pub pages: Option<Vec<String>>,
    pub system: Settings,
}

impl PageView {
    pub fn assemble(page: &Page, html: String, pages: Option<Vec<String>>, system: Settings) -> Self {
        Self {
            title: page.title.to_string(),
            body: html,
            pages,
            system,
        }
    }

    pub fn admin(system: Settings, pages: Option<Vec<String>>) -> Self {
        Self {
            title: ADMIN_TITLE.to_string(),
            body: String::new(),
            pages,
            system,
        }
    }
}

/// Model for the `edit` template. The body is the raw markup and is left to
/// the template engine to escape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EditView {
    pub title: String,
    pub body: String,
    pub system: Settings,
}

impl EditView {
    pub fn new(page: &Page, system: Settings) -> Self {
        Self {
            title: page.title.to_string(),
            body: String::from_utf8_lossy(&page.body).into_owned(),
            system,
        }
    }
}
