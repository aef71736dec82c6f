pub mod markdown;
pub mod renderer;
pub mod sanitize;
pub mod settings;
pub mod store;
pub mod template;
pub mod title;
pub mod view;

// Re-export main types
pub use markdown::render_markdown;
pub use renderer::Renderer;
pub use sanitize::Sanitizer;
pub use settings::{Settings, SettingsError, SettingsStore};
pub use store::{Deleted, Page, PageStore, StoreError};
pub use template::{TemplateError, TemplateSet, TemplateSource};
pub use title::{FRONT_PAGE, Title, TitleError};
pub use view::{EditView, PageView};
