use crate::markdown::render_markdown;
use crate::sanitize::Sanitizer;
use crate::store::Page;

/// Markup in, safe HTML out.
#[derive(Default)]
pub struct Renderer {
    sanitizer: Sanitizer,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            sanitizer: Sanitizer::new(),
        }
    }

    pub fn render(&self, markup: &[u8]) -> String {
        let fragment = render_markdown(markup);
        self.sanitizer.clean(&fragment)
    }

    pub fn render_page(&self, page: &Page) -> String {
        self.render(&page.body)
    }
}
