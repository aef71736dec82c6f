use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, html};

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

/// Render page markup into an HTML fragment.
///
/// The output is XHTML-flavoured (`<br />`, `<hr />`, `<img ... />`) and is
/// meant to be fed to the sanitizer, not served directly: raw HTML in the
/// markup is passed through untouched.
pub fn render_markdown(markup: &[u8]) -> String {
    let content = String::from_utf8_lossy(markup);
    let parser = Parser::new_ext(&content, markdown_options());

    let events = parser.map(|event| match event {
        Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(code_language(info))))
        }
        other => other,
    });

    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Reduce a fence info string to the language token, so that
/// ```` ```rust,ignore ```` and ```` ```python title="x" ```` still produce a
/// `language-*` hint the sanitizer can keep.
fn code_language(info: CowStr<'_>) -> CowStr<'_> {
    let lang = info
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or_default();

    if lang.len() == info.len() {
        info
    } else {
        CowStr::from(lang.to_string())
    }
}
