//! Allow-list HTML sanitizing for rendered pages.
//!
//! Everything produced from user markup goes through [`Sanitizer::clean`]
//! before it reaches a template. The policy is ammonia's default
//! user-generated-content allow-list with a single addition: a `class`
//! attribute on `<code>` survives when it is a `language-*` highlighting hint.
//! Anything the policy does not know about is stripped, never reported.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static LANGUAGE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^language-[a-zA-Z0-9]+$").expect("language class pattern"));

pub struct Sanitizer {
    policy: ammonia::Builder<'static>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut policy = ammonia::Builder::default();
        policy.add_tag_attributes("code", &["class"]);
        policy.attribute_filter(|element, attribute, value| {
            if attribute == "class" && !(element == "code" && is_language_hint(value)) {
                return None;
            }
            Some(Cow::Borrowed(value))
        });

        Self { policy }
    }

    pub fn clean(&self, html: &str) -> String {
        restore_pre_newlines(&self.policy.clean(html).to_string())
    }
}

/// The HTML parser swallows the newline right after a `<pre>` start tag and
/// the serializer does not write it back, so each pass would lose one more
/// leading line. Put the swallowed newline back in front of any `<pre>`
/// content that starts with one.
///
/// Text and attribute values in serialized output never hold a raw `<` or
/// `"` outside quotes, so tracking quotes inside tags is enough to find the
/// real start tags.
fn restore_pre_newlines(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut tag_start: Option<usize> = None;
    let mut quoted = false;
    let mut copied = 0;

    for (i, c) in html.char_indices() {
        match (tag_start, c) {
            (None, '<') => tag_start = Some(i),
            (Some(_), '"') => quoted = !quoted,
            (Some(start), '>') if !quoted => {
                tag_start = None;
                if is_pre_start(&html[start..=i]) && html[i + 1..].starts_with('\n') {
                    out.push_str(&html[copied..=i]);
                    out.push('\n');
                    copied = i + 1;
                }
            }
            _ => {}
        }
    }

    out.push_str(&html[copied..]);
    out
}

fn is_pre_start(tag: &str) -> bool {
    tag == "<pre>" || tag.starts_with("<pre ")
}

fn is_language_hint(value: &str) -> bool {
    LANGUAGE_CLASS.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::render_markdown;

    fn render(markup: &str) -> String {
        Sanitizer::new().clean(&render_markdown(markup.as_bytes()))
    }

    #[test]
    fn test_plain_markup_survives() {
        let html = render("# Hello\n\nWorld *and* **more**");
        assert!(html.contains("<h1>Hello</h1>"), "{html}");
        assert!(html.contains("<p>World <em>and</em> <strong>more</strong></p>"), "{html}");
    }

    #[test]
    fn test_script_is_removed() {
        for markup in [
            "<script>alert(1)</script>",
            "hello <script>alert(1)</script> world",
            "<SCRIPT SRC=//evil.example/x.js></SCRIPT>",
            "<div><script>alert(1)</script></div>",
        ] {
            let html = render(markup);
            assert!(!html.to_lowercase().contains("<script"), "{markup:?} -> {html}");
            assert!(!html.contains("alert(1)"), "{markup:?} -> {html}");
        }
    }

    #[test]
    fn test_event_handlers_are_removed() {
        let html = render("<img src=x onerror=alert(1)>");
        assert!(!html.contains("onerror"), "{html}");
        assert!(html.contains("<img src=\"x\">"), "{html}");

        let html = render("<p onclick=\"steal()\">hi</p>");
        assert!(!html.contains("onclick"), "{html}");
    }

    #[test]
    fn test_javascript_urls_are_removed() {
        let html = render("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"), "{html}");
    }

    #[test]
    fn test_language_hint_is_kept() {
        let html = render("```rust\nfn main() {}\n```");
        assert!(html.contains("<code class=\"language-rust\">"), "{html}");

        let html = render("```Python3\nprint(1)\n```");
        assert!(html.contains("<code class=\"language-Python3\">"), "{html}");
    }

    #[test]
    fn test_bad_language_hint_is_stripped() {
        for markup in ["```c++\nx\n```", "```my-lang\nx\n```", "```a\"b\nx\n```"] {
            let html = render(markup);
            assert!(!html.contains("class="), "{markup:?} -> {html}");
            assert!(html.contains("<code>"), "{markup:?} -> {html}");
        }
    }

    #[test]
    fn test_class_is_only_allowed_on_code() {
        let sanitizer = Sanitizer::new();
        let html = sanitizer.clean("<p class=\"language-rust\">x</p><span class=\"language-rust\">y</span>");
        assert!(!html.contains("class="), "{html}");

        let html = sanitizer.clean("<code class=\"evil\">z</code>");
        assert_eq!(html, "<code>z</code>");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let sanitizer = Sanitizer::new();
        let inputs = [
            "<p>plain</p>",
            "<a href=\"https://example.com\">link</a>",
            "<img src=x onerror=alert(1)>",
            "<pre><code class=\"language-rust\">let a = 1 &lt; 2;\n</code></pre>",
            "<code class=\"bad class\">x</code>",
            "<div><script>alert(1)</script><b>bold</b></div>",
            "<ul><li>one<li>two</ul>",
            "<table><tr><td>cell</td></tr></table>",
            "unclosed <em>emphasis",
            "<pre>\n\nx</pre>",
            "<pre>\nx</pre>",
            "<pre>\n\n\n</pre>",
            "<pre title=\"t\">\n\ny</pre>",
            "<div><pre>\n\nnested</pre></div>",
            "<textarea>\n\nx</textarea>",
            "<listing>\n\nx</listing>",
            "<img alt=\"<pre>\nx\">",
            "<table><b>foster</b><tr><td>x</td></tr></table>",
            "<a href=\"/a\"><a href=\"/b\">nested</a></a>",
            "<form><form>x</form></form>",
            "<svg><script>alert(1)</script></svg>",
            "<math><mi>x</mi></math>",
            "<p>a<p>b",
            "&lt;script&gt; &amp; &nbsp;",
            "<noscript><p>x</p></noscript>",
        ];

        for input in inputs {
            let once = sanitizer.clean(input);
            let twice = sanitizer.clean(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_pre_keeps_leading_blank_line() {
        let sanitizer = Sanitizer::new();
        assert_eq!(sanitizer.clean("<pre>\n\nx</pre>"), "<pre>\n\nx</pre>");
        assert_eq!(sanitizer.clean("<pre>\nx</pre>"), "<pre>x</pre>");

        // A `<pre>` inside an attribute value is text, not a start tag
        let once = sanitizer.clean("<img alt=\"<pre>\nx\">");
        assert_eq!(once, "<img alt=\"<pre>\nx\">");
    }

    #[test]
    fn test_rendered_raw_html_is_idempotent() {
        let sanitizer = Sanitizer::new();
        let renderer = crate::renderer::Renderer::new();
        let pages = [
            "<pre>\n\ncode\n</pre>",
            "text\n\n<div>\n<pre>\n\nx</pre>\n</div>",
            "<textarea>\n\nnot a form</textarea>",
            "```\n\n\nblank lead\n```",
            "    indented\n\n<table><b>x</b></table>",
            "# T\n\n<details><summary>s</summary>\n\n*body*\n\n</details>",
        ];

        for markup in pages {
            let once = renderer.render(markup.as_bytes());
            assert_eq!(sanitizer.clean(&once), once, "not idempotent for {markup:?}");
        }
    }

    #[test]
    fn test_rendered_pages_are_idempotent() {
        let sanitizer = Sanitizer::new();
        let once = render("# T\n\n- [x](http://e.com)\n\n```go\nx := 1\n```\n\n<iframe src=x></iframe>");
        assert_eq!(sanitizer.clean(&once), once);
    }
}
