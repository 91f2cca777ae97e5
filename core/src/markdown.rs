//! Markdown to HTML conversion.
//!
//! Rendering follows CommonMark through `pulldown-cmark`, with two changes that
//! make the output safe to embed verbatim in a page:
//!
//! - raw HTML (block or inline) is replaced with [`RAW_HTML_OMITTED`]
//! - link and image destinations using a scriptable scheme are blanked
//!
//! ```rust
//! use inkpost_core::markdown::render_markdown;
//!
//! let html = render_markdown("# Hi\n\n<script>alert(1)</script>\n").unwrap();
//! assert!(html.contains("<h1>Hi</h1>"));
//! assert!(!html.contains("<script>"));
//! ```

use pulldown_cmark::{html, CowStr, Event, Parser, Tag};

/// Placeholder emitted in place of raw HTML found in the source.
pub const RAW_HTML_OMITTED: &str = "<!-- raw HTML omitted -->";

/// Render a markdown body to sanitized HTML.
///
/// Writing into a `String` cannot fail in practice; the `fmt::Error` is only
/// surfaced because the writer API returns one.
pub fn render_markdown(body: &str) -> Result<String, std::fmt::Error> {
    let mut placeholder_sent = false;
    // One placeholder per HTML block, however many lines it spans.
    let events = Parser::new(body).filter_map(move |event| match event {
        Event::Start(Tag::HtmlBlock) => {
            placeholder_sent = false;
            Some(event)
        }
        Event::Html(_) if placeholder_sent => None,
        Event::Html(_) => {
            placeholder_sent = true;
            Some(Event::Html(CowStr::Borrowed(RAW_HTML_OMITTED)))
        }
        other => Some(sanitize_event(other)),
    });
    let mut out = String::with_capacity(body.len() + body.len() / 2);
    html::write_html_fmt(&mut out, events)?;
    Ok(out)
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::InlineHtml(_) => Event::InlineHtml(CowStr::Borrowed(RAW_HTML_OMITTED)),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_url(dest_url, false),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_url(dest_url, true),
            title,
            id,
        }),
        other => other,
    }
}

fn sanitize_url(url: CowStr<'_>, is_image: bool) -> CowStr<'_> {
    if is_dangerous_url(&url, is_image) {
        CowStr::Borrowed("")
    } else {
        url
    }
}

/// Scriptable or local-file schemes. Inline `data:` images of common raster
/// types are still allowed for `<img>`.
pub fn is_dangerous_url(url: &str, is_image: bool) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("data:") {
        let safe_image = ["data:image/png", "data:image/gif", "data:image/jpeg", "data:image/webp"]
            .iter()
            .any(|prefix| lower.starts_with(prefix));
        return !(is_image && safe_image);
    }
    ["javascript:", "vbscript:", "file:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_common_blocks() {
        let md = "## Intro\n\nSome *emphasis* and **strong**.\n\n- one\n- two\n\n```\nlet x = 1;\n```\n";
        let html = render_markdown(md).unwrap();
        assert!(html.contains("<h2>Intro</h2>"));
        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains("<strong>strong</strong>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<pre><code>let x = 1;\n</code></pre>"));
    }

    #[test]
    fn strips_raw_html() {
        let html = render_markdown("before <b onclick=\"x()\">bold</b> after\n").unwrap();
        assert!(!html.contains("onclick"));
        assert!(html.contains(RAW_HTML_OMITTED));
    }

    #[test]
    fn html_block_gets_one_placeholder() {
        let md = "<div>\n<p>one</p>\n<p>two</p>\n</div>\n\nafter\n";
        let html = render_markdown(md).unwrap();
        assert_eq!(html.matches(RAW_HTML_OMITTED).count(), 1);
        assert!(!html.contains("<div>"));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn separate_html_blocks_each_get_a_placeholder() {
        let md = "<div>a</div>\n\ntext\n\n<section>\nb\n</section>\n";
        let html = render_markdown(md).unwrap();
        assert_eq!(html.matches(RAW_HTML_OMITTED).count(), 2);
    }

    #[test]
    fn blanks_script_links() {
        let html = render_markdown("[click](javascript:alert(1))\n").unwrap();
        assert!(html.contains("<a href=\"\">click</a>"));
    }

    #[test]
    fn keeps_ordinary_links() {
        let html = render_markdown("[home](https://example.com/)\n").unwrap();
        assert!(html.contains("<a href=\"https://example.com/\">home</a>"));
    }

    #[test]
    fn data_urls_only_for_images() {
        assert!(!is_dangerous_url("data:image/png;base64,AAAA", true));
        assert!(is_dangerous_url("data:image/png;base64,AAAA", false));
        assert!(is_dangerous_url("data:text/html,<b>x</b>", true));
        assert!(is_dangerous_url("  JavaScript:void(0)", false));
        assert!(!is_dangerous_url("/post/hello", false));
    }
}
