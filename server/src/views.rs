use inkpost_core::Document;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use time::macros::format_description;
use time::Date;

fn display_date(date: Option<Date>) -> Option<String> {
    let format = format_description!("[month repr:long] [day padding:none], [year]");
    date.and_then(|d| d.format(&format).ok())
}

fn layout(site_title: &str, page_title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page_title) }
            }
            body {
                header { a href="/" { (site_title) } }
                main { (content) }
            }
        }
    }
}

pub fn index_page(site_title: &str, posts: &[Document]) -> Markup {
    let content = html! {
        @if posts.is_empty() {
            p class="empty" { "No posts yet." }
        }
        @for post in posts {
            article class="summary" {
                h2 { a href={ "/post/" (post.slug) } { (post.title) } }
                @if let Some(date) = display_date(post.published_at) {
                    time datetime=(post.published_at.map(|d| d.to_string()).unwrap_or_default()) { (date) }
                }
                p { (post.summary) }
            }
        }
    };
    layout(site_title, site_title, content)
}

pub fn post_page(site_title: &str, post: &Document) -> Markup {
    let content = html! {
        article class="post" {
            h1 { (post.title) }
            @if let Some(date) = display_date(post.published_at) {
                time datetime=(post.published_at.map(|d| d.to_string()).unwrap_or_default()) { (date) }
            }
            // body_html is sanitized when the document is parsed
            div class="content" { (PreEscaped(&post.body_html)) }
        }
    };
    layout(site_title, &post.title, content)
}

pub fn not_found_page(site_title: &str) -> Markup {
    let content = html! {
        h1 { "Not found" }
        p { "There is no post at this address." }
    };
    layout(site_title, "Not found", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn doc() -> Document {
        Document {
            title: "<Tom & Jerry>".into(),
            published_at: Some(date!(2024 - 06 - 01)),
            slug: "tom".into(),
            body_html: "<p>trusted</p>\n".into(),
            summary: "a <b>raw</b> summary".into(),
        }
    }

    #[test]
    fn listing_escapes_title_and_summary() {
        let page = index_page("Site", &[doc()]).into_string();
        assert!(page.contains("&lt;Tom &amp; Jerry&gt;"));
        assert!(page.contains("a &lt;b&gt;raw&lt;/b&gt; summary"));
        assert!(page.contains("href=\"/post/tom\""));
        assert!(page.contains("June 1, 2024"));
    }

    #[test]
    fn post_embeds_body_verbatim() {
        let page = post_page("Site", &doc()).into_string();
        assert!(page.contains("<p>trusted</p>"));
        assert!(page.contains("datetime=\"2024-06-01\""));
    }

    #[test]
    fn undated_posts_have_no_time_element() {
        let mut d = doc();
        d.published_at = None;
        assert!(!post_page("Site", &d).into_string().contains("<time"));
    }
}
