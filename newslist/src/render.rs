//! Presentation: a toolbar with the application title above one card per news item.

use std::fmt;

/// Display adapter that HTML-escapes the wrapped string via `html_escaper::Escape`.
struct Escape<'a>(&'a str);

impl fmt::Display for Escape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        html_escaper::Escape::escape(&self.0, f, false)
    }
}

use crate::component::{ListState, LoadStatus};
use crate::news::{is_web_url, NewsItem};

/// Render the list for a terminal.
pub fn render_text(title: &str, state: &ListState) -> String {
    let mut out = String::new();
    out.push_str(&format!("== {} ==\n", title));

    if let LoadStatus::Failed(e) = &state.status {
        out.push_str(&format!("! could not load news: {}\n", e));
    }

    if state.news.is_empty() {
        out.push_str("No news.\n");
        return out;
    }

    for item in &state.news {
        out.push('\n');
        out.push_str(&format!("[{}] {}\n", item.id, item.title));
        if let Some(date) = item.published_at {
            out.push_str(&format!("    {}\n", date.format("%Y-%m-%d %H:%M %:z")));
        }
        if !item.body.is_empty() {
            out.push_str(&format!("    {}\n", item.body));
        }
        if let Some(url) = &item.url {
            out.push_str(&format!("    {}\n", url));
        }
    }
    out
}

/// Render the single page served at `/`.
pub fn render_html(title: &str, state: &ListState) -> String {
    let title = Escape(title);
    let mut cards = String::new();

    if let LoadStatus::Failed(e) = &state.status {
        cards.push_str(&format!(
            "<p class=\"error\">Could not load news: {}</p>\n",
            Escape(&e.to_string())
        ));
    }

    if state.news.is_empty() {
        cards.push_str("<p class=\"empty\">No news.</p>\n");
    } else {
        cards.push_str("<ul class=\"news-list\">\n");
        for item in &state.news {
            cards.push_str(&render_card(item));
        }
        cards.push_str("</ul>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<header class=\"toolbar\">{title}</header>\n<main>\n{cards}</main>\n</body>\n</html>\n"
    )
}

fn render_card(item: &NewsItem) -> String {
    let mut card = format!(
        "<li class=\"card\" data-id=\"{}\">\n<h2>{}</h2>\n",
        item.id,
        Escape(&item.title)
    );
    if let Some(date) = item.published_at {
        card.push_str(&format!(
            "<time datetime=\"{}\">{}</time>\n",
            date.to_rfc3339(),
            date.format("%Y-%m-%d %H:%M %:z")
        ));
    }
    if !item.body.is_empty() {
        card.push_str(&format!("<p>{}</p>\n", Escape(&item.body)));
    }
    if let Some(url) = item.url.as_deref().filter(|u| is_web_url(u)) {
        card.push_str(&format!("<a href=\"{0}\">{0}</a>\n", Escape(url)));
    }
    card.push_str("</li>\n");
    card
}
