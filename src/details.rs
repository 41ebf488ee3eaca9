use crate::posts::{Post, PostIndex, normalize};
use std::fmt::Write;

pub const EMPTY_PROMPT: &str = "No itineraries yet. Add a post to start this route.";
pub const UNAVAILABLE_TITLE: &str = "Map unavailable";
pub const UNAVAILABLE_PROMPT: &str = "We couldn't load the world map data. Please refresh the page.";

/// One post entry in the details panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostCard {
    pub title: String,
    pub url: String,
    pub cover: String,
    pub date: String,
    pub location: String,
    pub summary: String,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            url: post.url.clone(),
            cover: post.cover.clone(),
            date: post.date.clone(),
            location: post.location.clone(),
            summary: post.summary.clone(),
        }
    }
}

/// What the details panel shows. Text is kept raw; [`PanelContent::to_html`] escapes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelContent {
    Empty { label: String },
    Posts { label: String, cards: Vec<PostCard> },
    Unavailable,
}

impl PanelContent {
    pub fn count(&self) -> usize {
        match self {
            PanelContent::Posts { cards, .. } => cards.len(),
            _ => 0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PanelContent::Empty { label } | PanelContent::Posts { label, .. } => label,
            PanelContent::Unavailable => UNAVAILABLE_TITLE,
        }
    }

    pub fn header(&self) -> String {
        match self {
            PanelContent::Unavailable => UNAVAILABLE_TITLE.to_string(),
            _ => format!("{} — {} itineraries", self.label(), self.count()),
        }
    }

    /// Markup for the host page. The count header is split into `<h3>` label and
    /// `<span>N itineraries</span>`; [`PanelContent::header`] gives it as one line.
    pub fn to_html(&self) -> String {
        match self {
            PanelContent::Empty { label } => format!(
                "<div class=\"map-empty\">\n  <h3>{}</h3>\n  <p>{}</p>\n</div>\n",
                html_escape(label),
                EMPTY_PROMPT
            ),
            PanelContent::Unavailable => format!(
                "<div class=\"map-empty\">\n  <h3>{UNAVAILABLE_TITLE}</h3>\n  <p>{}</p>\n</div>\n",
                html_escape(UNAVAILABLE_PROMPT)
            ),
            PanelContent::Posts { label, cards } => {
                let mut html = format!(
                    "<div class=\"map-header\">\n  <h3>{}</h3>\n  <span>{} itineraries</span>\n</div>\n<div class=\"map-posts\">\n",
                    html_escape(label),
                    cards.len()
                );
                for card in cards {
                    let _ = write!(
                        html,
                        concat!(
                            "  <article class=\"map-post\">\n",
                            "    <img src=\"{cover}\" alt=\"{title} cover\" loading=\"lazy\" />\n",
                            "    <div>\n",
                            "      <p class=\"map-meta\">{date} · {location}</p>\n",
                            "      <h4><a href=\"{url}\">{title}</a></h4>\n",
                            "      <p>{summary}</p>\n",
                            "    </div>\n",
                            "  </article>\n",
                        ),
                        cover = html_escape(&card.cover),
                        title = html_escape(&card.title),
                        date = html_escape(&card.date),
                        location = html_escape(&card.location),
                        url = html_escape(&card.url),
                        summary = html_escape(&card.summary),
                    );
                }
                html.push_str("</div>\n");
                html
            }
        }
    }
}

/// Builds the panel for a clicked region. Falls back to the label when the key is blank.
pub fn render_details(index: &PostIndex, key: &str, label: &str) -> PanelContent {
    let key = if key.trim().is_empty() { label } else { key };
    let lookup_key = normalize(key);
    let cards: Vec<PostCard> = index
        .lookup(&lookup_key, Some(label))
        .into_iter()
        .map(PostCard::from)
        .collect();
    if cards.is_empty() {
        PanelContent::Empty { label: label.to_string() }
    } else {
        PanelContent::Posts { label: label.to_string(), cards }
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
