use serde::Serialize;
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// One parsed post, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    /// `None` when the header had no date or an unparseable one. Sorts as the oldest.
    #[serde(with = "iso_date::option")]
    pub published_at: Option<Date>,
    /// Source base name without its extension; the only lookup key.
    pub slug: String,
    /// Sanitized HTML. Embed without further escaping.
    pub body_html: String,
    /// Preview cut from the raw markdown body, not from the HTML.
    pub summary: String,
}
