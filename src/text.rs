use html_escape::decode_html_entities;
use log::debug;
use scraper::Html;

/// Decode entities, strip markup, percent-decode and collapse whitespace.
///
/// Never fails; anything that cannot be decoded is kept as-is.
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let mut decoded = html_text(raw);

    if decoded.contains('%') {
        match urlencoding::decode(&decoded) {
            Ok(unescaped) => decoded = unescaped.into_owned(),
            Err(e) => debug!("Keeping percent-encoded text '{}': {}", decoded, e),
        }
    }

    collapse_whitespace(&decoded)
}

/// Text content of `raw` read as an HTML body
fn html_text(raw: &str) -> String {
    if !raw.contains('<') {
        return decode_html_entities(raw).into_owned();
    }
    let fragment = Html::parse_fragment(raw);
    fragment.root_element().text().collect::<String>()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_named_and_numeric_entities() {
        assert_eq!(normalize("Mac &amp; Cheese"), "Mac & Cheese");
        assert_eq!(normalize("Cr&#232;me br&#xFB;l&eacute;e"), "Crème brûlée");
    }

    #[test]
    fn test_strips_tags() {
        assert_eq!(
            normalize("<p>Fluffy <strong>buttermilk</strong> pancakes</p>"),
            "Fluffy buttermilk pancakes"
        );
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(normalize("Jalape%C3%B1o%20poppers"), "Jalapeño poppers");
        // lone percent signs survive
        assert_eq!(normalize("1 cup 2% milk"), "1 cup 2% milk");
    }

    #[test]
    fn test_invalid_percent_sequence_keeps_text() {
        // %FF is not valid UTF-8 on its own
        assert_eq!(normalize("100%FF pure"), "100%FF pure");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  2 \n\t cups   flour  "), "2 cups flour");
        assert_eq!(normalize("a&nbsp;&nbsp;b"), "a b");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n"), "");
    }
}
