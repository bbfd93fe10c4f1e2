use ego_tree::NodeRef;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use scraper::{Html, Node};
use std::collections::HashSet;
use std::fmt::{self, Display};
use voca_rs::{escape, strip};

lazy_static! {
    static ref HTML_ENTITY: Regex = Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);")
        .expect("Failed to create entity regex");
    static ref ALLOWED_TAGS: HashSet<&'static str> = [
        "p", "br", "em", "strong", "i", "b", "u", "a", "ul", "ol", "li", "span", "h3", "h4",
        "blockquote",
    ]
    .into_iter()
    .collect();
    static ref DROPPED_TAGS: HashSet<&'static str> =
        ["script", "style", "iframe", "object", "embed", "template"]
            .into_iter()
            .collect();
}

// Attributes survive in this order so sanitizer output is deterministic;
// scraper's attribute map does not preserve source order
const ALLOWED_ATTRS: [&str; 4] = ["href", "title", "target", "rel"];

/// Rich text that went through the sanitizer. Constructing one outside this
/// module is deliberately impossible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reverses HTML-entity escaping on fields declared as plain text (titles,
/// names). Decoding only: markup passes through untouched.
pub fn decode_plain_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    HTML_ENTITY
        .replace_all(raw, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body.strip_prefix('#') {
                Some(numeric) => {
                    let (digits, radix) = match numeric
                        .strip_prefix('x')
                        .or_else(|| numeric.strip_prefix('X'))
                    {
                        Some(hex) => (hex, 16),
                        None => (numeric, 10),
                    };

                    u32::from_str_radix(digits, radix)
                        .ok()
                        .and_then(char::from_u32)
                        .map(String::from)
                }
                None => named_entity(body).map(String::from),
            };

            // Unknown entities stay as written
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Allow-list sanitization of untrusted rich text. Script-capable constructs
/// are eliminated, benign formatting survives, broken markup is repaired by
/// the parser. Empty input (or input that sanitizes away entirely) produces
/// nothing to render.
pub fn sanitize_rich_text(raw: &str) -> Option<SafeHtml> {
    if raw.trim().is_empty() {
        return None;
    }

    let fragment = Html::parse_fragment(raw);
    let mut out = String::new();

    // The synthetic <html> wrapper the fragment parser adds is not in the
    // allow-list, so it unwraps like any unknown element
    for child in fragment.tree.root().children() {
        write_node(child, &mut out);
    }

    let sanitized = out.trim();

    if sanitized.is_empty() {
        None
    } else {
        Some(SafeHtml(sanitized.to_string()))
    }
}

/// Strips all markup and decodes entities, for calendar-description export.
pub fn sanitize_to_plain_text(raw: &str) -> String {
    decode_plain_text(&strip::strip_tags(raw)).trim().to_string()
}

fn write_node(node: NodeRef<Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&escape::escape_html(&text.text)),
        Node::Element(element) => {
            let tag = element.name();

            if DROPPED_TAGS.contains(tag) {
                return;
            }

            if !ALLOWED_TAGS.contains(tag) {
                // Unknown wrapper: keep the children, drop the tag
                for child in node.children() {
                    write_node(child, out);
                }
                return;
            }

            out.push('<');
            out.push_str(tag);

            for name in ALLOWED_ATTRS {
                let Some(value) = element.attr(name) else {
                    continue;
                };

                if name == "href" && !is_safe_link(value) {
                    continue;
                }

                out.push_str(&format!(" {}=\"{}\"", name, escape::escape_html(value)));
            }

            out.push('>');

            if tag == "br" {
                return;
            }

            for child in node.children() {
                write_node(child, out);
            }

            out.push_str(&format!("</{}>", tag));
        }
        _ => {}
    }
}

fn is_safe_link(href: &str) -> bool {
    let href = href.trim().to_lowercase();

    if href.starts_with("http://") || href.starts_with("https://") || href.starts_with("mailto:") {
        return true;
    }

    // Relative links carry no scheme at all
    !href.contains(':')
}

fn named_entity(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "aacute" => "á",
        "agrave" => "à",
        "acirc" => "â",
        "atilde" => "ã",
        "ccedil" => "ç",
        "eacute" => "é",
        "egrave" => "è",
        "ecirc" => "ê",
        "iacute" => "í",
        "oacute" => "ó",
        "ocirc" => "ô",
        "otilde" => "õ",
        "uacute" => "ú",
        "uuml" => "ü",
        "Aacute" => "Á",
        "Agrave" => "À",
        "Atilde" => "Ã",
        "Ccedil" => "Ç",
        "Eacute" => "É",
        "Ecirc" => "Ê",
        "Iacute" => "Í",
        "Oacute" => "Ó",
        "Otilde" => "Õ",
        "Uacute" => "Ú",
        "ordf" => "ª",
        "ordm" => "º",
        "deg" => "°",
        "hellip" => "…",
        "ndash" => "–",
        "mdash" => "—",
        "lsquo" => "‘",
        "rsquo" => "’",
        "ldquo" => "“",
        "rdquo" => "”",
        "laquo" => "«",
        "raquo" => "»",
        "euro" => "€",
        "copy" => "©",
        "reg" => "®",
        "trade" => "™",
        "middot" => "·",
        "sect" => "§",
        _ => return None,
    };

    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_decode_basic_entities() {
        assert_eq!(decode_plain_text("A &amp; B"), "A & B");
        assert_eq!(decode_plain_text("&lt;3 &gt; 2&quot;"), "<3 > 2\"");
    }

    #[test_log::test]
    fn should_decode_empty_input_to_empty_string() {
        assert_eq!(decode_plain_text(""), "");
    }

    #[test_log::test]
    fn should_decode_numeric_entities() {
        assert_eq!(decode_plain_text("Caf&#233;"), "Café");
        assert_eq!(decode_plain_text("Caf&#xE9;"), "Café");
        assert_eq!(decode_plain_text("Caf&#Xe9;"), "Café");
    }

    #[test_log::test]
    fn should_decode_portuguese_named_entities() {
        assert_eq!(
            decode_plain_text("M&uacute;sica, p&atilde;o &amp; ma&ccedil;&atilde;"),
            "Música, pão & maçã"
        );
    }

    #[test_log::test]
    fn should_leave_unknown_entities_as_written() {
        assert_eq!(decode_plain_text("&bogus; &x;"), "&bogus; &x;");
    }

    #[test_log::test]
    fn should_never_interpret_markup_when_decoding() {
        assert_eq!(decode_plain_text("<b>negrito</b>"), "<b>negrito</b>");
    }

    #[test_log::test]
    fn should_strip_script_tags_entirely() {
        let safe = sanitize_rich_text("<p>ok</p><script>alert(1)</script>").unwrap();

        assert_eq!(safe.as_str(), "<p>ok</p>");
        assert!(!safe.as_str().contains("script"));
    }

    #[test_log::test]
    fn should_strip_event_handler_attributes() {
        let safe = sanitize_rich_text(r#"<p onclick="evil()" onmouseover="x">texto</p>"#).unwrap();

        assert_eq!(safe.as_str(), "<p>texto</p>");
    }

    #[test_log::test]
    fn should_strip_javascript_urls() {
        let safe = sanitize_rich_text(r#"<a href="javascript:alert(1)">liga</a>"#).unwrap();

        assert_eq!(safe.as_str(), "<a>liga</a>");
    }

    #[test_log::test]
    fn should_keep_benign_formatting() {
        let safe = sanitize_rich_text(
            r#"<p>Um <em>concerto</em> ao ar livre</p><ul><li><a href="https://exemplo.pt" title="bilhetes">bilhetes</a></li></ul>"#,
        )
        .unwrap();

        assert_eq!(
            safe.as_str(),
            r#"<p>Um <em>concerto</em> ao ar livre</p><ul><li><a href="https://exemplo.pt" title="bilhetes">bilhetes</a></li></ul>"#
        );
    }

    #[test_log::test]
    fn should_emit_attributes_in_fixed_order() {
        // Source order is title-first; output order must not depend on it
        let safe =
            sanitize_rich_text(r#"<a title="bilhetes" href="https://exemplo.pt">liga</a>"#)
                .unwrap();

        assert_eq!(
            safe.as_str(),
            r#"<a href="https://exemplo.pt" title="bilhetes">liga</a>"#
        );
    }

    #[test_log::test]
    fn should_drop_style_subtrees() {
        let safe = sanitize_rich_text("<style>p { display: none }</style><p>visível</p>").unwrap();

        assert_eq!(safe.as_str(), "<p>visível</p>");
    }

    #[test_log::test]
    fn should_drop_svg_event_handlers() {
        let safe =
            sanitize_rich_text(r#"<p>ok</p><svg onload="evil()"><circle r="4"></circle></svg>"#)
                .unwrap();

        assert_eq!(safe.as_str(), "<p>ok</p>");
    }

    #[test_log::test]
    fn should_keep_attribute_values_inside_their_quotes() {
        let safe =
            sanitize_rich_text(r#"<a title="&quot;><script>alert(1)</script>">liga</a>"#).unwrap();

        assert!(!safe.as_str().contains("<script"), "{safe}");
        assert!(safe.as_str().contains("&lt;script&gt;"), "{safe}");
    }

    #[test_log::test]
    fn should_unwrap_unknown_elements() {
        let safe = sanitize_rich_text("<div><p>dentro</p></div>").unwrap();

        assert_eq!(safe.as_str(), "<p>dentro</p>");
    }

    #[test_log::test]
    fn should_repair_malformed_markup() {
        let safe = sanitize_rich_text("<p>aberto <em>sem fim").unwrap();

        assert_eq!(safe.as_str(), "<p>aberto <em>sem fim</em></p>");
    }

    #[test_log::test]
    fn should_reescape_text_content() {
        let safe = sanitize_rich_text("<p>Fado &amp; Co</p>").unwrap();

        assert_eq!(safe.as_str(), "<p>Fado &amp; Co</p>");
    }

    #[test_log::test]
    fn should_sanitize_empty_input_to_nothing() {
        assert!(sanitize_rich_text("").is_none());
        assert!(sanitize_rich_text("   ").is_none());
        assert!(sanitize_rich_text("<script>alert(1)</script>").is_none());
    }

    #[test_log::test]
    fn should_strip_to_plain_text_for_export() {
        assert_eq!(
            sanitize_to_plain_text("<p>Um <em>concerto</em> &agrave; noite</p> "),
            "Um concerto à noite"
        );
        assert_eq!(sanitize_to_plain_text(""), "");
    }
}
