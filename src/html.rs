//! HTML text helpers.
//!
//! Rubric text is authored as HTML and may arrive entity-encoded.
//! Entity decoding goes through `html-escape`, which implements the
//! HTML named/decimal/hex reference rules and leaves malformed references
//! as literal text.

/// Decode character references (`&amp;`, `&#39;`, `&#x41;`, ...)
pub fn unescape_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Reduce an HTML fragment to display text.
///
/// Tags are dropped, block-level closers and `<br>` become line breaks,
/// runs of blank lines collapse, then entities are decoded.
pub fn to_plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars();

    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }

        if !opens_tag(chars.as_str()) {
            out.push('<');
            continue;
        }

        let mut tag = String::new();
        let mut closed = false;
        for t in chars.by_ref() {
            if t == '>' {
                closed = true;
                break;
            }
            tag.push(t);
        }

        if !closed {
            // Stray '<' with no end, keep it as text
            out.push('<');
            out.push_str(&tag);
            break;
        }

        if breaks_line(&tag) {
            out.push('\n');
        }
    }

    let lines: Vec<String> = out
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();

    unescape_html_entities(&lines.join("\n"))
}

/// Whether the text after a `<` starts a markup tag.
///
/// Comments and doctypes (`<!`) always do. Otherwise the name must be an
/// element rubric text uses, followed by whitespace, `/` or `>`, so that
/// comparisons like `x<y and y>z` stay text.
fn opens_tag(rest: &str) -> bool {
    if rest.starts_with('!') {
        return true;
    }

    let body = rest.strip_prefix('/').unwrap_or(rest);
    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    let (name, after) = body.split_at(name_len);
    let terminated = after.starts_with(|c: char| c.is_whitespace() || c == '/' || c == '>');

    terminated && is_element(&name.to_ascii_lowercase())
}

fn is_element(name: &str) -> bool {
    matches!(
        name,
        "a" | "abbr"
            | "b"
            | "blockquote"
            | "br"
            | "caption"
            | "center"
            | "code"
            | "dd"
            | "div"
            | "dl"
            | "dt"
            | "em"
            | "font"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "hr"
            | "i"
            | "img"
            | "li"
            | "mark"
            | "ol"
            | "p"
            | "pre"
            | "q"
            | "s"
            | "section"
            | "small"
            | "span"
            | "strike"
            | "strong"
            | "sub"
            | "sup"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
            | "u"
            | "ul"
    )
}

fn breaks_line(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match name.as_str() {
        "br" => true,
        "p" | "div" | "li" | "ul" | "ol" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "tr" => {
            tag.starts_with('/')
        }
        _ => false,
    }
}
