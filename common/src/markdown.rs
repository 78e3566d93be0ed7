//! Markdown to HTML for untrusted text.
//!
//! Student answers and AI feedback are external input. They are rendered as
//! markdown only: the pipeline is
//!
//! 1. `normalize_text` (line endings, leading BOM / zero-width space),
//! 2. `pulldown_cmark` parsing,
//! 3. `sanitize`, an allow-list over parser events,
//! 4. `pulldown_cmark::html::push_html`, which escapes all text and attributes.
//!
//! The output of `render` is safe to embed directly into a page.
//!
//! `text_lines` runs the same pipeline but yields styled plain-text lines for
//! outputs that cannot take HTML, such as the PDF exports.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

/// URL schemes a link or image may point at. Scheme-less (relative) URLs are also allowed.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

const PARSER_OPTIONS: Options = Options::ENABLE_TABLES.union(Options::ENABLE_STRIKETHROUGH);

/// Renders markdown text into sanitized HTML.
pub fn render(text: &str) -> String {
    let text = normalize_text(text);
    let parser = Parser::new_ext(&text, PARSER_OPTIONS);
    let events = sanitize(parser).map(|event| match event {
        // Extracted answers are line oriented; keep their line breaks.
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut html_output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut html_output, events);
    html_output
}

/// A piece of text with the inline styles that apply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: false,
            emphasis: false,
        }
    }
}

/// Flattens markdown into lines of styled runs.
///
/// Block ends and line breaks start a new line, list items get a bullet,
/// table cells are separated by two spaces. Links keep their text only and
/// raw HTML stays literal text, exactly as in `render`.
pub fn text_lines(text: &str) -> Vec<Vec<TextRun>> {
    let text = normalize_text(text);
    let mut lines = Vec::new();
    let mut current: Vec<TextRun> = Vec::new();
    let (mut strong, mut emphasis) = (0usize, 0usize);

    for event in sanitize(Parser::new_ext(&text, PARSER_OPTIONS)) {
        match event {
            Event::Start(Tag::Strong) => strong += 1,
            Event::End(TagEnd::Strong) => strong = strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => emphasis += 1,
            Event::End(TagEnd::Emphasis) => emphasis = emphasis.saturating_sub(1),
            Event::Start(Tag::Item) => current.push(TextRun::plain("\u{2022} ")),
            Event::Text(raw) | Event::Code(raw) => {
                for (i, piece) in raw.split('\n').enumerate() {
                    if i > 0 {
                        lines.push(std::mem::take(&mut current));
                    }
                    if !piece.is_empty() {
                        current.push(TextRun {
                            text: piece.to_string(),
                            strong: strong > 0,
                            emphasis: emphasis > 0,
                        });
                    }
                }
            }
            Event::SoftBreak | Event::HardBreak => lines.push(std::mem::take(&mut current)),
            Event::End(TagEnd::TableCell) => current.push(TextRun::plain("  ")),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableHead
                | TagEnd::TableRow,
            ) => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// What happens to a start tag and its matching end tag.
#[derive(Debug, Clone, Copy)]
enum Disposition {
    Keep,
    /// Drop the tag itself, keep its children.
    Unwrap,
    /// Raw HTML blocks become plain paragraphs of escaped text.
    AsParagraph,
}

/// Allow-list stage between the parser and the HTML writer.
///
/// - raw HTML (block or inline) is turned into text, so it is escaped on output;
/// - tags outside the allow-list are unwrapped;
/// - heading ids/classes/attributes are dropped;
/// - links and images whose URL scheme is not allowed are unwrapped, leaving
///   the link text or the image's alt text.
pub fn sanitize<'a, I>(events: I) -> impl Iterator<Item = Event<'a>>
where
    I: IntoIterator<Item = Event<'a>>,
{
    let mut open: Vec<Disposition> = Vec::new();
    events.into_iter().filter_map(move |event| match event {
        Event::Start(tag) => {
            let (disposition, kept) = classify(tag);
            open.push(disposition);
            kept.map(Event::Start)
        }
        Event::End(end) => match open.pop() {
            Some(Disposition::Keep) => Some(Event::End(end)),
            Some(Disposition::AsParagraph) => Some(Event::End(TagEnd::Paragraph)),
            Some(Disposition::Unwrap) | None => None,
        },
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::InlineMath(raw) | Event::DisplayMath(raw) => Some(Event::Text(raw)),
        other => Some(other),
    })
}

fn classify(tag: Tag<'_>) -> (Disposition, Option<Tag<'_>>) {
    let url_ok = match &tag {
        Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => is_safe_url(dest_url),
        _ => true,
    };

    match tag {
        Tag::Paragraph
        | Tag::BlockQuote(_)
        | Tag::CodeBlock(_)
        | Tag::List(_)
        | Tag::Item
        | Tag::Emphasis
        | Tag::Strong
        | Tag::Strikethrough
        | Tag::Table(_)
        | Tag::TableHead
        | Tag::TableRow
        | Tag::TableCell => (Disposition::Keep, Some(tag)),
        Tag::Heading { level, .. } => (
            Disposition::Keep,
            Some(Tag::Heading {
                level,
                id: None,
                classes: Vec::new(),
                attrs: Vec::new(),
            }),
        ),
        Tag::Link { .. } | Tag::Image { .. } if url_ok => (Disposition::Keep, Some(tag)),
        Tag::HtmlBlock => (Disposition::AsParagraph, Some(Tag::Paragraph)),
        _ => (Disposition::Unwrap, None),
    }
}

/// True for relative URLs and for absolute URLs with an allowed scheme.
pub fn is_safe_url(url: &str) -> bool {
    // Browsers skip whitespace and control characters inside a scheme.
    let compact: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    let scheme_end = compact.find(':');
    let path_start = compact.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(path)) if path < colon => true,
        (Some(colon), _) => {
            let scheme = compact[..colon].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        (None, _) => true,
    }
}

/// Normalizes line endings and trims invisible characters at the start.
/// Converts CRLF and CR to LF. Removes BOM / zero-width spaces at the beginning.
pub fn normalize_text(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim_start_matches(['\u{feff}', '\u{200b}'])
        .to_string()
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use in HTML text or attribute values.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
