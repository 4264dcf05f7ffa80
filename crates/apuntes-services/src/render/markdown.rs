use pulldown_cmark::{html, Options, Parser};

/// Render Markdown to HTML with script-bearing constructs removed.
///
/// Raw HTML in the source passes through the parser and is then sanitized:
/// `<script>` elements, event-handler attributes and `javascript:` URLs are dropped.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options);
    let mut unsafe_html = String::new();
    html::push_html(&mut unsafe_html, parser);

    ammonia::clean(&unsafe_html)
}

/// Escape text for use as HTML content or a quoted attribute value
pub fn escape_text(text: &str) -> String {
    ammonia::clean_text(text)
}
