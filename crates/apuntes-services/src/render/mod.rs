//! Document rendering
//!
//! Maps a persisted document's declared format to a rendering strategy. Stored
//! URLs are cleaned before they are surfaced anywhere.

mod dispatcher;
mod markdown;
mod url;

pub use dispatcher::{
    Attachment, Rendered, RenderingDispatcher, EMPTY_MESSAGE, PDF_FALLBACK_MESSAGE,
};
pub use markdown::{escape_text, render_markdown};
pub use url::clean_storage_url;
