use apuntes_core::models::{Document, DocumentFormat};
use apuntes_core::{AppError, DocumentMetadataApi};
use serde::Serialize;

use super::markdown::{escape_text, render_markdown};
use super::url::clean_storage_url;

pub const EMPTY_MESSAGE: &str = "No content available";
pub const PDF_FALLBACK_MESSAGE: &str =
    "The PDF viewer could not load this document. Open it in a new tab or download it.";

/// Links to a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub view_url: String,
    pub download_url: String,
}

impl Attachment {
    fn from_stored(url: &str) -> Self {
        let clean = clean_storage_url(url);
        Self {
            view_url: clean.clone(),
            download_url: clean,
        }
    }
}

/// Presentation of a document, ready to serialize or turn into HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    /// Sanitized Markdown, plus the stored file when there is one
    Markdown {
        html: String,
        attachment: Option<Attachment>,
    },
    PdfViewer {
        viewer_url: String,
        attachment: Attachment,
    },
    /// The embedded viewer failed; offer the links instead
    PdfFallback {
        message: String,
        attachment: Attachment,
    },
    /// `description` is the raw free text; it is escaped when turned into HTML
    Docx {
        download_url: String,
        description: Option<String>,
    },
    /// Free-text content on its own
    Text { html: String },
    Empty { message: String },
}

impl Rendered {
    fn empty() -> Self {
        Rendered::Empty {
            message: EMPTY_MESSAGE.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Rendered::Markdown { .. } => "markdown",
            Rendered::PdfViewer { .. } => "pdf_viewer",
            Rendered::PdfFallback { .. } => "pdf_fallback",
            Rendered::Docx { .. } => "docx",
            Rendered::Text { .. } => "text",
            Rendered::Empty { .. } => "empty",
        }
    }

    /// Downgrade a PDF viewer after the embed failed to load.
    ///
    /// Other presentations are returned unchanged.
    pub fn on_viewer_error(self, reason: &str) -> Self {
        match self {
            Rendered::PdfViewer {
                viewer_url,
                attachment,
            } => {
                tracing::warn!(
                    url = %viewer_url,
                    reason = %reason,
                    "PDF viewer failed, falling back to links"
                );
                Rendered::PdfFallback {
                    message: PDF_FALLBACK_MESSAGE.to_string(),
                    attachment,
                }
            }
            other => other,
        }
    }

    /// HTML fragment for the presentation
    pub fn to_html(&self) -> String {
        match self {
            Rendered::Markdown { html, attachment } => {
                let mut out = format!("<article class=\"note-content\">{}</article>", html);
                if let Some(attachment) = attachment {
                    out.push_str(&attachment_links(attachment));
                }
                out
            }
            Rendered::PdfViewer {
                viewer_url,
                attachment,
            } => format!(
                "<iframe class=\"pdf-viewer\" src=\"{}\" title=\"PDF viewer\"></iframe>{}",
                escape_text(viewer_url),
                attachment_links(attachment)
            ),
            Rendered::PdfFallback {
                message,
                attachment,
            } => format!(
                "<p class=\"render-fallback\">{}</p>{}",
                escape_text(message),
                attachment_links(attachment)
            ),
            Rendered::Docx {
                download_url,
                description,
            } => {
                let mut out = format!(
                    "<div class=\"note-attachment\"><a href=\"{}\" download>Download document</a></div>",
                    escape_text(download_url)
                );
                if let Some(description) = description {
                    out.push_str(&format!(
                        "<p class=\"note-description\">{}</p>",
                        escape_text(description)
                    ));
                }
                out
            }
            Rendered::Text { html } => {
                format!("<article class=\"note-content\">{}</article>", html)
            }
            Rendered::Empty { message } => {
                format!("<p class=\"note-empty\">{}</p>", escape_text(message))
            }
        }
    }
}

fn attachment_links(attachment: &Attachment) -> String {
    format!(
        "<div class=\"note-attachment\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Open in new tab</a> <a href=\"{}\" download>Download</a></div>",
        escape_text(&attachment.view_url),
        escape_text(&attachment.download_url)
    )
}

/// Rendering for one document format
trait RenderStrategy: Sync {
    fn render(&self, document: &Document) -> Rendered;
}

/// Free-text content as sanitized Markdown, or the empty state
fn content_or_empty(document: &Document) -> Rendered {
    match document.content() {
        Some(content) => Rendered::Text {
            html: render_markdown(content),
        },
        None => Rendered::empty(),
    }
}

struct MarkdownStrategy;

impl RenderStrategy for MarkdownStrategy {
    fn render(&self, document: &Document) -> Rendered {
        let attachment = document.storage_url().map(Attachment::from_stored);
        match (document.content(), attachment) {
            (None, None) => Rendered::empty(),
            (content, attachment) => Rendered::Markdown {
                html: content.map(render_markdown).unwrap_or_default(),
                attachment,
            },
        }
    }
}

struct PdfStrategy;

impl RenderStrategy for PdfStrategy {
    fn render(&self, document: &Document) -> Rendered {
        match document.storage_url() {
            Some(url) => {
                let attachment = Attachment::from_stored(url);
                Rendered::PdfViewer {
                    viewer_url: attachment.view_url.clone(),
                    attachment,
                }
            }
            None => content_or_empty(document),
        }
    }
}

struct DocxStrategy;

impl RenderStrategy for DocxStrategy {
    fn render(&self, document: &Document) -> Rendered {
        let description = document.content();
        match document.storage_url() {
            Some(url) => Rendered::Docx {
                download_url: clean_storage_url(url),
                description: description.map(str::to_string),
            },
            None => match description {
                Some(text) => Rendered::Text {
                    html: escape_text(text),
                },
                None => Rendered::empty(),
            },
        }
    }
}

/// No declared format
struct FreeTextStrategy;

impl RenderStrategy for FreeTextStrategy {
    fn render(&self, document: &Document) -> Rendered {
        content_or_empty(document)
    }
}

fn strategy_for(format: Option<DocumentFormat>) -> &'static dyn RenderStrategy {
    match format {
        Some(DocumentFormat::Markdown) => &MarkdownStrategy,
        Some(DocumentFormat::Pdf) => &PdfStrategy,
        Some(DocumentFormat::Docx) => &DocxStrategy,
        None => &FreeTextStrategy,
    }
}

/// Selects a presentation for a persisted document by its declared format
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderingDispatcher;

impl RenderingDispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, document: &Document) -> Rendered {
        let rendered = strategy_for(document.format).render(document);
        tracing::debug!(
            document_id = %document.id,
            format = ?document.format,
            kind = rendered.kind(),
            "Document rendered"
        );
        rendered
    }

    /// Fetch a document record and render it
    pub async fn fetch_and_render(
        &self,
        metadata: &dyn DocumentMetadataApi,
        token: &str,
        id: &str,
    ) -> Result<Rendered, AppError> {
        let document = metadata.get_document(token, id).await?;
        Ok(self.render(&document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{document, MockMetadataApi};

    const SIGNED_PDF: &str =
        "https://storage.test/storage/v1/object/public/apuntes/u1/algebra_abc.pdf?token=secret&exp=1";
    const CLEAN_PDF: &str = "https://storage.test/storage/v1/object/public/apuntes/u1/algebra_abc.pdf";

    #[test]
    fn test_pdf_urls_are_cleaned() {
        let mut doc = document(Some(DocumentFormat::Pdf));
        doc.storage_url = Some(SIGNED_PDF.to_string());

        let rendered = RenderingDispatcher::new().render(&doc);
        let Rendered::PdfViewer {
            ref viewer_url,
            ref attachment,
        } = rendered
        else {
            panic!("expected pdf viewer");
        };
        assert_eq!(viewer_url, CLEAN_PDF);
        assert_eq!(attachment.view_url, CLEAN_PDF);
        assert_eq!(attachment.download_url, CLEAN_PDF);
        assert!(!rendered.to_html().contains("token="));
    }

    #[test]
    fn test_pdf_viewer_error_falls_back_to_links() {
        let mut doc = document(Some(DocumentFormat::Pdf));
        doc.storage_url = Some(SIGNED_PDF.to_string());

        let rendered = RenderingDispatcher::new()
            .render(&doc)
            .on_viewer_error("embed blocked");

        assert_eq!(
            rendered,
            Rendered::PdfFallback {
                message: PDF_FALLBACK_MESSAGE.to_string(),
                attachment: Attachment {
                    view_url: CLEAN_PDF.to_string(),
                    download_url: CLEAN_PDF.to_string(),
                },
            }
        );
        let html = rendered.to_html();
        assert!(html.contains("Open in new tab"));
        assert!(html.contains("download"));
    }

    #[test]
    fn test_pdf_without_url_renders_description() {
        let mut doc = document(Some(DocumentFormat::Pdf));
        doc.content = Some("Only a *summary*".to_string());

        let Rendered::Text { html } = RenderingDispatcher::new().render(&doc) else {
            panic!("expected free text");
        };
        assert!(html.contains("<em>summary</em>"));
    }

    #[test]
    fn test_markdown_without_content_or_url_is_empty() {
        let mut doc = document(Some(DocumentFormat::Markdown));
        doc.content = Some("   ".to_string());
        doc.storage_url = Some(String::new());

        let rendered = RenderingDispatcher::new().render(&doc);
        assert_eq!(
            rendered,
            Rendered::Empty {
                message: EMPTY_MESSAGE.to_string()
            }
        );
        assert!(rendered.to_html().contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_markdown_with_content_and_attachment() {
        let mut doc = document(Some(DocumentFormat::Markdown));
        doc.content = Some("# Intro\n<script>steal()</script>".to_string());
        doc.storage_url = Some("https://storage.test/a.md?sig=1".to_string());

        let Rendered::Markdown { html, attachment } = RenderingDispatcher::new().render(&doc)
        else {
            panic!("expected markdown");
        };
        assert!(html.contains("<h1>Intro</h1>"));
        assert!(!html.contains("script"));
        assert_eq!(
            attachment.map(|a| a.download_url),
            Some("https://storage.test/a.md".to_string())
        );
    }

    #[test]
    fn test_markdown_attachment_only() {
        let mut doc = document(Some(DocumentFormat::Markdown));
        doc.storage_url = Some("https://storage.test/a.md".to_string());

        let rendered = RenderingDispatcher::new().render(&doc);
        assert!(matches!(
            rendered,
            Rendered::Markdown {
                attachment: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_docx_is_download_with_description() {
        let mut doc = document(Some(DocumentFormat::Docx));
        doc.storage_url = Some("https://storage.test/a.docx?x=1".to_string());
        doc.content = Some("<b>notes</b>".to_string());

        let rendered = RenderingDispatcher::new().render(&doc);
        let Rendered::Docx {
            ref download_url,
            ref description,
        } = rendered
        else {
            panic!("expected docx");
        };
        assert_eq!(download_url, "https://storage.test/a.docx");
        assert_eq!(description.as_deref(), Some("<b>notes</b>"));
        let html = rendered.to_html();
        assert!(html.contains("Download document"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_docx_description_serializes_as_plain_text() {
        let mut doc = document(Some(DocumentFormat::Docx));
        doc.storage_url = Some("https://storage.test/a.docx".to_string());
        doc.content = Some("plain notes/here".to_string());

        let rendered = RenderingDispatcher::new().render(&doc);
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["kind"], "docx");
        assert_eq!(json["description"], "plain notes/here");
    }

    #[test]
    fn test_no_format_uses_free_text() {
        let mut doc = document(None);
        doc.content = Some("plain **text**".to_string());
        assert!(matches!(
            RenderingDispatcher::new().render(&doc),
            Rendered::Text { .. }
        ));

        doc.content = None;
        assert!(matches!(
            RenderingDispatcher::new().render(&doc),
            Rendered::Empty { .. }
        ));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(Rendered::Empty {
            message: EMPTY_MESSAGE.to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "empty");
        assert_eq!(json["message"], EMPTY_MESSAGE);
    }

    #[tokio::test]
    async fn test_fetch_and_render() {
        let metadata = MockMetadataApi::new("u1");
        let mut doc = document(Some(DocumentFormat::Pdf));
        doc.storage_url = Some(SIGNED_PDF.to_string());
        metadata.insert(doc);

        let rendered = RenderingDispatcher::new()
            .fetch_and_render(&metadata, "t", "doc-1")
            .await
            .unwrap();
        assert_eq!(rendered.kind(), "pdf_viewer");

        let err = RenderingDispatcher::new()
            .fetch_and_render(&metadata, "t", "missing")
            .await
            .unwrap_err();
        assert_eq!(err, AppError::NotFound("missing".to_string()));
    }
}
