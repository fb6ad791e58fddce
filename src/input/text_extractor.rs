//! Text extraction from various file formats

use crate::error::{AtsError, Result};
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use log::{debug, warn};
use pulldown_cmark::{html, Parser};
use regex::Regex;

/// Turns the raw bytes of a document into plain text.
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Concatenate page (or paragraph) texts in order, one newline after each.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref());
        text.push('\n');
    }
    text
}

pub struct PdfExtractor;

impl PdfExtractor {
    fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| AtsError::ExtractionFailure(format!("Failed to open PDF: {}", e)))?;

        let pages = document.get_pages();
        debug!("PDF has {} pages", pages.len());

        // get_pages is keyed by page number, so iteration follows reading order
        pages
            .keys()
            .map(|page_number| {
                // lopdf already ends each text object with a newline; the page
                // separator is added by join_pages
                document
                    .extract_text(&[*page_number])
                    .map(|text| text.trim_end_matches(['\r', '\n']).to_string())
                    .map_err(|e| {
                        AtsError::ExtractionFailure(format!(
                            "Failed to extract text from page {}: {}",
                            page_number, e
                        ))
                    })
            })
            .collect()
    }

    fn extract_whole(bytes: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed inputs instead of returning an error
        let outcome = quietly(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| AtsError::ExtractionFailure("PDF parser aborted on malformed input".to_string()))?;

        outcome
            .map(|text| text.trim_end_matches(['\r', '\n']).to_string())
            .map_err(|e| AtsError::ExtractionFailure(format!("Failed to extract text from PDF: {}", e)))
    }
}

/// Run `f`, catching a panic without the default hook printing it to stderr.
/// The previous hook is restored before returning.
fn quietly<F, R>(f: F) -> std::thread::Result<R>
where
    F: FnOnce() -> R + std::panic::UnwindSafe,
{
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    let outcome = std::panic::catch_unwind(f);
    std::panic::set_hook(previous);
    outcome
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        match Self::extract_pages(bytes) {
            Ok(pages) => Ok(join_pages(pages)),
            Err(e) => {
                warn!("Page-wise PDF extraction failed ({}), falling back to pdf-extract", e);
                let text = Self::extract_whole(bytes)?;
                Ok(join_pages([text]))
            }
        }
    }
}

pub struct DocxExtractor;

impl DocxExtractor {
    fn paragraph_text(paragraph: &Paragraph) -> String {
        let mut text = String::new();
        Self::collect_children(&paragraph.children, &mut text);
        text
    }

    fn collect_children(children: &[ParagraphChild], text: &mut String) {
        for child in children {
            match child {
                ParagraphChild::Run(run) => {
                    for run_child in &run.children {
                        match run_child {
                            RunChild::Text(t) => text.push_str(&t.text),
                            RunChild::Tab(_) => text.push('\t'),
                            RunChild::Break(_) => text.push('\n'),
                            _ => {}
                        }
                    }
                }
                ParagraphChild::Hyperlink(link) => Self::collect_children(&link.children, text),
                _ => {}
            }
        }
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| AtsError::ExtractionFailure(format!("Failed to read DOCX: {}", e)))?;

        // Only body-level paragraphs, tables are not flattened
        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(paragraph) => Some(Self::paragraph_text(paragraph)),
                _ => None,
            })
            .collect();

        debug!("DOCX has {} paragraphs", paragraphs.len());
        Ok(join_pages(paragraphs))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = String::from_utf8_lossy(bytes);

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        self.html_to_text(&html_output)
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> Result<String> {
        let tag = Regex::new(r"<[^>]*>")
            .map_err(|e| AtsError::ExtractionFailure(format!("Invalid tag pattern: {}", e)))?;

        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n");
        let stripped = tag.replace_all(&text, "");

        // Entities are decoded after tag stripping so "&lt;" text is not mistaken for a tag
        let lines: Vec<String> = stripped
            .lines()
            .map(|line| {
                line.trim()
                    .replace("&nbsp;", " ")
                    .replace("&lt;", "<")
                    .replace("&gt;", ">")
                    .replace("&quot;", "\"")
                    .replace("&#39;", "'")
                    .replace("&amp;", "&")
            })
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}
