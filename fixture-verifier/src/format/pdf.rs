//! PDF decoder: page count plus extracted text, via `lopdf`.

use lopdf::Document;
#[cfg(test)]
use lopdf::dictionary;

use crate::error::VerifyError;
use crate::format::FormatKind;

/// Page count and per-page text of a PDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfContent {
    /// Number of pages in the page tree.
    pub page_count: usize,
    /// Extracted text, one entry per page in page order.
    pub pages: Vec<String>,
}

impl PdfContent {
    /// Whether the extracted text of any page contains `needle` verbatim.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.pages.iter().any(|page| page.contains(needle))
    }
}

/// Load a PDF from memory and extract every page's text.
///
/// The page count comes from the page tree alone. A page whose text cannot
/// be extracted (for example a composite font without a `ToUnicode` map) is
/// logged and kept as an empty string.
///
/// # Errors
///
/// Returns a decode error if the document cannot be parsed.
pub fn decode_pdf(bytes: &[u8], resource: &str) -> Result<PdfContent, VerifyError> {
    let document =
        Document::load_mem(bytes).map_err(|e| VerifyError::decode(resource, FormatKind::Pdf, e))?;

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    let pages: Vec<String> = page_numbers
        .iter()
        .map(|&number| {
            document.extract_text(&[number]).unwrap_or_else(|e| {
                tracing::warn!(resource, page = number, error = %e, "pdf page text not extracted");
                String::new()
            })
        })
        .collect();

    tracing::trace!(resource, pages = pages.len(), "pdf decoded");
    Ok(PdfContent {
        page_count: page_numbers.len(),
        pages,
    })
}

/// Build a small PDF with one Courier text line per page (test helper).
#[cfg(test)]
pub(crate) fn build_test_pdf(page_texts: &[&str]) -> Vec<u8> {
    build_test_pdf_with_font(
        page_texts,
        lopdf::dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        },
    )
}

#[cfg(test)]
fn build_test_pdf_with_font(page_texts: &[&str], font: lopdf::Dictionary) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(font);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap();
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_pdf_counts_pages_and_extracts_text() {
        let bytes = build_test_pdf(&["Overview", "Writing Tests 123", "Appendix"]);
        let pdf = decode_pdf(&bytes, "guide.pdf").unwrap();
        assert_eq!(pdf.page_count, 3);
        assert_eq!(pdf.pages.len(), 3);
        assert!(pdf.contains("123"));
        assert!(pdf.pages[1].contains("Writing Tests"));
        assert!(!pdf.contains("456"));
    }

    #[test]
    fn test_decode_pdf_keeps_page_count_when_text_extraction_fails() {
        let bytes = build_test_pdf_with_font(
            &["one", "two", "three"],
            lopdf::dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => "Courier",
                "Encoding" => "Identity-H",
            },
        );
        let pdf = decode_pdf(&bytes, "glyphs.pdf").unwrap();
        assert_eq!(pdf.page_count, 3);
        assert_eq!(pdf.pages.len(), 3);
    }

    #[test]
    fn test_decode_pdf_rejects_garbage() {
        let err = decode_pdf(b"definitely not a pdf", "broken.pdf").unwrap_err();
        assert!(
            matches!(err, VerifyError::Decode { kind: FormatKind::Pdf, ref resource, .. } if resource == "broken.pdf"),
            "got: {err}"
        );
    }
}
