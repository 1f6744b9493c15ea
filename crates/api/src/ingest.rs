use crate::error::{Error, Result};
use model::Page;

/// Extracts the text of every page that has any. Pages whose text cannot be decoded are
/// skipped rather than failing the whole document.
pub fn load_pdf(source: &str, bytes: &[u8]) -> Result<Vec<Page>> {
    let document = lopdf::Document::load_mem(bytes)?;
    let mut pages = Vec::new();
    for number in document.get_pages().into_keys() {
        let text = match document.extract_text(&[number]) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("skipping page {number} of {source}: {err}");
                continue;
            }
        };

        if text.trim().is_empty() {
            continue;
        }

        pages.push(Page { source: source.into(), number, content: text.into_boxed_str() });
    }

    if pages.is_empty() {
        return Err(Error::NoText);
    }

    log::info!("extracted {} pages from {source}", pages.len());
    Ok(pages)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{load_pdf, Error};
    use lopdf::{
        content::{Content, Operation},
        dictionary, Document, Object, Stream,
    };

    /// Builds a PDF whose pages show the given lines of text.
    pub fn sample_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = lines
            .iter()
            .map(|line| {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 24.into()]),
                        Operation::new("Td", vec![72.into(), 700.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*line)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                let page_id = doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                });
                page_id.into()
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn extracts_text_per_page() {
        let bytes = sample_pdf(&["Mitochondria produce ATP", "Ribosomes build proteins"]);
        let pages = load_pdf("cells.pdf", &bytes).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[1].number, 2);
        assert_eq!(&*pages[0].source, "cells.pdf");
        assert!(pages[0].content.contains("Mitochondria"));
        assert!(pages[1].content.contains("Ribosomes"));
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = load_pdf("notes.txt", b"just some plain text").unwrap_err();
        assert!(matches!(err, Error::UnreadableDocument));
    }
}
