use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use super::layout::{Font, Page, PlacedText, PAGE_HEIGHT, PAGE_WIDTH};

#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
}

/// Maps text to WinAnsiEncoding bytes. Latin-1 characters pass through,
/// anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

fn text_operations(item: &PlacedText) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "rg",
            vec![
                Object::Real(item.color.r),
                Object::Real(item.color.g),
                Object::Real(item.color.b),
            ],
        ),
        Operation::new(
            "Tf",
            vec![
                Object::Name(item.font.resource_name().as_bytes().to_vec()),
                Object::Real(item.size),
            ],
        ),
        Operation::new("Td", vec![Object::Real(item.x), Object::Real(item.y)]),
        Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(&item.text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Serializes laid-out pages into a PDF using the standard Type1 Helvetica family.
pub fn write_pdf(pages: &[Page], info: &DocumentInfo) -> Result<Vec<u8>, String> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page.items.iter().flat_map(text_operations).collect::<Vec<_>>(),
        };
        let encoded = content
            .encode()
            .map_err(|e| format!("failed to encode page content: {}", e))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH),
                Object::Real(PAGE_HEIGHT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(&info.title)),
        "Author" => Object::string_literal(encode_win_ansi(&info.author)),
        "Subject" => Object::string_literal(encode_win_ansi(&info.subject)),
        "Producer" => Object::string_literal("QuizCraft"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| format!("failed to write PDF: {}", e))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::layout::Color;

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "Quiz".to_string(),
            author: "QuizCraft".to_string(),
            subject: "Generated Quiz".to_string(),
        }
    }

    fn page_with(text: &str) -> Page {
        Page {
            items: vec![PlacedText {
                x: 72.0,
                y: 700.0,
                text: text.to_string(),
                font: Font::Bold,
                size: 12.0,
                color: Color::BLACK,
            }],
        }
    }

    #[test]
    fn encodes_latin1_and_replaces_the_rest() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn writes_a_loadable_document() {
        let bytes = write_pdf(&[page_with("Hello"), page_with("World")], &info()).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }

    #[test]
    fn output_is_deterministic() {
        let pages = [page_with("Same")];
        assert_eq!(
            write_pdf(&pages, &info()).unwrap(),
            write_pdf(&pages, &info()).unwrap()
        );
    }
}
