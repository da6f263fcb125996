//! Flat-text PDF export: A4, Helvetica 12pt, word-wrapped, automatic page breaks.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::font_metrics::wrap_lines;
use super::ExportError;

// A4 in points, 10mm side/top margins, 10mm line height, 15mm bottom break margin.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_SIDE: i64 = 28;
const MARGIN_TOP: i64 = 28;
const MARGIN_BOTTOM: i64 = 43;
const LINE_HEIGHT: i64 = 28;
const FONT_SIZE: i64 = 12;
/// Offset from the top of a line cell to the text baseline.
const BASELINE_OFFSET: i64 = 18;

pub const LINES_PER_PAGE: usize =
    ((PAGE_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) / LINE_HEIGHT) as usize;

/// Renders `text` into a paginated PDF. Always produces at least one page.
pub fn render_text_pdf(text: &str) -> Result<Vec<u8>, ExportError> {
    let text_width = (PAGE_WIDTH - 2 * MARGIN_SIDE) as f32;
    let lines = wrap_lines(&sanitize(text), FONT_SIZE as f32, text_width);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![&[]]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };
    for chunk in chunks {
        let page_id = add_page(&mut doc, pages_id, chunk)?;
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
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(out)
}

fn add_page(doc: &mut Document, pages_id: ObjectId, lines: &[String]) -> Result<ObjectId, ExportError> {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline = PAGE_HEIGHT - MARGIN_TOP - i as i64 * LINE_HEIGHT - BASELINE_OFFSET;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec!["F1".into(), Object::Integer(FONT_SIZE)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Integer(MARGIN_SIDE), Object::Integer(baseline)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(latin1_bytes(line))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations }
        .encode()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// Tabs become spaces; other control characters are dropped.
fn sanitize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            '\n' => Some('\n'),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// The base-14 font only covers Latin-1; anything else prints as `?`.
fn latin1_bytes(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
