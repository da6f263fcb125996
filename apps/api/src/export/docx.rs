//! Single-section Word document: one level-1 heading followed by one paragraph.

use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Run, Style, StyleType};

use super::ExportError;

pub const OPTIMIZED_RESUME_HEADING: &str = "Optimized Resume (ATS)";

/// Builds the document in memory. Source line breaks are kept as soft breaks in the paragraph.
pub fn render_docx(heading: &str, body: &str) -> Result<Vec<u8>, ExportError> {
    let mut run = Run::new();
    for (i, line) in body.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }

    let mut cursor = Cursor::new(Vec::new());
    Docx::new()
        .add_style(
            Style::new("Heading1", StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_paragraph(
            Paragraph::new()
                .style("Heading1")
                .add_run(Run::new().add_text(heading)),
        )
        .add_paragraph(Paragraph::new().add_run(run))
        .build()
        .pack(&mut cursor)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(cursor.into_inner())
}
