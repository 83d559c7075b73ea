use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild};

use super::{DocumentKind, ExtractedText, ExtractionError};

/// One segment per top-level body paragraph, blank paragraphs included.
/// Paragraphs inside tables, headers and footers are not part of the body
/// paragraph list and are ignored.
pub(super) fn extract_docx(payload: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let docx = read_docx(payload).map_err(|e| ExtractionError::corrupt(DocumentKind::Docx, e))?;

    let paragraphs = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        });

    Ok(ExtractedText::from_segments(paragraphs))
}

/// Paragraph → Run → Text. Runs are concatenated with no separator since
/// they are fragments of the same line.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&mut text, &para.children);
    text
}

fn push_children(text: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(text, run),
            ParagraphChild::Hyperlink(link) => push_children(text, &link.children),
            _ => {}
        }
    }
}

fn push_run(text: &mut String, run: &Run) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}
