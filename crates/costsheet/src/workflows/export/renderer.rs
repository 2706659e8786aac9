use std::fmt::Debug;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::document::{FooterLine, Table, TabularDocument};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("pdf backend failed: {0}")]
    Backend(String),
    #[error("render task stopped before finishing: {0}")]
    Task(String),
}

/// Turns a tabular document into the bytes of a downloadable file.
pub trait DocumentRenderer: Debug + Send + Sync {
    fn content_type(&self) -> mime::Mime;
    fn render(&self, document: &TabularDocument) -> Result<Vec<u8>, RenderError>;
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 6.0;
const TABLE_GAP: f32 = 5.0;
const AMOUNT_COLUMN: f32 = 0.7;

/// A4 PDF output using the built-in Helvetica faces.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfRenderer;

impl DocumentRenderer for PdfRenderer {
    fn content_type(&self) -> mime::Mime {
        mime::APPLICATION_PDF
    }

    fn render(&self, document: &TabularDocument) -> Result<Vec<u8>, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            printable(&document.title),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1".to_string(),
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(backend)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(backend)?;

        let mut cursor = PageCursor {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT - MARGIN - 6.0,
            pages: 1,
        };

        cursor.text(&document.title, TITLE_SIZE, MARGIN, &bold);
        cursor.advance(ROW_HEIGHT + TABLE_GAP);

        for table in &document.tables {
            draw_table(&mut cursor, table, &regular, &bold);
            cursor.advance(TABLE_GAP);
        }

        if let Some(FooterLine { label, value }) = &document.footer {
            cursor.ensure_room();
            cursor.text(label, BODY_SIZE + 1.0, MARGIN, &bold);
            cursor.text(value, BODY_SIZE + 1.0, amount_x(), &bold);
        }

        drop(cursor);
        doc.save_to_bytes().map_err(backend)
    }
}

fn backend(err: impl std::fmt::Display) -> RenderError {
    RenderError::Backend(err.to_string())
}

fn amount_x() -> f32 {
    MARGIN + (PAGE_WIDTH - 2.0 * MARGIN) * AMOUNT_COLUMN
}

fn column_offsets(columns: usize) -> Vec<f32> {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    match columns {
        0 => Vec::new(),
        2 => vec![MARGIN, amount_x()],
        n => (0..n)
            .map(|index| MARGIN + usable * index as f32 / n as f32)
            .collect(),
    }
}

fn draw_table(
    cursor: &mut PageCursor<'_>,
    table: &Table,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    let offsets = column_offsets(table.headers.len());

    cursor.ensure_room();
    for (header, x) in table.headers.iter().zip(&offsets) {
        cursor.text(header, BODY_SIZE, *x, bold);
    }
    cursor.advance(ROW_HEIGHT);

    for row in &table.rows {
        if cursor.ensure_room() {
            for (header, x) in table.headers.iter().zip(&offsets) {
                cursor.text(header, BODY_SIZE, *x, bold);
            }
            cursor.advance(ROW_HEIGHT);
        }
        for (cell, x) in row.iter().zip(&offsets) {
            cursor.text(cell, BODY_SIZE, *x, regular);
        }
        cursor.advance(ROW_HEIGHT);
    }
}

struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl PageCursor<'_> {
    fn text(&self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer
            .use_text(printable(text), size, Mm(x), Mm(self.y), font);
    }

    fn advance(&mut self, height: f32) {
        self.y -= height;
    }

    /// Starts a new page when the next row would cross the bottom margin.
    fn ensure_room(&mut self) -> bool {
        if self.y >= MARGIN + ROW_HEIGHT {
            return false;
        }
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        true
    }
}

/// The built-in fonts only cover single-byte text.
fn printable(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '×' => 'x',
            ch if ch.is_ascii() && !ch.is_ascii_control() => ch,
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::export::document::DocumentKind;

    fn document(rows: usize) -> TabularDocument {
        TabularDocument {
            kind: DocumentKind::Inventory,
            title: "Terra - Inventory".to_string(),
            file_name: "Terra_Inventory.pdf".to_string(),
            tables: vec![Table::new(
                ["Unit No", "Size", "Type", "Possession", "Payment"],
                (0..rows)
                    .map(|index| {
                        vec![
                            format!("T-{index}"),
                            "200".to_string(),
                            "Plot".to_string(),
                            "2027".to_string(),
                            "CLP".to_string(),
                        ]
                    })
                    .collect(),
            )],
            footer: Some(FooterLine {
                label: "Total (Payment Plan)".to_string(),
                value: "10,52,200".to_string(),
            }),
        }
    }

    #[test]
    fn renders_a_pdf_file() {
        let bytes = PdfRenderer.render(&document(3)).expect("pdf renders");
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(PdfRenderer.content_type(), mime::APPLICATION_PDF);
    }

    #[test]
    fn long_tables_continue_on_new_pages() {
        let short = PdfRenderer.render(&document(2)).expect("short pdf");
        let long = PdfRenderer.render(&document(120)).expect("long pdf");
        assert!(long.len() > short.len());
    }

    #[test]
    fn non_ascii_text_is_replaced() {
        assert_eq!(printable("Price (Rate × Size) ₹"), "Price (Rate x Size) ?");
    }

    #[test]
    fn two_column_tables_right_side_the_amounts() {
        let offsets = column_offsets(2);
        assert_eq!(offsets[0], MARGIN);
        assert!(offsets[1] > PAGE_WIDTH / 2.0);
        assert_eq!(column_offsets(5).len(), 5);
    }
}
