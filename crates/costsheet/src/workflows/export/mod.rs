//! Tabular document export for cost sheets and inventory listings.
//!
//! Documents are built as plain tables first; rendering goes through a
//! renderer that is acquired lazily and may be unavailable.

pub mod document;
mod exporter;
mod provider;
mod renderer;

pub use document::{
    cost_sheet_document, cost_sheet_file_name, inventory_document, inventory_file_name,
    sanitize_file_stem, DocumentKind, FooterLine, Table, TabularDocument,
};
pub use exporter::{DocumentExporter, ExportError, ExportReceipt, RenderedDocument};
pub use provider::{
    acquire_renderer, BuiltinPdfProvider, LazyRenderer, RendererAvailability, RendererProvider,
};
pub use renderer::{DocumentRenderer, PdfRenderer, RenderError};
