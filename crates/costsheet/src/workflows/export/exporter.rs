use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::document::TabularDocument;
use super::provider::{BuiltinPdfProvider, LazyRenderer, RendererAvailability, RendererProvider};
use super::renderer::RenderError;
use crate::config::ExportConfig;
use crate::progress::{ProgressGuard, ProgressReporter};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("document renderer unavailable: {reason}")]
    RendererUnavailable { reason: String },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("unable to write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rendered bytes ready to be downloaded.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub generated_at: DateTime<Utc>,
}

/// Renders documents and saves them under the export directory.
#[derive(Debug)]
pub struct DocumentExporter {
    renderer: LazyRenderer,
    output_dir: PathBuf,
}

impl DocumentExporter {
    pub fn new(
        provider: Arc<dyn RendererProvider>,
        renderer_timeout: Duration,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            renderer: LazyRenderer::new(provider, renderer_timeout),
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(
            Arc::new(BuiltinPdfProvider),
            config.renderer_timeout,
            config.output_dir.clone(),
        )
    }

    /// The busy indicator is hidden again on every exit path.
    pub async fn render(
        &self,
        document: &TabularDocument,
        progress: &dyn ProgressReporter,
    ) -> Result<RenderedDocument, ExportError> {
        let _busy = ProgressGuard::show(progress, document.kind.busy_message());

        let renderer = match self.renderer.availability().await {
            RendererAvailability::Available(renderer) => renderer,
            RendererAvailability::Unavailable(reason) => {
                return Err(ExportError::RendererUnavailable { reason })
            }
        };

        let content_type = renderer.content_type();
        let owned = document.clone();
        let bytes = tokio::task::spawn_blocking(move || renderer.render(&owned))
            .await
            .map_err(|err| RenderError::Task(err.to_string()))??;

        Ok(RenderedDocument {
            file_name: document.file_name.clone(),
            content_type,
            bytes,
        })
    }

    pub async fn export(
        &self,
        document: &TabularDocument,
        progress: &dyn ProgressReporter,
    ) -> Result<ExportReceipt, ExportError> {
        let rendered = self.render(document, progress).await?;
        let path = self.output_dir.join(&rendered.file_name);

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ExportError::Io {
                path: self.output_dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, &rendered.bytes)
            .await
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;

        info!(file = %path.display(), bytes = rendered.bytes.len(), "document exported");
        Ok(ExportReceipt {
            file_name: rendered.file_name,
            path,
            bytes: rendered.bytes.len(),
            generated_at: Utc::now(),
        })
    }
}
