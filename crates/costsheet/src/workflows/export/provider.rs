use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::renderer::{DocumentRenderer, PdfRenderer, RenderError};

/// Loads a renderer. Loading may block, so callers run it off the async
/// executor.
pub trait RendererProvider: Send + Sync + 'static {
    fn acquire(&self) -> Result<Arc<dyn DocumentRenderer>, RenderError>;
}

/// Provides the in-process PDF renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinPdfProvider;

impl RendererProvider for BuiltinPdfProvider {
    fn acquire(&self) -> Result<Arc<dyn DocumentRenderer>, RenderError> {
        Ok(Arc::new(PdfRenderer))
    }
}

#[derive(Debug, Clone)]
pub enum RendererAvailability {
    Available(Arc<dyn DocumentRenderer>),
    Unavailable(String),
}

impl RendererAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Runs `provider` on a blocking task and gives up after `timeout`.
pub async fn acquire_renderer(
    provider: Arc<dyn RendererProvider>,
    timeout: Duration,
) -> RendererAvailability {
    let task = tokio::task::spawn_blocking(move || provider.acquire());
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(renderer))) => RendererAvailability::Available(renderer),
        Ok(Ok(Err(err))) => RendererAvailability::Unavailable(err.to_string()),
        Ok(Err(join)) => {
            RendererAvailability::Unavailable(format!("renderer loader stopped: {join}"))
        }
        Err(_) => RendererAvailability::Unavailable(format!(
            "renderer not ready after {} ms",
            timeout.as_millis()
        )),
    }
}

/// Acquires the renderer on first use and keeps it once loaded. Failed
/// attempts are not cached, so a later export tries again.
pub struct LazyRenderer {
    provider: Arc<dyn RendererProvider>,
    timeout: Duration,
    loaded: OnceCell<Arc<dyn DocumentRenderer>>,
}

impl LazyRenderer {
    pub fn new(provider: Arc<dyn RendererProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            loaded: OnceCell::new(),
        }
    }

    pub async fn availability(&self) -> RendererAvailability {
        let loaded = self
            .loaded
            .get_or_try_init(|| async {
                match acquire_renderer(Arc::clone(&self.provider), self.timeout).await {
                    RendererAvailability::Available(renderer) => {
                        debug!("document renderer loaded");
                        Ok(renderer)
                    }
                    RendererAvailability::Unavailable(reason) => Err(reason),
                }
            })
            .await;

        match loaded {
            Ok(renderer) => RendererAvailability::Available(Arc::clone(renderer)),
            Err(reason) => {
                warn!(%reason, "document renderer unavailable");
                RendererAvailability::Unavailable(reason)
            }
        }
    }
}

impl std::fmt::Debug for LazyRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyRenderer")
            .field("timeout", &self.timeout)
            .field("loaded", &self.loaded.initialized())
            .finish_non_exhaustive()
    }
}
