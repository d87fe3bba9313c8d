//! Pipeline-level error taxonomy
//!
//! [`ExplorerError`] wraps load failures and adds the failures of the render
//! sequence itself. Every variant except [`ExplorerError::Disposed`] ends up
//! in front of the user through the error presenter.

use crate::data::LoadError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExplorerError {
    /// Fetch or parse failure
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The container never reported a nonzero height
    #[error("Chart container not ready after {attempts} attempts")]
    ContainerNotReady { attempts: u32 },

    /// The container or canvas element is absent
    #[error("Render target missing: #{element}")]
    RenderTargetMissing { element: String },

    /// The pipeline was disposed
    #[error("Explorer has been disposed")]
    Disposed,
}

impl ExplorerError {
    pub fn render_target_missing(element: impl Into<String>) -> Self {
        Self::RenderTargetMissing {
            element: element.into(),
        }
    }

    /// Whether this failure is shown to the user
    pub fn is_presentable(&self) -> bool {
        !matches!(self, ExplorerError::Disposed)
    }
}

/// Result type alias for pipeline operations
pub type ExplorerResult<T> = Result<T, ExplorerError>;
