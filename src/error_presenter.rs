//! Error presenter
//!
//! The single user-visible failure surface: the chart container's content is
//! replaced with a fixed diagnostic block.

use crate::host::{escape_html, HostPage};
use crate::settings::ExplorerSettings;
use std::fmt::Display;
use tracing::{error, warn};

/// Headline shown above every diagnostic
pub const FAILURE_LABEL: &str = "Error loading dataset. Please check the CSV file path.";

#[derive(Clone, Debug)]
pub struct ErrorPresenter {
    container_id: String,
    resource_path: String,
}

impl ErrorPresenter {
    pub fn new(container_id: impl Into<String>, resource_path: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            resource_path: resource_path.into(),
        }
    }

    pub fn from_settings(settings: &ExplorerSettings) -> Self {
        Self::new(&settings.container_id, &settings.resource_path)
    }

    /// Diagnostic block for an error
    pub fn diagnostic_html(&self, err: &dyn Display) -> String {
        format!(
            "<div class=\"chart-error\" role=\"alert\">\n\
<p>{}</p>\n\
<p class=\"chart-error-message\">{}</p>\n\
<p class=\"chart-error-path\">Expected path: {}</p>\n\
</div>",
            FAILURE_LABEL,
            escape_html(&err.to_string()),
            escape_html(&self.resource_path)
        )
    }

    /// Replace the container's content with the diagnostic block.
    ///
    /// Returns false, after logging, when the container is absent.
    pub fn present<P: HostPage + ?Sized>(&self, page: &mut P, err: &dyn Display) -> bool {
        error!(error = %err, path = %self.resource_path, "Error loading data");
        if page.replace_content(&self.container_id, &self.diagnostic_html(err)) {
            true
        } else {
            warn!(container = %self.container_id, "No container to present the error in");
            false
        }
    }
}
