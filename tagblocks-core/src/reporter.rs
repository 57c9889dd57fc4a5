//! Failure reporter
//!
//! When a tracking call fails, a diagnostic topic is posted to the forum
//! under the `system` user with a privileged API key. This is the last stop
//! of the pipeline: if the report itself fails it is logged and dropped.

use std::sync::Arc;

use crate::config::ReportingConfig;
use crate::page::PageContext;
use crate::transport::{OutboundRequest, RequestBody, Transport};
use crate::types::ErrorReport;

/// Username the report is posted as
pub const REPORT_USERNAME: &str = "system";

/// Posts [`ErrorReport`]s to the forum's `/posts` endpoint
#[derive(Clone)]
pub struct FailureReporter {
    config: ReportingConfig,
    posts_url: String,
    transport: Arc<dyn Transport>,
}

impl FailureReporter {
    /// Create a reporter for a page view
    ///
    /// Reports go to `report_url` when configured, otherwise to the page
    /// origin.
    pub fn new(config: ReportingConfig, page: &PageContext, transport: Arc<dyn Transport>) -> Self {
        let base = config
            .report_url()
            .map(str::to_string)
            .unwrap_or_else(|| page.origin());
        let posts_url = format!("{}/posts", base.trim_end_matches('/'));

        Self {
            config,
            posts_url,
            transport,
        }
    }

    /// URL reports are posted to
    pub fn posts_url(&self) -> &str {
        &self.posts_url
    }

    /// Check if both credentials are present
    pub fn is_ready(&self) -> bool {
        self.config.is_ready()
    }

    /// Build the form-encoded `/posts` request, or `None` when unconfigured
    fn build_request(&self, report: &ErrorReport) -> Option<OutboundRequest> {
        let api_key = self.config.api_key()?;
        let category_id = self.config.category_id()?;

        let body = RequestBody::Form(vec![
            ("title".to_string(), report.title()),
            ("raw".to_string(), report.body()),
            ("category".to_string(), category_id.to_string()),
        ]);

        Some(
            OutboundRequest::post(self.posts_url.clone(), body)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .header("Api-Key", api_key)
                .header("Api-Username", REPORT_USERNAME),
        )
    }

    /// Submit a report. Never fails; problems are logged.
    pub async fn report(&self, report: &ErrorReport) {
        let Some(request) = self.build_request(report) else {
            tracing::warn!("API key or category ID is not configured.");
            return;
        };

        match self.transport.send(request).await {
            Ok(response) => {
                tracing::debug!(
                    placement_id = %report.placement_id,
                    status = response.status,
                    "Created error report topic"
                );
            }
            Err(failure) => {
                tracing::error!(
                    placement_id = %report.placement_id,
                    error = %failure,
                    response = failure.response_text.as_deref().unwrap_or(""),
                    "Failed to create error notification topic"
                );
            }
        }
    }
}
