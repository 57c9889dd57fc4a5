//! Click tracking
//!
//! A click on a rendered block runs through a small state machine:
//!
//! ```text
//! Idle ──(endpoint configured)──> Sent ──(2xx)──> Succeeded ──> navigate to href
//!   │                               │
//!   └─(no endpoint)─> done          └──(rejected)──> Failed ──> FailureReporter
//! ```
//!
//! Each click is independent. Nothing debounces repeated clicks, so two quick
//! clicks on the same block produce two tracking calls.

use std::fmt;
use std::sync::Arc;

use tracing::Instrument;

use crate::config::TrackingConfig;
use crate::logging;
use crate::navigation::{in_app_path, Navigator};
use crate::page::PageContext;
use crate::reporter::FailureReporter;
use crate::transport::{OutboundRequest, RequestBody, RequestFailure, Transport};
use crate::types::{DisplayableBlock, ErrorReport, TrackingPayload};

/// Message used when a failed call carries no usable detail
pub const UNKNOWN_ERROR: &str = "Unknown error occurred.";

/// Where a click is in the tracking protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Idle,
    Sent,
    Succeeded,
    Failed,
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackingState::Idle => "idle",
            TrackingState::Sent => "sent",
            TrackingState::Succeeded => "succeeded",
            TrackingState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Terminal result of handling one click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No tracking endpoint; nothing was sent
    NotConfigured,
    /// Tracking call succeeded
    Succeeded { navigated_to: Option<String> },
    /// Tracking call was rejected and handed to the reporter
    Failed { message: String },
}

impl ClickOutcome {
    /// Final state reached by the click
    pub fn state(&self) -> TrackingState {
        match self {
            ClickOutcome::NotConfigured => TrackingState::Idle,
            ClickOutcome::Succeeded { .. } => TrackingState::Succeeded,
            ClickOutcome::Failed { .. } => TrackingState::Failed,
        }
    }
}

/// Handles clicks on displayed blocks
pub struct InteractionTracker {
    config: TrackingConfig,
    page: PageContext,
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
    reporter: FailureReporter,
}

impl InteractionTracker {
    pub fn new(
        config: TrackingConfig,
        page: PageContext,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
        reporter: FailureReporter,
    ) -> Self {
        Self {
            config,
            page,
            transport,
            navigator,
            reporter,
        }
    }

    /// Track a click on `block`, then navigate to `href` on success or file
    /// an error report on failure.
    pub async fn handle_click(
        &self,
        block: &DisplayableBlock,
        href: Option<&str>,
    ) -> ClickOutcome {
        self.track(block, href)
            .instrument(logging::click_span(block))
            .await
    }

    async fn track(&self, block: &DisplayableBlock, href: Option<&str>) -> ClickOutcome {
        let Some(endpoint) = self.config.endpoint() else {
            tracing::warn!("API endpoint is not configured.");
            return ClickOutcome::NotConfigured;
        };

        // Relative endpoints are relative to the page, like any other fetch
        let endpoint = match self.page.resolve(endpoint) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "API endpoint is not a valid URL.");
                return ClickOutcome::NotConfigured;
            }
        };

        let request = self.tracking_request(endpoint.as_str(), block);
        transition(TrackingState::Idle, TrackingState::Sent);

        match self.transport.send(request).await {
            Ok(_) => {
                transition(TrackingState::Sent, TrackingState::Succeeded);
                let navigated_to = href.and_then(|href| self.navigate(href));
                ClickOutcome::Succeeded { navigated_to }
            }
            Err(failure) => {
                transition(TrackingState::Sent, TrackingState::Failed);
                let message = extract_error_message(&failure);
                tracing::warn!(error = %failure, message = %message, "Tracking call failed");

                let report = ErrorReport::for_block(self.page.origin(), block, message.clone());
                self.reporter.report(&report).await;

                ClickOutcome::Failed { message }
            }
        }
    }

    fn tracking_request(&self, endpoint: &str, block: &DisplayableBlock) -> OutboundRequest {
        let payload = serde_json::json!(TrackingPayload::from(block));

        OutboundRequest::post(endpoint, RequestBody::Json(payload))
            .header("Content-Type", "application/json")
            .header("referrer", self.page.referrer())
    }

    /// Resolve `href` and transition to its path + query.
    fn navigate(&self, href: &str) -> Option<String> {
        match self.page.resolve(href) {
            Ok(url) => {
                let path = in_app_path(&url);
                tracing::debug!(%path, "Transitioning after tracked click");
                self.navigator.transition_to(&path);
                Some(path)
            }
            Err(e) => {
                tracing::warn!(href, error = %e, "Ignoring unparseable link href");
                None
            }
        }
    }
}

fn transition(from: TrackingState, to: TrackingState) {
    tracing::debug!(%from, %to, "Click tracking transition");
}

/// Human-readable message for a rejected call.
///
/// Precedence: the JSON body's `error` string, then the whole JSON body,
/// then the raw response text, then [`UNKNOWN_ERROR`].
pub fn extract_error_message(failure: &RequestFailure) -> String {
    if let Some(json) = &failure.response_json {
        return match json.get("error").and_then(|e| e.as_str()) {
            Some(error) if !error.is_empty() => error.to_string(),
            _ => json.to_string(),
        };
    }

    match failure.response_text.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => UNKNOWN_ERROR.to_string(),
    }
}
