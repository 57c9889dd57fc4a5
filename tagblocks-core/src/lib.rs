//! # tagblocks-core
//!
//! Core library for tagblocks: tag-targeted content blocks with
//! best-effort click tracking.
//!
//! This library provides:
//! - Block selection against the current page's tags
//! - Click tracking with in-app navigation on success
//! - Failure reporting to a forum channel when tracking fails
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Pipeline
//!
//! page tags → [`selector`] → rendered blocks → click → [`tracker`] →
//! navigate on success, or [`reporter`] on failure.
//!
//! Nothing in the pipeline surfaces an error to the page. Missing
//! configuration, malformed block JSON, failed tracking calls and failed
//! reports all end in a log line.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tagblocks_core::{
//!     Config, ContextTags, CustomBlocks, NoopNavigator, PageContext, ReqwestTransport,
//! };
//!
//! # async fn run() -> tagblocks_core::Result<()> {
//! let config = Config::load()?;
//! let page = PageContext::new("https://forum.example.com/t/topic/1", "")?;
//! let blocks = CustomBlocks::new(
//!     &config,
//!     page,
//!     Arc::new(ReqwestTransport::new()?),
//!     Arc::new(NoopNavigator),
//! );
//!
//! let context: ContextTags = ["rust"].into_iter().collect();
//! for block in blocks.blocks_to_display(&context) {
//!     blocks.handle_block_click(&block, Some("/t/other/2")).await;
//! }
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use blocks::CustomBlocks;
pub use config::Config;
pub use error::{Error, Result};
pub use navigation::{Navigator, NoopNavigator};
pub use page::PageContext;
pub use reporter::FailureReporter;
pub use selector::select;
pub use tracker::{ClickOutcome, InteractionTracker, TrackingState};
pub use transport::{ReqwestTransport, Transport};
pub use types::*;

// Public modules
pub mod blocks;
pub mod config;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod page;
pub mod reporter;
pub mod selector;
pub mod tracker;
pub mod transport;
pub mod types;
