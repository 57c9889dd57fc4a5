//! Page-view facade tying selection and click tracking together

use std::sync::Arc;

use crate::config::Config;
use crate::navigation::Navigator;
use crate::page::PageContext;
use crate::reporter::FailureReporter;
use crate::selector;
use crate::tracker::{ClickOutcome, InteractionTracker};
use crate::transport::Transport;
use crate::types::{BlocksSetting, ContextTags, DisplayableBlock};

/// Custom blocks for one page view.
///
/// Holds an explicit copy of the configuration; nothing is read from
/// ambient state after construction.
pub struct CustomBlocks {
    blocks: BlocksSetting,
    tracker: InteractionTracker,
}

impl CustomBlocks {
    pub fn new(
        config: &Config,
        page: PageContext,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let reporter = FailureReporter::new(config.reporting.clone(), &page, transport.clone());
        let tracker = InteractionTracker::new(
            config.tracking.clone(),
            page,
            transport,
            navigator,
            reporter,
        );

        Self {
            blocks: config.blocks.definitions.clone(),
            tracker,
        }
    }

    /// Blocks to render for the page's tags. Recomputed on every call.
    pub fn blocks_to_display(&self, context: &ContextTags) -> Vec<DisplayableBlock> {
        selector::select_from_setting(&self.blocks, context)
    }

    /// Handle a click on a rendered block
    pub async fn handle_block_click(
        &self,
        block: &DisplayableBlock,
        href: Option<&str>,
    ) -> ClickOutcome {
        self.tracker.handle_click(block, href).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::testing::RecordingNavigator;
    use crate::transport::testing::MockTransport;

    #[tokio::test]
    async fn test_select_then_click() {
        let toml = r#"
[blocks]
definitions = '[{"html":"<a href=\"/t/1\">one</a>","tags":["rust"],"placementID":"p1","campaignID":"c1"},{"html":"two","tags":["go"]}]'

[tracking]
api_endpoint = "https://track.test/click"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let page = PageContext::new("https://forum.test/t/rust-topic/9", "").unwrap();
        let transport = Arc::new(MockTransport::new().ok());
        let navigator = Arc::new(RecordingNavigator::default());
        let blocks = CustomBlocks::new(&config, page, transport.clone(), navigator.clone());

        let context: ContextTags = ["rust"].into_iter().collect();
        let shown = blocks.blocks_to_display(&context);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].placement_id.as_deref(), Some("p1"));

        let outcome = blocks.handle_block_click(&shown[0], Some("/t/1")).await;
        assert_eq!(
            outcome,
            ClickOutcome::Succeeded {
                navigated_to: Some("/t/1".to_string())
            }
        );
        assert_eq!(navigator.visited(), vec!["/t/1"]);
        assert_eq!(transport.sent().len(), 1);
    }
}
