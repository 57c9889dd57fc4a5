//! Block selection
//!
//! Maps the configured blocks and the current page's tags to the ordered
//! list of blocks to render. Selection never fails: a malformed setting
//! yields no blocks plus an error log.

use crate::types::{BlockDefinition, BlocksSetting, ContextTags, DisplayableBlock};

impl BlocksSetting {
    /// Resolve the setting to a sequence of definitions.
    ///
    /// Malformed JSON is logged and treated as an empty list.
    pub fn definitions(&self) -> Vec<BlockDefinition> {
        match self {
            BlocksSetting::Parsed(defs) => defs.clone(),
            BlocksSetting::Json(raw) if raw.trim().is_empty() => Vec::new(),
            BlocksSetting::Json(raw) => match serde_json::from_str(raw) {
                Ok(defs) => defs,
                Err(e) => {
                    tracing::error!(error = %e, "Error parsing block definitions");
                    Vec::new()
                }
            },
        }
    }
}

/// Select the blocks whose tags intersect the context, keeping config order.
pub fn select(definitions: &[BlockDefinition], context: &ContextTags) -> Vec<DisplayableBlock> {
    definitions
        .iter()
        .filter(|def| context.intersects(&def.tags))
        .map(DisplayableBlock::from)
        .collect()
}

/// Select directly from the `blocks` setting.
pub fn select_from_setting(
    setting: &BlocksSetting,
    context: &ContextTags,
) -> Vec<DisplayableBlock> {
    let selected = select(&setting.definitions(), context);
    tracing::debug!(
        context_tags = context.len(),
        selected = selected.len(),
        "Selected blocks"
    );
    selected
}
