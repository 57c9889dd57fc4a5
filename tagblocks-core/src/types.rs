//! Core domain types for tagblocks
//!
//! Block definitions come from configuration and are immutable for the
//! lifetime of a page view. Everything derived from them (displayable blocks,
//! tracking payloads, error reports) copies the two opaque identifiers
//! verbatim so that what is shown, what is tracked, and what is reported all
//! correlate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Placeholder used in error reports when a block has no identifier.
pub const NONE_PROVIDED: &str = "none provided";

// ============================================
// Configuration-side types
// ============================================

/// A configured content block.
///
/// Field names on the wire match the block setting JSON:
/// `{"html": ..., "tags": [...], "placementID": ..., "campaignID": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Markup payload, already sanitized by whoever authored the config
    #[serde(rename = "html", default)]
    pub markup: String,

    /// Context tags this block is shown for
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    /// Opaque placement identifier
    #[serde(rename = "placementID", default, skip_serializing_if = "Option::is_none")]
    pub placement_id: Option<String>,

    /// Opaque campaign identifier
    #[serde(rename = "campaignID", default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
}

/// `"tags": null` behaves like a missing tag list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `blocks` setting, either as serialized JSON or already parsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BlocksSetting {
    /// A JSON array encoded as a string
    Json(String),
    /// An already-parsed sequence
    Parsed(Vec<BlockDefinition>),
}

impl Default for BlocksSetting {
    fn default() -> Self {
        BlocksSetting::Parsed(Vec::new())
    }
}

impl From<Vec<BlockDefinition>> for BlocksSetting {
    fn from(definitions: Vec<BlockDefinition>) -> Self {
        BlocksSetting::Parsed(definitions)
    }
}

// ============================================
// Page-side types
// ============================================

/// Classification labels of the page currently being viewed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextTags(HashSet<String>);

impl ContextTags {
    /// Check whether a tag is part of this context
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Check whether any of the given tags is part of this context
    pub fn intersects<I, S>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter().any(|tag| self.contains(tag.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for ContextTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ContextTags(iter.into_iter().map(Into::into).collect())
    }
}

/// Markup that has been marked safe to render without escaping.
///
/// This crate never sanitizes markup. Wrapping a string in `TrustedMarkup`
/// records that the configuration pipeline upstream already did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedMarkup(String);

impl TrustedMarkup {
    /// Mark markup as trusted. The caller vouches for its sanitization.
    pub fn trust(markup: impl Into<String>) -> Self {
        TrustedMarkup(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TrustedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A block selected for the current page, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayableBlock {
    /// Rendered content (unescaped)
    pub content: TrustedMarkup,
    #[serde(rename = "placementID")]
    pub placement_id: Option<String>,
    #[serde(rename = "campaignID")]
    pub campaign_id: Option<String>,
}

impl From<&BlockDefinition> for DisplayableBlock {
    fn from(def: &BlockDefinition) -> Self {
        DisplayableBlock {
            content: TrustedMarkup::trust(def.markup.clone()),
            placement_id: def.placement_id.clone(),
            campaign_id: def.campaign_id.clone(),
        }
    }
}

// ============================================
// Outbound payloads
// ============================================

/// JSON body of the tracking call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingPayload<'a> {
    #[serde(rename = "placementID", skip_serializing_if = "Option::is_none")]
    pub placement_id: Option<&'a str>,
    #[serde(rename = "campaignID", skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<&'a str>,
}

impl<'a> From<&'a DisplayableBlock> for TrackingPayload<'a> {
    fn from(block: &'a DisplayableBlock) -> Self {
        TrackingPayload {
            placement_id: block.placement_id.as_deref(),
            campaign_id: block.campaign_id.as_deref(),
        }
    }
}

/// Diagnostic filed when a tracking call fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Origin of the page the click happened on
    pub origin: String,
    pub placement_id: String,
    pub campaign_id: String,
    /// Human-readable failure detail
    pub message: String,
}

impl ErrorReport {
    /// Build a report for a block, filling missing identifiers with
    /// [`NONE_PROVIDED`].
    pub fn for_block(
        origin: impl Into<String>,
        block: &DisplayableBlock,
        message: impl Into<String>,
    ) -> Self {
        fn or_none(id: &Option<String>) -> String {
            id.as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(NONE_PROVIDED)
                .to_string()
        }

        ErrorReport {
            origin: origin.into(),
            placement_id: or_none(&block.placement_id),
            campaign_id: or_none(&block.campaign_id),
            message: message.into(),
        }
    }

    /// Topic title for the report post
    pub fn title(&self) -> String {
        let placement = if self.placement_id.is_empty() {
            "Unknown Placement ID"
        } else {
            &self.placement_id
        };
        format!("API Error Report: {}", placement)
    }

    /// Markdown body for the report post
    pub fn body(&self) -> String {
        format!(
            "**Error Details**:\n\
             - **Origin**: {}\n\
             - **Placement ID**: {}\n\
             - **Campaign ID**: {}\n\
             - **Error Message**: {}\n",
            self.origin, self.placement_id, self.campaign_id, self.message
        )
    }
}
