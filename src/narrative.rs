// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Narrative views: chart variants stored as a patch against a parent chart

use serde::{Deserialize, Serialize};

use crate::defaults::grapher_defaults;
use crate::patch::{diff_with_options, resolve_effective, DiffOptions};
use crate::schema;
use crate::types::{GrapherConfig, SCHEMA_KEY};

/// Keys a narrative view never stores: they always come from the parent
pub const NARRATIVE_OMIT_KEYS: [&str; 6] = ["id", "slug", "version", "isPublished", "dimensions", SCHEMA_KEY];

/// Keys a narrative view always stores, even when they match the parent
pub const NARRATIVE_PERSIST_KEYS: [&str; 1] = ["selectedEntityNames"];

/// A narrative view of a parent chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeView {
    /// Unique name of the view
    pub name: String,
    /// Identifier of the parent chart
    pub parent_chart_id: u64,
    /// Chart-specific overrides on top of the parent
    pub patch: GrapherConfig,
}

impl NarrativeView {
    /// Build a view from the full config an editor produced and its parent
    #[must_use]
    pub fn from_full_config(
        name: impl Into<String>,
        parent_chart_id: u64,
        full: &GrapherConfig,
        parent: &GrapherConfig,
    ) -> Self {
        Self {
            name: name.into(),
            parent_chart_id,
            patch: Self::patch_from(full, parent),
        }
    }

    /// Compute the storable patch for a narrative view.
    ///
    /// The stored patch records the parent's `$schema` (or the latest one)
    /// so it can be migrated alongside its parent later.
    #[must_use]
    pub fn patch_from(full: &GrapherConfig, parent: &GrapherConfig) -> GrapherConfig {
        let options = DiffOptions::omitting(&NARRATIVE_OMIT_KEYS)
            .persisting(&NARRATIVE_PERSIST_KEYS)
            .with_defaults(grapher_defaults());
        let mut patch = diff_with_options(full, parent, &options);

        let schema = parent
            .get(SCHEMA_KEY)
            .cloned()
            .unwrap_or_else(|| serde_json::Value::String(schema::latest_schema_url()));
        patch.insert(SCHEMA_KEY.to_string(), schema);
        patch
    }

    /// Effective config of this view: defaults, then parent, then patch.
    ///
    /// The parent's identity keys are not inherited; its dimensions are.
    #[must_use]
    pub fn resolve(&self, parent: &GrapherConfig) -> GrapherConfig {
        let patch = schema::without_schema(&self.patch);
        resolve_effective(grapher_defaults(), parent, &patch)
    }
}
