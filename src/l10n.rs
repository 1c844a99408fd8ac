//! User-facing labels.
//!
//! Defaults are English. Overrides come from the `[l10n]` section of the
//! app config and from the rubric content's own `l10n` object (content
//! wins). Keys use the content's camelCase names.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub download_responses: String,
    pub click_to_select: String,
    pub evidence_placeholder: String,
    pub evidence_title: String,
    pub performance_indicator: String,
    pub level_of_achievement: String,
    pub scoring_guidelines: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            download_responses: "Download responses".to_string(),
            click_to_select: "Click to select".to_string(),
            evidence_placeholder: "Evidence".to_string(),
            evidence_title: "Provide evidence URL or text".to_string(),
            performance_indicator: "Performance indicator".to_string(),
            level_of_achievement: "Level of achievement".to_string(),
            scoring_guidelines: "Scoring guidelines".to_string(),
        }
    }
}

impl Labels {
    /// Apply overrides by key; unknown keys are ignored
    pub fn merge(&mut self, overrides: &HashMap<String, String>) {
        for (key, value) in overrides {
            match self.slot_mut(key) {
                Some(slot) => *slot = value.clone(),
                None => tracing::debug!("Ignoring unknown label key {:?}", key),
            }
        }
    }

    /// Defaults, then each override layer in order
    pub fn layered<'a>(layers: impl IntoIterator<Item = &'a HashMap<String, String>>) -> Self {
        let mut labels = Self::default();
        for layer in layers {
            labels.merge(layer);
        }
        labels
    }

    /// CSV header: indicator, level, guidelines, evidence
    pub fn export_header(&self) -> [&str; 4] {
        [
            self.performance_indicator.as_str(),
            self.level_of_achievement.as_str(),
            self.scoring_guidelines.as_str(),
            self.evidence_placeholder.as_str(),
        ]
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "downloadResponses" => Some(&mut self.download_responses),
            "clickToSelect" => Some(&mut self.click_to_select),
            "evidencePlaceholder" => Some(&mut self.evidence_placeholder),
            "evidenceTitle" => Some(&mut self.evidence_title),
            "performanceIndicator" => Some(&mut self.performance_indicator),
            "levelOfAchievement" => Some(&mut self.level_of_achievement),
            "scoringGuidelines" => Some(&mut self.scoring_guidelines),
            _ => None,
        }
    }
}
