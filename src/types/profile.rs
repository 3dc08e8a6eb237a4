//! Per-agent rollup statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::or_default;

/// Cumulative statistics for one agent.
///
/// Profiles are maintained by callers (see `MetricsCollector`); the store only
/// keeps their shape intact. Every field defaults so that documents written by
/// older or newer producers still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AgentProfile {
    #[serde(deserialize_with = "or_default")]
    pub agent_name: String,
    #[serde(deserialize_with = "or_default")]
    pub total_invocations: u64,
    #[serde(deserialize_with = "or_default")]
    pub successful_invocations: u64,
    #[serde(deserialize_with = "or_default")]
    pub failed_invocations: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_input_tokens: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_output_tokens: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_tokens: u64,
    #[serde(deserialize_with = "or_default")]
    pub total_cost_usd: f64,
    #[serde(deserialize_with = "or_default")]
    pub total_duration_seconds: f64,
    /// Artifact tag -> number of times produced
    #[serde(deserialize_with = "or_default")]
    pub artifacts_produced: BTreeMap<String, u64>,
    #[serde(deserialize_with = "or_default")]
    pub success_rate: f64,
    #[serde(deserialize_with = "or_default")]
    pub avg_tokens_per_invocation: f64,
    #[serde(deserialize_with = "or_default")]
    pub avg_duration_seconds: f64,
    // Gamification
    #[serde(deserialize_with = "or_default")]
    pub xp: u64,
    #[serde(deserialize_with = "or_default")]
    pub level: u32,
    #[serde(deserialize_with = "or_default")]
    pub achievements: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub current_streak: u32,
    #[serde(deserialize_with = "or_default")]
    pub best_streak: u32,
    #[serde(deserialize_with = "or_default")]
    pub recent_event_ids: Vec<String>,
    #[serde(deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub last_active: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentProfile {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            level: 1,
            ..Default::default()
        }
    }

    /// Total artifacts produced across all tags
    pub fn artifact_count(&self) -> u64 {
        self.artifacts_produced.values().sum()
    }

    /// Recompute the derived rates from the raw counters
    pub fn refresh_rates(&mut self) {
        if self.total_invocations == 0 {
            self.success_rate = 0.0;
            self.avg_tokens_per_invocation = 0.0;
            self.avg_duration_seconds = 0.0;
            return;
        }
        let n = self.total_invocations as f64;
        self.success_rate = self.successful_invocations as f64 / n;
        self.avg_tokens_per_invocation = self.total_tokens as f64 / n;
        self.avg_duration_seconds = self.total_duration_seconds / n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_refresh_rates() {
        let mut profile = AgentProfile::new("coding");
        profile.total_invocations = 4;
        profile.successful_invocations = 3;
        profile.failed_invocations = 1;
        profile.total_tokens = 2000;
        profile.total_duration_seconds = 10.0;
        profile.refresh_rates();

        assert_eq!(profile.success_rate, 0.75);
        assert_eq!(profile.avg_tokens_per_invocation, 500.0);
        assert_eq!(profile.avg_duration_seconds, 2.5);
    }

    #[test]
    fn test_refresh_rates_without_invocations() {
        let mut profile = AgentProfile::new("idle");
        profile.success_rate = 1.0;
        profile.refresh_rates();
        assert_eq!(profile.success_rate, 0.0);
    }

    #[test]
    fn test_partial_profile_decodes() {
        let profile: AgentProfile =
            serde_json::from_value(json!({"agent_name": "qa", "total_invocations": 7})).unwrap();
        assert_eq!(profile.total_invocations, 7);
        assert!(profile.achievements.is_empty());
        assert!(profile.last_active.is_none());
    }
}
