//! Agent ranking shared by the CLI leaderboard and `/api/agents`

use std::cmp::Ordering;

use serde::Deserialize;

use crate::types::{AgentProfile, DashboardState};

/// Column to rank agents by (always descending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Invocations,
    Tokens,
    Cost,
    Success,
    Xp,
}

impl SortKey {
    fn compare(self, a: &AgentProfile, b: &AgentProfile) -> Ordering {
        match self {
            SortKey::Invocations => b.total_invocations.cmp(&a.total_invocations),
            SortKey::Tokens => b.total_tokens.cmp(&a.total_tokens),
            SortKey::Cost => b.total_cost_usd.total_cmp(&a.total_cost_usd),
            SortKey::Success => b
                .success_rate
                .total_cmp(&a.success_rate)
                .then(b.total_invocations.cmp(&a.total_invocations)),
            SortKey::Xp => b.xp.cmp(&a.xp),
        }
    }
}

/// Profiles ordered by `key`, ties broken by name
pub fn rank(state: &DashboardState, key: SortKey, limit: usize) -> Vec<&AgentProfile> {
    let mut profiles: Vec<(&String, &AgentProfile)> = state.agents.iter().collect();
    profiles.sort_by(|(name_a, a), (name_b, b)| key.compare(a, b).then_with(|| name_a.cmp(name_b)));
    profiles.into_iter().take(limit).map(|(_, p)| p).collect()
}
