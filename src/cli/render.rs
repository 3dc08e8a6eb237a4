//! Plain-text views of the metrics document

use std::fmt::Write;

use crate::leaderboard::{rank, SortKey};
use crate::types::{AgentEvent, AgentProfile, DashboardState, StoreStats};
use crate::utils::humanize_since;

const RULE: &str = "----------------------------------------------------------------";

/// Project overview: totals, top agents and recent events
pub fn dashboard(state: &DashboardState, recent: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project: {}", display_name(&state.project_name));
    let _ = writeln!(out, "{}", RULE);

    if state.is_empty() {
        let _ = writeln!(out, "Dashboard initializing - no agent activity recorded yet.");
        return out;
    }

    let _ = writeln!(out, "Sessions:   {}", state.total_sessions);
    let _ = writeln!(out, "Tokens:     {}", state.total_tokens);
    let _ = writeln!(out, "Cost:       ${:.4}", state.total_cost_usd);
    let _ = writeln!(out, "Duration:   {:.1}s", state.total_duration_seconds);
    let _ = writeln!(out, "Updated:    {}", humanize_since(&state.updated_at));
    let _ = writeln!(out);

    let _ = writeln!(out, "Top agents");
    out.push_str(&leaderboard(state, SortKey::Invocations, 5));
    let _ = writeln!(out);

    let _ = writeln!(out, "Recent events");
    for event in state.recent_events(recent) {
        let _ = writeln!(out, "  {}", event_line(event));
    }
    out
}

/// Ranked table of agents
pub fn leaderboard(state: &DashboardState, sort: SortKey, limit: usize) -> String {
    let mut out = String::new();
    let ranked = rank(state, sort, limit);
    if ranked.is_empty() {
        let _ = writeln!(out, "  (no agents yet)");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<3} {:<20} {:>6} {:>8} {:>10} {:>10} {:>6}",
        "#", "AGENT", "RUNS", "SUCCESS", "TOKENS", "COST", "LEVEL"
    );
    for (i, profile) in ranked.into_iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:<3} {:<20} {:>6} {:>7.1}% {:>10} {:>10.4} {:>6}",
            i + 1,
            profile.agent_name,
            profile.total_invocations,
            profile.success_rate * 100.0,
            profile.total_tokens,
            profile.total_cost_usd,
            profile.level
        );
    }
    out
}

/// Detail view of one agent plus its retained events
pub fn agent(state: &DashboardState, profile: &AgentProfile, recent: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Agent: {}", profile.agent_name);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "Invocations:  {} ({} ok, {} failed, {:.1}% success)",
        profile.total_invocations,
        profile.successful_invocations,
        profile.failed_invocations,
        profile.success_rate * 100.0
    );
    let _ = writeln!(
        out,
        "Tokens:       {} ({} in / {} out, {:.0} avg)",
        profile.total_tokens, profile.total_input_tokens, profile.total_output_tokens, profile.avg_tokens_per_invocation
    );
    let _ = writeln!(out, "Cost:         ${:.4}", profile.total_cost_usd);
    let _ = writeln!(
        out,
        "Duration:     {:.1}s ({:.1}s avg)",
        profile.total_duration_seconds, profile.avg_duration_seconds
    );
    let _ = writeln!(
        out,
        "Level:        {} ({} XP, streak {} / best {})",
        profile.level, profile.xp, profile.current_streak, profile.best_streak
    );
    if !profile.achievements.is_empty() {
        let _ = writeln!(out, "Achievements: {}", profile.achievements.join(", "));
    }
    if !profile.artifacts_produced.is_empty() {
        let artifacts: Vec<String> = profile
            .artifacts_produced
            .iter()
            .map(|(tag, count)| format!("{} x{}", tag, count))
            .collect();
        let _ = writeln!(out, "Artifacts:    {}", artifacts.join(", "));
    }
    let last_active = profile.last_active.as_deref().unwrap_or_default();
    let _ = writeln!(out, "Last active:  {}", humanize_since(last_active));
    if let Some(error) = &profile.last_error {
        let _ = writeln!(out, "Last error:   {}", error);
    }

    let mut events: Vec<&AgentEvent> = state.events_for(&profile.agent_name).collect();
    if !events.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recent events");
        events.reverse();
        for event in events.into_iter().take(recent) {
            let _ = writeln!(out, "  {}", event_line(event));
        }
    }
    out
}

/// Store introspection
pub fn stats(stats: &StoreStats) -> String {
    format!(
        "File size: {}\nEvents:    {}\nSessions:  {}\nAgents:    {}\n",
        StoreStats::format_size(stats.file_size_bytes),
        stats.event_count,
        stats.session_count,
        stats.agent_count
    )
}

fn event_line(event: &AgentEvent) -> String {
    let mut line = format!(
        "{:<9} {:<16} {:<8} {:>8} tok {:>7.1}s",
        humanize_since(&event.ended_at),
        event.agent_name,
        event.status,
        event.total_tokens,
        event.duration_seconds
    );
    if let Some(ticket) = &event.ticket_key {
        let _ = write!(line, "  [{}]", ticket);
    }
    if let Some(error) = &event.error_message {
        let _ = write!(line, "  {}", error);
    }
    line
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed)"
    } else {
        name
    }
}
