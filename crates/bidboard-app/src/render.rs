// Plain-text views of the draft session.

use std::fmt::Write;

use bidboard_core::{DraftSession, Owner, PlayerRegistry};

/// One-line summary: round, pick, total budget left, who nominates.
pub fn status_line(session: &DraftSession) -> String {
    let clock = match session.next_owner() {
        Some(owner) => format!(
            "Nomination: {} - Nomination Number {}",
            owner.name(),
            owner.nomination_number()
        ),
        None => "Draft complete".to_string(),
    };
    format!(
        "Round: {}, Pick: {}, Total Budget Remaining: ${} | {}",
        session.round(),
        session.pick(),
        session.total_remaining_budget(),
        clock
    )
}

/// An owner with their roster, one player per line.
pub fn owner_block(owner: &Owner, registry: &PlayerRegistry) -> String {
    let mut out = String::new();
    if owner.is_mine() {
        out.push_str("*** MY TEAM ***\n");
    }
    let _ = writeln!(out, "{owner}");
    for name in owner.roster() {
        match registry.find_by_name(name) {
            Ok(p) => {
                let _ = writeln!(out, "  {:<28} {:<4} {:<4} ${}", p.name, p.position, p.team, p.price);
            }
            Err(_) => {
                let _ = writeln!(out, "  {name}");
            }
        }
    }
    out
}

pub fn owners_view(session: &DraftSession) -> String {
    session
        .owners()
        .iter()
        .map(|o| owner_block(o, session.registry()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Completed picks in order.
pub fn board_view(session: &DraftSession) -> String {
    let sold = session.registry().sold();
    if sold.is_empty() {
        return "No picks yet".to_string();
    }
    let mut out = String::new();
    for p in sold {
        let _ = writeln!(
            out,
            "{:>3}. {:<28} {:<4} {:<4} ${:<4} {} (nominated by {})",
            p.pick,
            p.name,
            p.position,
            p.team,
            p.price,
            p.buying_owner.as_deref().unwrap_or("?"),
            p.nominating_owner.as_deref().unwrap_or("-"),
        );
    }
    out.trim_end().to_string()
}

/// The filter values present in the pool.
pub fn filters_view(registry: &PlayerRegistry) -> String {
    let positions: Vec<String> = registry.positions().iter().map(|p| p.to_string()).collect();
    let tiers: Vec<String> = registry.tiers().iter().map(|t| t.to_string()).collect();
    format!(
        "positions: {}\ntiers: {}\ntags: {}",
        positions.join(", "),
        tiers.join(", "),
        registry.tags().join(", ")
    )
}
