//! Plain-text reports over a reconciled rankings context

use anyhow::{bail, Result};
use player_rankings::{
    Annotation, AnnotationDetail, DisplayItem, Player, RankingsContext, ReconcileStats, Roster, RosterSpot, SlotId,
};
use std::sync::Arc;

const RULE_WIDTH: usize = 72;

/// Rank as shown on the board; NaN is "NR"
pub fn format_rank(rank: f64) -> String {
    if !rank.is_finite() {
        "NR".to_string()
    } else if rank.fract() == 0.0 {
        format!("{rank:.0}")
    } else {
        format!("{rank:.1}")
    }
}

/// Movement arrow: ▲ for a rise (negative change), ▼ for a fall
pub fn format_change(change: Option<f64>) -> String {
    match change {
        None => "-".to_string(),
        Some(c) if c < 0.0 => format!("▲{}", format_rank(-c)),
        Some(c) if c > 0.0 => format!("▼{}", format_rank(c)),
        Some(_) => "=".to_string(),
    }
}

/// One-line human rendering of an annotation
pub fn describe(annotation: &Annotation) -> String {
    let parts: Vec<String> = match annotation.detail() {
        AnnotationDetail::Injury { part, status } => {
            [part, status].into_iter().flatten().map(str::to_string).collect()
        }
        AnnotationDetail::Oline { quality } => quality.map(|q| format!("line {q}")).into_iter().collect(),
        AnnotationDetail::Contract { state } => state.map(str::to_string).into_iter().collect(),
        AnnotationDetail::Suspension { games } => games.map(|g| format!("{g} games")).into_iter().collect(),
        AnnotationDetail::DepthChart { who_left } => who_left.map(|w| format!("{w} left")).into_iter().collect(),
        AnnotationDetail::Film { state, tag, grade } => {
            [state, tag, grade].into_iter().flatten().map(str::to_string).collect()
        }
        AnnotationDetail::Tag(_) | AnnotationDetail::Other(_) => Vec::new(),
    };

    if parts.is_empty() {
        annotation.key().to_string()
    } else {
        format!("{} ({})", annotation.key(), parts.join(", "))
    }
}

/// Biggest risers and fallers among players that matched the baseline
#[derive(Debug, Default)]
pub struct Movers {
    pub risers: Vec<Arc<Player>>,
    pub fallers: Vec<Arc<Player>>,
}

pub fn movers(players: &[Arc<Player>], limit: usize) -> Movers {
    let mut moved: Vec<(&Arc<Player>, f64)> = players
        .iter()
        .filter(|p| !p.was_unranked)
        .filter_map(|p| p.rank_change.map(|c| (p, c)))
        .filter(|(_, c)| *c != 0.0)
        .collect();
    moved.sort_by(|a, b| a.1.total_cmp(&b.1));

    let risers = moved.iter().take_while(|(_, c)| *c < 0.0).take(limit).map(|(p, _)| Arc::clone(p)).collect();
    let fallers =
        moved.iter().rev().take_while(|(_, c)| *c > 0.0).take(limit).map(|(p, _)| Arc::clone(p)).collect();

    Movers { risers, fallers }
}

fn print_title(title: &str) {
    println!("{title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn player_line(player: &Player, kinds: &[String]) -> String {
    format!(
        "{:>5} {:>6}  {:<26} {:<5} {:<4} {:>4}  {}",
        format_rank(player.rank),
        format_change(player.rank_change),
        player.name,
        player.pos_rank.as_deref().unwrap_or(player.position.as_str()),
        player.team.as_deref().unwrap_or("-"),
        player.bye.map(|b| format!("b{b}")).unwrap_or_default(),
        kinds.join(" "),
    )
}

fn kinds_for(ctx: &RankingsContext, player: &Player) -> Vec<String> {
    ctx.get_annotations(&player.id).iter().map(|a| a.key().to_string()).collect()
}

pub fn print_stats(stats: &ReconcileStats) {
    println!(
        "{} players | matched: {} by id, {} by name+position, {} by name | {} unranked | baseline max rank {}",
        stats.total,
        stats.matched_by_id,
        stats.matched_by_name_position,
        stats.matched_by_name_only,
        stats.unranked,
        format_rank(stats.baseline_max_rank),
    );
    println!();
}

/// Round-grouped board, at most `limit` players
pub fn print_board(ctx: &RankingsContext, teams: usize, limit: usize) {
    print_title(&format!("📋 Draft Board ({teams} teams)"));
    print_stats(ctx.stats());

    let mut shown = 0;
    for item in ctx.board().display_list(teams) {
        if shown >= limit {
            break;
        }
        match item {
            DisplayItem::Header { round } => println!("── Round {round} ──"),
            DisplayItem::Player(player) => {
                println!("{}", player_line(&player, &kinds_for(ctx, &player)));
                shown += 1;
            }
        }
    }
}

pub fn print_movers(ctx: &RankingsContext, limit: usize) {
    let Movers { risers, fallers } = movers(ctx.players(), limit);

    print_title("📈 Risers");
    for player in &risers {
        println!("{}", player_line(player, &kinds_for(ctx, player)));
    }

    println!();
    print_title("📉 Fallers");
    for player in &fallers {
        println!("{}", player_line(player, &kinds_for(ctx, player)));
    }
}

pub fn print_unmatched(ctx: &RankingsContext) {
    let stats = ctx.stats();
    print_title(&format!("🆕 Unranked in baseline (virtual rank {})", format_rank(stats.baseline_max_rank + 1.0)));

    for player in ctx.players().iter().filter(|p| p.was_unranked) {
        println!("{}", player_line(player, &kinds_for(ctx, player)));
    }

    println!();
    println!("{} of {} players had no baseline match", stats.unranked, stats.total);
}

pub fn print_player(ctx: &RankingsContext, id: &str, json: bool) -> Result<()> {
    let Some(player) = ctx.get_by_id(id) else {
        bail!("No player with id '{}'", id);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(player.as_ref())?);
        return Ok(());
    }

    print_title(&format!("👤 {} ({})", player.name, player.id));
    println!("Position:  {}", player.pos_rank.as_deref().unwrap_or(player.position.as_str()));
    println!("Team:      {}", player.team.as_deref().unwrap_or("-"));
    println!("Bye:       {}", player.bye.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string()));
    println!("Rank:      {}", format_rank(player.rank));
    println!(
        "Baseline:  {}",
        player.original_rank.map(format_rank).unwrap_or_else(|| "unranked".to_string())
    );
    println!("Change:    {}", format_change(player.rank_change));

    let annotations = ctx.get_annotations(id);
    println!();
    println!("Annotations ({}):", annotations.len());
    for annotation in &annotations {
        println!("  - {}", describe(annotation));
    }

    Ok(())
}

/// Draft the given ids in order and show the resulting roster
pub fn print_mock_draft(ctx: &RankingsContext, ids: &[String], teams: usize) -> Result<()> {
    let mut board = ctx.board();
    let mut roster = Roster::new();

    for id in ids {
        match roster.draft_by_id(&mut board, id) {
            Some(RosterSpot::Slot(slot)) => println!("✅ {id} -> {slot}"),
            Some(RosterSpot::Bench) => println!("✅ {id} -> bench"),
            None => bail!("No player with id '{}'", id),
        }
    }

    println!();
    print_title(&format!("🏈 Roster ({} drafted)", roster.drafted_count()));
    for slot in SlotId::ALL {
        let name = roster.slot(slot).map(|p| p.name.as_str()).unwrap_or("-");
        println!("{:<5} {}", slot.to_string(), name);
    }
    for player in roster.bench() {
        println!("{:<5} {}", "BN", player.name);
    }

    println!();
    print_title("Best available");
    let available = board.display_list(teams).into_iter().filter_map(|item| match item {
        DisplayItem::Player(player) => Some(player),
        DisplayItem::Header { .. } => None,
    });
    for player in available.take(teams) {
        println!("{}", player_line(&player, &kinds_for(ctx, &player)));
    }

    Ok(())
}
