use std::fmt::Write;

use chrono::{DateTime, Utc};
use recall_core::format::{format_clock, format_readable};
use recall_core::model::{Card, CardRating, Deck, SessionResult};
use services::SessionManager;

/// Deck overview shown before the first card.
pub fn intro_view(deck: &Deck, last: Option<&SessionResult>) -> String {
    let settings = deck.settings();
    let mut out = String::new();
    let _ = writeln!(out, "{}  ({} cards)", deck.title(), deck.len());
    if settings.shuffle {
        out.push_str("cards are shuffled\n");
    }
    if settings.show_timer {
        out.push_str("timer is shown\n");
    }
    if let Some(last) = last {
        let _ = writeln!(
            out,
            "last session: {}/{} known in {}",
            last.known_count(),
            last.total_cards(),
            format_readable(last.total_time_ms())
        );
    }
    out
}

pub fn card_view(session: &SessionManager, now: DateTime<Utc>) -> String {
    let card = session.current_card();
    let stats = session.statistics(now);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n[{}/{}]  known {}  unknown {}",
        stats.current_index, stats.total_cards, stats.known_count, stats.unknown_count
    );
    if session.deck().settings().show_timer {
        let _ = writeln!(
            out,
            "card {}  total {}",
            format_clock(stats.current_card_elapsed_ms),
            format_clock(stats.total_elapsed_ms)
        );
    }
    if let Some(tag) = card.tag() {
        let _ = writeln!(out, "#{tag}");
    }
    let _ = writeln!(out, "Q: {}", card.front());
    if session.is_answer_revealed() {
        let _ = writeln!(out, "A: {}", card.back());
    }
    match session.current_card_rating() {
        CardRating::Known => out.push_str("(rated: known)\n"),
        CardRating::Unknown => out.push_str("(rated: unknown)\n"),
        CardRating::Unrated if session.is_answer_revealed() => {
            out.push_str("[k]nown or [u]nknown?\n");
        }
        CardRating::Unrated => {}
    }
    out
}

pub fn summary_view(result: &SessionResult, difficult: &[&Card]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nSession summary: {}", result.deck_title());
    let _ = writeln!(
        out,
        "rated {}/{}  known {}  unknown {}",
        result.rated_count(),
        result.total_cards(),
        result.known_count(),
        result.unknown_count()
    );
    let _ = writeln!(out, "total time: {}", format_readable(result.total_time_ms()));
    let _ = writeln!(
        out,
        "average per card: {}",
        format_readable(result.average_rated_time_ms())
    );

    if !difficult.is_empty() {
        out.push_str("difficult cards:\n");
        for card in difficult {
            let _ = write!(out, "  {} -> {}", card.front(), card.back());
            if let Some(tag) = card.tag() {
                let _ = write!(out, "  #{tag}");
            }
            out.push('\n');
        }
    }
    out
}

pub fn history_view(history: &[SessionResult]) -> String {
    if history.is_empty() {
        return "no finished sessions yet\n".to_owned();
    }
    let mut out = String::new();
    for result in history {
        let _ = writeln!(
            out,
            "{}  {}  {}/{} known  {}",
            result.date().to_rfc3339(),
            result.deck_title(),
            result.known_count(),
            result.total_cards(),
            format_readable(result.total_time_ms())
        );
    }
    out
}
