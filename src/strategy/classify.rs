//! Outcome classification.
//!
//! Maps a bookmaker's outcome name onto the home/draw/away buckets of the
//! event it belongs to. Matching is exact string comparison against the
//! event's home team and the fixed draw label; anything else lands in the
//! away bucket.
//!
//! The away default is deliberately over-broad: a misspelt away team (or any
//! stray label) is still counted as an away price. `is_recognised` lets
//! callers spot those names without changing the classification.

use crate::types::{Event, OutcomeKind, DRAW_LABEL};

/// Classify an outcome name for the given event.
///
/// Rules, in order: home team name → `Home`; draw label → `Draw`;
/// everything else → `Away`.
pub fn classify(name: &str, event: &Event) -> OutcomeKind {
    if name == event.home_team {
        OutcomeKind::Home
    } else if name == DRAW_LABEL {
        OutcomeKind::Draw
    } else {
        OutcomeKind::Away
    }
}

/// Whether `name` matches one of the three labels the event actually uses.
///
/// `false` means `classify` fell through to its away default for a name
/// that is not the away team.
pub fn is_recognised(name: &str, event: &Event) -> bool {
    name == event.home_team || name == DRAW_LABEL || name == event.away_team
}
