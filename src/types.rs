//! Shared types for the ARBSCAN engine.
//!
//! Input records mirror the odds provider's event feed; derived records
//! (`BestOdds`, `Opportunity`) are produced fresh on every engine pass and
//! never mutated afterwards.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Market key of the three-way head-to-head market.
pub const H2H_MARKET: &str = "h2h";

/// Outcome name bookmakers use for the draw.
pub const DRAW_LABEL: &str = "Draw";

// ---------------------------------------------------------------------------
// Input feed
// ---------------------------------------------------------------------------

/// A sporting event with odds from every bookmaker that prices it.
///
/// Identity is positional within the batch the source returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub home_team: String,
    pub away_team: String,
    /// Kick-off time as supplied by the provider (RFC 3339). Passed through
    /// to the output untouched.
    pub commence_time: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

impl Event {
    /// Human-readable label used in the output, e.g. `"Arsenal vs Chelsea"`.
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Structural checks the deserializer cannot express.
    ///
    /// Only the head-to-head market is inspected: bookmakers may carry other
    /// markets with prices the engine never reads.
    pub fn validate(&self) -> Result<(), Exclusion> {
        if self.home_team.trim().is_empty() {
            return Err(Exclusion::MalformedEvent("empty home_team".into()));
        }
        if self.away_team.trim().is_empty() {
            return Err(Exclusion::MalformedEvent("empty away_team".into()));
        }
        if DateTime::parse_from_rfc3339(&self.commence_time).is_err() {
            return Err(Exclusion::MalformedEvent(format!(
                "unparseable commence_time {:?}",
                self.commence_time
            )));
        }

        for book in &self.bookmakers {
            let Some(market) = book.h2h_market() else {
                continue;
            };
            for outcome in &market.outcomes {
                if outcome.name.is_empty() {
                    return Err(Exclusion::MalformedEvent(format!(
                        "unnamed outcome from {}",
                        book.title
                    )));
                }
                if outcome.price <= Decimal::ZERO {
                    return Err(Exclusion::MalformedEvent(format!(
                        "non-positive price {} for {} from {}",
                        outcome.price, outcome.name, book.title
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({} bookmakers)",
            self.label(),
            self.commence_time,
            self.bookmakers.len()
        )
    }
}

/// One bookmaker's offer for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmaker {
    pub title: String,
    #[serde(default)]
    pub markets: Vec<Market>,
}

impl Bookmaker {
    /// The first head-to-head market this bookmaker lists, if any.
    pub fn h2h_market(&self) -> Option<&Market> {
        self.markets.iter().find(|m| m.key == H2H_MARKET)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub key: String,
    pub outcomes: Vec<Outcome>,
}

/// A priced outcome. `price` is in decimal odds (stake × price returned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub price: Decimal,
}

// ---------------------------------------------------------------------------
// Outcome buckets
// ---------------------------------------------------------------------------

/// The three result buckets of a head-to-head market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Home,
    Draw,
    Away,
}

impl OutcomeKind {
    pub const ALL: [OutcomeKind; 3] = [OutcomeKind::Home, OutcomeKind::Draw, OutcomeKind::Away];
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::Home => write!(f, "home"),
            OutcomeKind::Draw => write!(f, "draw"),
            OutcomeKind::Away => write!(f, "away"),
        }
    }
}

// ---------------------------------------------------------------------------
// Derived records
// ---------------------------------------------------------------------------

/// Best price seen for one bucket and the bookmaker offering it.
///
/// A zero price means no bookmaker offered the outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSlot {
    pub price: Decimal,
    pub source: Option<String>,
}

impl PriceSlot {
    pub fn is_filled(&self) -> bool {
        self.price > Decimal::ZERO
    }
}

/// Best available price per bucket across all bookmakers of one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BestOdds {
    pub home: PriceSlot,
    pub draw: PriceSlot,
    pub away: PriceSlot,
}

impl BestOdds {
    pub fn slot(&self, kind: OutcomeKind) -> &PriceSlot {
        match kind {
            OutcomeKind::Home => &self.home,
            OutcomeKind::Draw => &self.draw,
            OutcomeKind::Away => &self.away,
        }
    }

    pub fn slot_mut(&mut self, kind: OutcomeKind) -> &mut PriceSlot {
        match kind {
            OutcomeKind::Home => &mut self.home,
            OutcomeKind::Draw => &mut self.draw,
            OutcomeKind::Away => &mut self.away,
        }
    }

    /// Buckets no bookmaker has priced yet.
    pub fn missing(&self) -> Vec<OutcomeKind> {
        OutcomeKind::ALL
            .into_iter()
            .filter(|k| !self.slot(*k).is_filled())
            .collect()
    }

    /// `[home, draw, away]` prices, or `None` while any bucket is empty.
    pub fn prices(&self) -> Option<[Decimal; 3]> {
        if self.missing().is_empty() {
            Some([self.home.price, self.draw.price, self.away.price])
        } else {
            None
        }
    }
}

impl fmt::Display for BestOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |slot: &PriceSlot| match &slot.source {
            Some(src) => format!("{} ({src})", slot.price),
            None => "-".to_string(),
        };
        write!(
            f,
            "H {} | D {} | A {}",
            part(&self.home),
            part(&self.draw),
            part(&self.away)
        )
    }
}

/// Per-bucket stake in bankroll units, two decimal places.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stakes {
    pub home: Decimal,
    pub draw: Decimal,
    pub away: Decimal,
}

impl Stakes {
    pub fn get(&self, kind: OutcomeKind) -> Decimal {
        match kind {
            OutcomeKind::Home => self.home,
            OutcomeKind::Draw => self.draw,
            OutcomeKind::Away => self.away,
        }
    }

    pub fn total(&self) -> Decimal {
        self.home + self.draw + self.away
    }
}

/// An event whose best prices guarantee a profit, with the stake split that
/// realizes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub event_label: String,
    pub commence_time: String,
    pub best_odds: BestOdds,
    pub stakes: Stakes,
    pub total_stake: Decimal,
    pub payout: Decimal,
    pub profit: Decimal,
    pub margin: Decimal,
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] margin={:.2}% stake={} payout={} profit={}",
            self.event_label,
            self.best_odds,
            self.margin * Decimal::ONE_HUNDRED,
            self.total_stake,
            self.payout,
            self.profit,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why an event was left out of the opportunity list.
///
/// These are normal outcomes of a pass, not failures: callers of the HTTP
/// endpoint never see them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Exclusion {
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Incomplete market: no price for {missing:?}")]
    IncompleteMarket { missing: Vec<OutcomeKind> },

    #[error("No arbitrage: margin {margin}")]
    NoArbitrage { margin: Decimal },
}

/// Domain-specific error types for ARBSCAN.
#[derive(Debug, thiserror::Error)]
pub enum ArbError {
    #[error("No odds data source available: {0}")]
    DataSourceUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
