//! Arbitrage engine: best-price selection, margin, stake allocation.

pub mod best_price;
pub mod classify;
pub mod margin;
pub mod stakes;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::types::{ArbError, Event, Exclusion, Opportunity};
use best_price::select_best_prices;
use margin::market_margin;
use stakes::StakeAllocator;

// ---------------------------------------------------------------------------
// Scan report
// ---------------------------------------------------------------------------

/// An event left out of a pass, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedEvent {
    /// Position of the event in the input batch.
    pub index: usize,
    pub label: String,
    pub reason: Exclusion,
}

/// Result of one engine pass over an event batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Opportunities in input order.
    pub opportunities: Vec<Opportunity>,
    pub excluded: Vec<ExcludedEvent>,
}

impl ScanReport {
    pub fn events_scanned(&self) -> usize {
        self.opportunities.len() + self.excluded.len()
    }

    /// Number of exclusions matching `pred`, e.g. all `NoArbitrage` cases.
    pub fn count_excluded(&self, pred: impl Fn(&Exclusion) -> bool) -> usize {
        self.excluded.iter().filter(|e| pred(&e.reason)).count()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Pipelines validation → best prices → margin → stake allocation for every
/// event of a batch.
///
/// Holds only the bankroll; every pass works on the batch it is given and
/// keeps nothing between calls, so one engine can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ArbitrageEngine {
    allocator: StakeAllocator,
}

impl ArbitrageEngine {
    pub fn new(bankroll: Decimal) -> Result<Self, ArbError> {
        Ok(Self {
            allocator: StakeAllocator::new(bankroll)?,
        })
    }

    pub fn bankroll(&self) -> Decimal {
        self.allocator.bankroll()
    }

    /// Run the full pipeline for one event.
    ///
    /// `Err` names the filter that dropped the event; none of them is a
    /// failure of the pass.
    pub fn assess(&self, event: &Event) -> Result<Opportunity, Exclusion> {
        event.validate()?;

        let best = select_best_prices(event);
        let margin = market_margin(&best)?;
        if !margin.is_arbitrage() {
            return Err(Exclusion::NoArbitrage {
                margin: margin.margin,
            });
        }

        let alloc = self.allocator.allocate(&best, &margin)?;

        Ok(Opportunity {
            event_label: event.label(),
            commence_time: event.commence_time.clone(),
            best_odds: best,
            stakes: alloc.stakes,
            total_stake: alloc.total_stake,
            payout: alloc.payout,
            profit: alloc.profit,
            margin: margin.margin,
        })
    }

    /// Assess every event of a batch, keeping input order.
    pub fn scan(&self, events: &[Event]) -> ScanReport {
        let mut report = ScanReport::default();

        for (index, event) in events.iter().enumerate() {
            match self.assess(event) {
                Ok(opp) => {
                    if opp.profit <= Decimal::ZERO {
                        warn!(
                            event = %opp.event_label,
                            margin = %opp.margin,
                            profit = %opp.profit,
                            "Cent rounding erased the arbitrage profit"
                        );
                    } else {
                        debug!(opportunity = %opp, "Arbitrage found");
                    }
                    report.opportunities.push(opp);
                }
                Err(reason) => {
                    debug!(index, event = %event.label(), reason = %reason, "Event excluded");
                    report.excluded.push(ExcludedEvent {
                        index,
                        label: event.label(),
                        reason,
                    });
                }
            }
        }

        info!(
            events = events.len(),
            opportunities = report.opportunities.len(),
            incomplete = report.count_excluded(|r| matches!(r, Exclusion::IncompleteMarket { .. })),
            no_arbitrage = report.count_excluded(|r| matches!(r, Exclusion::NoArbitrage { .. })),
            malformed = report.count_excluded(|r| matches!(r, Exclusion::MalformedEvent(_))),
            "Scan complete"
        );

        report
    }

    /// Opportunities only, in input order.
    pub fn opportunities(&self, events: &[Event]) -> Vec<Opportunity> {
        self.scan(events).opportunities
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
