//! Stake allocation for an arbitrage opportunity.
//!
//! Splits a fixed bankroll across the three outcomes in proportion to their
//! implied probabilities, so every outcome returns the same amount before
//! rounding:
//!
//!   s_i = B × (1/price_i) / inv_sum      ⇒      s_i × price_i = B / inv_sum
//!
//! Stakes are then rounded to whole cents (half-up). Rounding makes the three
//! returns drift apart by a few cents, so the guaranteed payout is the
//! smallest of them, reported to the cent with the same half-up rule.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::margin::MarketMargin;
use crate::types::{ArbError, BestOdds, Exclusion, OutcomeKind, Stakes};

/// Monetary precision: two decimal places.
const CENTS: u32 = 2;

/// Stake split and its guaranteed result.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub stakes: Stakes,
    /// Sum of the rounded stakes. May differ from the bankroll by a cent
    /// or two; the drift is reported, not corrected.
    pub total_stake: Decimal,
    /// Worst-case return across the three outcomes.
    pub payout: Decimal,
    pub profit: Decimal,
}

/// Allocates a fixed bankroll across the outcomes of an arbitrage.
#[derive(Debug, Clone)]
pub struct StakeAllocator {
    bankroll: Decimal,
}

impl StakeAllocator {
    /// Create an allocator. The bankroll must be positive.
    pub fn new(bankroll: Decimal) -> Result<Self, ArbError> {
        if bankroll <= Decimal::ZERO {
            return Err(ArbError::Config(format!(
                "bankroll must be positive, got {bankroll}"
            )));
        }
        Ok(Self { bankroll })
    }

    pub fn bankroll(&self) -> Decimal {
        self.bankroll
    }

    /// Compute stakes, payout and profit for a profitable triple.
    ///
    /// `margin` must come from `market_margin(best)` and be an arbitrage;
    /// the allocator does not re-check profitability.
    pub fn allocate(&self, best: &BestOdds, margin: &MarketMargin) -> Result<Allocation, Exclusion> {
        let out_of_range = || Exclusion::MalformedEvent("stake arithmetic out of range".into());

        let mut stakes = Stakes::default();
        let mut payout: Option<Decimal> = None;

        for kind in OutcomeKind::ALL {
            let price = best.slot(kind).price;
            // (1/p) / inv_sum ≤ 1, so scaling by the bankroll last cannot overflow.
            let share = Decimal::ONE
                .checked_div(price)
                .and_then(|inv| inv.checked_div(margin.inv_sum))
                .ok_or_else(out_of_range)?;
            let stake = round_cents(self.bankroll.checked_mul(share).ok_or_else(out_of_range)?);
            let ret = stake.checked_mul(price).ok_or_else(out_of_range)?;

            match kind {
                OutcomeKind::Home => stakes.home = stake,
                OutcomeKind::Draw => stakes.draw = stake,
                OutcomeKind::Away => stakes.away = stake,
            }
            payout = Some(payout.map_or(ret, |p: Decimal| p.min(ret)));
        }

        let total_stake = stakes.total();
        let payout = round_cents(payout.ok_or_else(out_of_range)?);
        let profit = payout - total_stake;

        debug!(
            bankroll = %self.bankroll,
            home = %stakes.home,
            draw = %stakes.draw,
            away = %stakes.away,
            total = %total_stake,
            payout = %payout,
            profit = %profit,
            "Stakes allocated"
        );

        Ok(Allocation {
            stakes,
            total_stake,
            payout,
            profit,
        })
    }
}

/// Round half-up to whole cents.
fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero)
}
