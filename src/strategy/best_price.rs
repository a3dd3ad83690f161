//! Best-price selection across bookmakers.

use tracing::debug;

use super::classify::{classify, is_recognised};
use crate::types::{BestOdds, Event, PriceSlot};

/// Scan every bookmaker's head-to-head market and keep the highest price
/// per bucket together with the bookmaker offering it.
///
/// Bookmakers without a head-to-head market are skipped. A price replaces
/// the current best only when strictly greater, so ties stay with the
/// bookmaker listed first. Buckets nobody prices are left at zero.
pub fn select_best_prices(event: &Event) -> BestOdds {
    let mut best = BestOdds::default();

    for book in &event.bookmakers {
        let Some(market) = book.h2h_market() else {
            continue;
        };

        for outcome in &market.outcomes {
            if !is_recognised(&outcome.name, event) {
                debug!(
                    event = %event.label(),
                    bookmaker = %book.title,
                    outcome = %outcome.name,
                    "Unrecognised outcome name, counted as away"
                );
            }

            let slot = best.slot_mut(classify(&outcome.name, event));
            if outcome.price > slot.price {
                *slot = PriceSlot {
                    price: outcome.price,
                    source: Some(book.title.clone()),
                };
            }
        }
    }

    best
}
