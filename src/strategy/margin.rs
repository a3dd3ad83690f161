//! Market margin from a best-price triple.
//!
//! `inv_sum = Σ 1/price` is the implied probability mass of the combined
//! best prices; `margin = 1 − inv_sum`. A positive margin means the three
//! prices together imply less than 100% and a guaranteed-profit split exists.
//!
//! `1/price` is rounded at 28 digits, so a fair book such as 3/3/3 sums to
//! just under one. The arbitrage decision therefore uses the division-free
//! form `h·d·a > d·a + h·a + h·d`, exact for prices quoted to a few decimals.

use rust_decimal::Decimal;

use crate::types::{BestOdds, Exclusion};

/// Implied-probability sum and margin of one event's best prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketMargin {
    pub inv_sum: Decimal,
    pub margin: Decimal,
    /// Exact comparison of the implied mass against one.
    underround: bool,
}

impl MarketMargin {
    pub fn is_arbitrage(&self) -> bool {
        self.underround && self.margin > Decimal::ZERO
    }
}

/// Compute the margin of a best-price triple.
///
/// Fails with `IncompleteMarket` when any bucket has no price.
pub fn market_margin(best: &BestOdds) -> Result<MarketMargin, Exclusion> {
    let Some(prices) = best.prices() else {
        return Err(Exclusion::IncompleteMarket {
            missing: best.missing(),
        });
    };

    let out_of_range = || Exclusion::MalformedEvent("prices out of range".into());

    let inv_sum = prices
        .iter()
        .try_fold(Decimal::ZERO, |acc, price| {
            Decimal::ONE.checked_div(*price)?.checked_add(acc)
        })
        .ok_or_else(out_of_range)?;

    let [h, d, a] = prices;
    let product = h.checked_mul(d).and_then(|hd| hd.checked_mul(a));
    let pair_sum = d
        .checked_mul(a)
        .zip(h.checked_mul(a))
        .zip(h.checked_mul(d))
        .and_then(|((da, ha), hd)| da.checked_add(ha)?.checked_add(hd));
    let (product, pair_sum) = product.zip(pair_sum).ok_or_else(out_of_range)?;

    Ok(MarketMargin {
        inv_sum,
        margin: Decimal::ONE - inv_sum,
        underround: product > pair_sum,
    })
}
