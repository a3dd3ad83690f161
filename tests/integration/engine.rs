//! End-to-end engine passes over hand-built batches and the bundled dataset.
//!
//! Exercises the public API only: events go in, opportunities and
//! exclusions come out.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;

use arbscan::data::decode_events;
use arbscan::strategy::best_price::select_best_prices;
use arbscan::strategy::ArbitrageEngine;
use arbscan::types::{Bookmaker, Event, Exclusion, Market, Outcome, OutcomeKind, H2H_MARKET};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn book(title: &str, prices: &[(&str, Decimal)]) -> Bookmaker {
    Bookmaker {
        title: title.into(),
        markets: vec![Market {
            key: H2H_MARKET.into(),
            outcomes: prices
                .iter()
                .map(|(name, price)| Outcome { name: (*name).into(), price: *price })
                .collect(),
        }],
    }
}

fn event(home: &str, away: &str, bookmakers: Vec<Bookmaker>) -> Event {
    Event {
        home_team: home.into(),
        away_team: away.into(),
        commence_time: "2026-04-11T14:00:00Z".into(),
        bookmakers,
    }
}

/// Best prices 2.50 / 3.50 / 4.50 spread over three books.
fn spread_arb() -> Event {
    event(
        "Porto",
        "Benfica",
        vec![
            book("A", &[("Porto", dec!(2.50)), ("Draw", dec!(3.20)), ("Benfica", dec!(4.00))]),
            book("B", &[("Porto", dec!(2.30)), ("Draw", dec!(3.50)), ("Benfica", dec!(4.10))]),
            book("C", &[("Porto", dec!(2.40)), ("Draw", dec!(3.30)), ("Benfica", dec!(4.50))]),
        ],
    )
}

fn overround() -> Event {
    event(
        "Ajax",
        "PSV",
        vec![book("A", &[("Ajax", dec!(2.00)), ("Draw", dec!(3.00)), ("PSV", dec!(3.50))])],
    )
}

fn bundled_events() -> Vec<Event> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sample-odds.json");
    let raw = std::fs::read_to_string(&path).unwrap();
    decode_events(serde_json::from_str(&raw).unwrap()).unwrap()
}

fn engine() -> ArbitrageEngine {
    ArbitrageEngine::new(dec!(100)).unwrap()
}

// ---------------------------------------------------------------------------
// Best-price selection
// ---------------------------------------------------------------------------

#[test]
fn test_best_price_is_maximum_across_books() {
    let ev = spread_arb();
    let best = select_best_prices(&ev);

    for kind in OutcomeKind::ALL {
        let slot = best.slot(kind);
        let quoted_max = ev
            .bookmakers
            .iter()
            .flat_map(|b| b.markets.iter())
            .flat_map(|m| m.outcomes.iter())
            .filter(|o| match kind {
                OutcomeKind::Home => o.name == ev.home_team,
                OutcomeKind::Away => o.name == ev.away_team,
                OutcomeKind::Draw => o.name == "Draw",
            })
            .map(|o| o.price)
            .max()
            .unwrap();
        assert_eq!(slot.price, quoted_max, "{kind}");
    }

    assert_eq!(best.home.source.as_deref(), Some("A"));
    assert_eq!(best.draw.source.as_deref(), Some("B"));
    assert_eq!(best.away.source.as_deref(), Some("C"));
}

#[test]
fn test_tied_price_keeps_first_book() {
    let ev = event(
        "Lazio",
        "Roma",
        vec![
            book("First", &[("Lazio", dec!(2.80)), ("Draw", dec!(3.30)), ("Roma", dec!(2.70))]),
            book("Second", &[("Lazio", dec!(2.80)), ("Draw", dec!(3.30)), ("Roma", dec!(2.70))]),
        ],
    );
    let best = select_best_prices(&ev);
    for kind in OutcomeKind::ALL {
        assert_eq!(best.slot(kind).source.as_deref(), Some("First"));
    }
}

// ---------------------------------------------------------------------------
// Full passes
// ---------------------------------------------------------------------------

#[test]
fn test_reference_opportunity() {
    let opp = engine().assess(&spread_arb()).unwrap();

    assert_eq!(opp.event_label, "Porto vs Benfica");
    assert_eq!(opp.commence_time, "2026-04-11T14:00:00Z");
    assert_eq!(opp.stakes.home, dec!(44.06));
    assert_eq!(opp.stakes.draw, dec!(31.47));
    assert_eq!(opp.stakes.away, dec!(24.48));
    assert_eq!(opp.total_stake, dec!(100.01));
    assert_eq!(opp.payout, dec!(110.15));
    assert_eq!(opp.profit, dec!(10.14));
    assert!(opp.margin > dec!(0.092) && opp.margin < dec!(0.0921));
}

#[test]
fn test_overround_excluded_with_negative_margin() {
    match engine().assess(&overround()) {
        Err(Exclusion::NoArbitrage { margin }) => assert!(margin < Decimal::ZERO),
        other => panic!("expected NoArbitrage, got {other:?}"),
    }
}

#[test]
fn test_missing_draw_reported_as_incomplete() {
    let ev = event(
        "Hearts",
        "Hibernian",
        vec![book("A", &[("Hearts", dec!(2.10)), ("Hibernian", dec!(3.40))])],
    );
    assert_eq!(
        engine().assess(&ev),
        Err(Exclusion::IncompleteMarket { missing: vec![OutcomeKind::Draw] })
    );
}

#[test]
fn test_scan_keeps_input_order_and_reasons() {
    let malformed = Event {
        home_team: String::new(),
        ..overround()
    };
    let batch = vec![
        overround(),
        spread_arb(),
        malformed,
        event("X", "Y", Vec::new()),
        spread_arb(),
    ];

    let report = engine().scan(&batch);
    assert_eq!(report.events_scanned(), 5);
    assert_eq!(report.opportunities.len(), 2);
    assert!(report.opportunities.iter().all(|o| o.event_label == "Porto vs Benfica"));

    let indices: Vec<usize> = report.excluded.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 2, 3]);
    assert!(matches!(report.excluded[0].reason, Exclusion::NoArbitrage { .. }));
    assert!(matches!(report.excluded[1].reason, Exclusion::MalformedEvent(_)));
    assert_eq!(
        report.excluded[2].reason,
        Exclusion::IncompleteMarket { missing: OutcomeKind::ALL.to_vec() }
    );
}

#[test]
fn test_stake_total_stays_near_bankroll() {
    for bankroll in [dec!(10), dec!(100), dec!(1000), dec!(2500.50)] {
        let opp = ArbitrageEngine::new(bankroll).unwrap().assess(&spread_arb()).unwrap();
        assert!((opp.total_stake - bankroll).abs() <= dec!(0.015), "bankroll {bankroll}");
        assert_eq!(opp.total_stake, opp.stakes.total());
        assert_eq!(opp.profit, opp.payout - opp.total_stake);
        // Payout is the worst return rounded half-up, so it sits within half a cent.
        for kind in OutcomeKind::ALL {
            let ret = opp.stakes.get(kind) * opp.best_odds.slot(kind).price;
            assert!(ret + dec!(0.005) >= opp.payout, "bankroll {bankroll}, {kind}");
        }
    }
}

#[test]
fn test_thin_margin_keeps_its_cent() {
    let ev = event(
        "Hibs",
        "Aberdeen",
        vec![
            book("A", &[("Hibs", dec!(2.80)), ("Draw", dec!(2.90)), ("Aberdeen", dec!(3.10))]),
            book("B", &[("Hibs", dec!(2.70)), ("Draw", dec!(2.96)), ("Aberdeen", dec!(3.28))]),
        ],
    );
    let opp = engine().assess(&ev).unwrap();
    assert_eq!(opp.total_stake, dec!(100.00));
    assert_eq!(opp.payout, dec!(100.01));
    assert_eq!(opp.profit, dec!(0.01));
}

#[test]
fn test_pass_is_deterministic() {
    let batch = vec![spread_arb(), overround(), spread_arb()];
    let first = serde_json::to_string(&engine().opportunities(&batch)).unwrap();
    let second = serde_json::to_string(&engine().opportunities(&batch)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_engine_rejects_non_positive_bankroll() {
    assert!(ArbitrageEngine::new(Decimal::ZERO).is_err());
    assert!(ArbitrageEngine::new(dec!(-5)).is_err());
}

// ---------------------------------------------------------------------------
// Bundled dataset
// ---------------------------------------------------------------------------

#[test]
fn test_bundled_dataset_pass() {
    let events = bundled_events();
    assert_eq!(events.len(), 5);

    let report = engine().scan(&events);
    let labels: Vec<&str> = report.opportunities.iter().map(|o| o.event_label.as_str()).collect();
    assert_eq!(labels, vec!["Arsenal vs Chelsea", "Inter Milan vs AC Milan"]);

    let arsenal = &report.opportunities[0];
    assert_eq!(arsenal.best_odds.home.source.as_deref(), Some("Bet365"));
    assert_eq!(arsenal.best_odds.draw.source.as_deref(), Some("Unibet"));
    assert_eq!(arsenal.best_odds.away.source.as_deref(), Some("Pinnacle"));
    assert_eq!(arsenal.profit, dec!(10.14));

    let inter = &report.opportunities[1];
    assert_eq!(inter.stakes.home, dec!(52.90));
    assert_eq!(inter.stakes.draw, dec!(26.45));
    assert_eq!(inter.stakes.away, dec!(20.65));
    assert_eq!(inter.total_stake, dec!(100.00));
    assert_eq!(inter.payout, dec!(108.41));
    assert_eq!(inter.profit, dec!(8.41));

    assert_eq!(report.count_excluded(|r| matches!(r, Exclusion::NoArbitrage { .. })), 2);
    assert_eq!(
        report.count_excluded(|r| matches!(r, Exclusion::IncompleteMarket { .. })),
        1
    );
    let bayern = report.excluded.iter().find(|e| e.index == 2).unwrap();
    assert_eq!(
        bayern.reason,
        Exclusion::IncompleteMarket { missing: vec![OutcomeKind::Away] }
    );
}

#[test]
fn test_opportunity_json_shape() {
    let opp = engine().assess(&spread_arb()).unwrap();
    let json = serde_json::to_value(&opp).unwrap();

    for key in ["eventLabel", "commenceTime", "bestOdds", "stakes", "totalStake", "payout", "profit", "margin"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["bestOdds"]["draw"]["source"], "B");
    assert!((json["profit"].as_f64().unwrap() - 10.14).abs() < 1e-9);
}
