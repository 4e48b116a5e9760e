//! Black-box exercises of the public service facade, wired exactly as a
//! caller would wire it.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use foodledger_api::SupplyChainService;
use foodledger_catalog::{Product, RecipeItem};
use foodledger_core::{
    DomainError, FixedClock, IngredientId, ManufacturerId, ProductId, SessionToken, SupplierId,
};
use foodledger_ledger::TraceFilter;

const BEEF: IngredientId = IngredientId::new(101);
const SALT: IngredientId = IngredientId::new(102);
const FISH: IngredientId = IngredientId::new(103);
const STEAK_DINNER: ProductId = ProductId::new(100);
const FISH_DINNER: ProductId = ProductId::new(200);
const SUPPLIER: SupplierId = SupplierId::new(21);

fn oz(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn mfg() -> ManufacturerId {
    ManufacturerId::new("MFG001").unwrap()
}

fn service() -> SupplyChainService {
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
    let service = SupplyChainService::with_clock(Arc::new(clock));
    service.register_atomic_ingredient(BEEF, "Beef").unwrap();
    service.register_atomic_ingredient(SALT, "Salt").unwrap();
    service.register_atomic_ingredient(FISH, "Fish").unwrap();
    service
        .register_product(Product::new(STEAK_DINNER, mfg(), "100", "Steak Dinner", 50).unwrap())
        .unwrap();
    service
        .add_recipe_plan(
            STEAK_DINNER,
            vec![
                RecipeItem::new(BEEF, oz("5")).unwrap(),
                RecipeItem::new(SALT, oz("0.25")).unwrap(),
            ],
        )
        .unwrap();
    service.add_incompatible_pair(BEEF, FISH).unwrap();
    service
}

#[test]
fn fefo_planning_stages_earliest_expiring_lots_first() {
    let service = service();
    // Beef arrives in two lots; the earlier-expiring one must drain first.
    let late = service
        .receive_lot(BEEF, SUPPLIER, oz("400"), oz("0.12"), date(2026, 12, 1))
        .unwrap();
    let early = service
        .receive_lot(BEEF, SUPPLIER, oz("400"), oz("0.10"), date(2026, 7, 1))
        .unwrap();
    service
        .receive_lot(SALT, SUPPLIER, oz("100"), oz("0.25"), date(2027, 3, 1))
        .unwrap();

    let token = SessionToken::generate();
    let allocations = service.plan_fefo(&token, STEAK_DINNER, 100).unwrap();

    // 500 oz beef: all 400 of the early lot, 100 of the late one, 25 oz salt.
    assert_eq!(allocations.len(), 3);
    assert_eq!(allocations[0].lot_id, early.lot_id);
    assert_eq!(allocations[0].qty_oz, oz("400"));
    assert_eq!(allocations[1].lot_id, late.lot_id);
    assert_eq!(allocations[1].qty_oz, oz("100"));
    assert_eq!(allocations[2].qty_oz, oz("25"));

    let recorded = service.record_batch(&token, STEAK_DINNER, 100, mfg()).unwrap();
    assert_eq!(service.lot(early.lot_id).unwrap().on_hand_oz(), oz("0"));
    assert_eq!(service.lot(late.lot_id).unwrap().on_hand_oz(), oz("300"));

    // 400*0.10 + 100*0.12 + 25*0.25 = 58.25 over 100 units.
    assert_eq!(recorded.batch_cost, oz("58.25"));
    assert_eq!(recorded.unit_cost, oz("0.5825"));
}

#[test]
fn fefo_shortfall_clears_the_session_and_reports_the_gap() {
    let service = service();
    service
        .receive_lot(BEEF, SUPPLIER, oz("100"), oz("0.10"), date(2026, 7, 1))
        .unwrap();
    service
        .receive_lot(SALT, SUPPLIER, oz("100"), oz("0.25"), date(2027, 3, 1))
        .unwrap();

    // 100 units need 500 oz beef; only 100 on hand.
    let token = SessionToken::generate();
    let err = service.plan_fefo(&token, STEAK_DINNER, 100).unwrap_err();
    match err {
        DomainError::InsufficientStock(_) => {}
        other => panic!("expected InsufficientStock error, got {other:?}"),
    }
    assert!(service.staged_requests(&token).unwrap().is_empty());
}

#[test]
fn recall_report_rolls_up_distinct_batches_and_units() {
    let service = service();
    let beef = service
        .receive_lot(BEEF, SUPPLIER, oz("1000"), oz("0.10"), date(2026, 7, 1))
        .unwrap();
    let salt = service
        .receive_lot(SALT, SUPPLIER, oz("100"), oz("0.25"), date(2027, 3, 1))
        .unwrap();

    for _ in 0..2 {
        let token = SessionToken::generate();
        service.stage_consumption(&token, beef.lot_id, oz("250")).unwrap();
        service.stage_consumption(&token, salt.lot_id, oz("15")).unwrap();
        service.record_batch(&token, STEAK_DINNER, 50, mfg()).unwrap();
    }

    let report = service
        .trace_recall(&TraceFilter::lot(beef.code.clone()))
        .unwrap();
    assert_eq!(report.affected_batches, 2);
    assert_eq!(report.total_units, 100);
    // One row per batch for the beef lot filter.
    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|r| r.lot_code == beef.code));
}

#[test]
fn reports_summarize_stock_expiry_and_costs() {
    let service = service();
    let beef = service
        .receive_lot(BEEF, SUPPLIER, oz("600"), oz("0.10"), date(2026, 5, 30))
        .unwrap();
    service
        .receive_lot(SALT, SUPPLIER, oz("100"), oz("0.25"), date(2027, 3, 1))
        .unwrap();

    let token = SessionToken::generate();
    service.stage_consumption(&token, beef.lot_id, oz("100")).unwrap();
    let recorded = service.record_batch(&token, STEAK_DINNER, 50, mfg()).unwrap();

    let on_hand = service.on_hand_report().unwrap();
    assert_eq!(on_hand.len(), 2);
    assert_eq!(on_hand[0].ingredient_id, BEEF);
    assert_eq!(on_hand[0].on_hand_oz, oz("500"));
    assert_eq!(on_hand[1].ingredient_id, SALT);
    assert_eq!(on_hand[1].on_hand_oz, oz("100"));

    // Beef expires 90 days out of the fixed clock date; salt much later.
    let expiring = service.expiring_report(90).unwrap();
    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0].lot_code, beef.code);

    let costs = service.batch_cost_report(10).unwrap();
    assert_eq!(costs.len(), 1);
    assert_eq!(costs[0].batch_id, recorded.batch_id);
    assert_eq!(costs[0].batch_cost, oz("10"));
}

#[test]
fn compliance_queries_cover_sets_and_product_pairs() {
    let service = service();
    service
        .register_product(Product::new(FISH_DINNER, mfg(), "200", "Fish Dinner", 25).unwrap())
        .unwrap();
    service
        .add_recipe_plan(FISH_DINNER, vec![RecipeItem::new(FISH, oz("4")).unwrap()])
        .unwrap();

    let conflicts = service
        .check_incompatibility(&[BEEF, SALT, FISH])
        .unwrap();
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].involves(BEEF) && conflicts[0].involves(FISH));

    assert!(service.check_incompatibility(&[BEEF, SALT]).unwrap().is_empty());

    let cross = service.compare_products(STEAK_DINNER, FISH_DINNER).unwrap();
    assert_eq!(cross.len(), 1);
}

#[test]
fn formulation_versions_resolve_by_date() {
    let service = service();
    service
        .add_formulation(SUPPLIER, BEEF, oz("16"), oz("1.60"), date(2026, 1, 1), Some(date(2026, 6, 30)))
        .unwrap();
    service
        .add_formulation(SUPPLIER, BEEF, oz("16"), oz("1.75"), date(2026, 7, 1), None)
        .unwrap();

    let spring = service
        .formulation_on(SUPPLIER, BEEF, date(2026, 3, 15))
        .unwrap()
        .unwrap();
    assert_eq!(spring.unit_price, oz("1.60"));

    let autumn = service
        .formulation_on(SUPPLIER, BEEF, date(2026, 10, 1))
        .unwrap()
        .unwrap();
    assert_eq!(autumn.unit_price, oz("1.75"));

    // A third version overlapping the open-ended one is rejected.
    let err = service
        .add_formulation(SUPPLIER, BEEF, oz("16"), oz("1.80"), date(2026, 9, 1), None)
        .unwrap_err();
    match err {
        DomainError::OverlappingFormulation(_) => {}
        other => panic!("expected OverlappingFormulation error, got {other:?}"),
    }
}
