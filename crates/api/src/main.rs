//! Demo entrypoint: seeds a small catalog, runs one receive→stage→record
//! cycle, and prints the resulting reports as JSON.

use rust_decimal::Decimal;

use foodledger_api::SupplyChainService;
use foodledger_catalog::{Product, RecipeItem};
use foodledger_core::{
    DomainResult, IngredientId, ManufacturerId, ProductId, SessionToken, SupplierId,
};
use foodledger_ledger::TraceFilter;

fn oz(s: &str) -> Decimal {
    s.parse().unwrap_or(Decimal::ZERO)
}

fn run() -> DomainResult<()> {
    let service = SupplyChainService::new();

    let beef = IngredientId::new(101);
    let salt = IngredientId::new(102);
    let steak_dinner = ProductId::new(100);
    let supplier = SupplierId::new(21);
    let mfg = ManufacturerId::new("MFG001")?;

    service.register_atomic_ingredient(beef, "Beef")?;
    service.register_atomic_ingredient(salt, "Salt")?;
    service.register_product(Product::new(
        steak_dinner,
        mfg.clone(),
        "100",
        "Steak Dinner",
        50,
    )?)?;
    service.add_recipe_plan(
        steak_dinner,
        vec![
            RecipeItem::new(beef, oz("5"))?,
            RecipeItem::new(salt, oz("0.25"))?,
        ],
    )?;

    let today = chrono::Utc::now().date_naive();
    service.receive_lot(beef, supplier, oz("600"), oz("0.10"), today + chrono::Duration::days(120))?;
    service.receive_lot(salt, supplier, oz("50"), oz("0.25"), today + chrono::Duration::days(365))?;

    let token = SessionToken::generate();
    service.plan_fefo(&token, steak_dinner, 100)?;
    let recorded = service.record_batch(&token, steak_dinner, 100, mfg)?;
    tracing::info!(batch = %recorded.code, "demo batch recorded");

    let on_hand = service.on_hand_report()?;
    let costs = service.batch_cost_report(10)?;
    let recall = service.trace_recall(&TraceFilter::ingredient(beef))?;
    println!("{}", serde_json::to_string_pretty(&on_hand).unwrap_or_default());
    println!("{}", serde_json::to_string_pretty(&costs).unwrap_or_default());
    println!("{}", serde_json::to_string_pretty(&recall).unwrap_or_default());
    Ok(())
}

fn main() {
    foodledger_observability::init();
    if let Err(err) = run() {
        tracing::error!(%err, "demo run failed");
        std::process::exit(1);
    }
}
