//! drinkscore HTTP server binary

use anyhow::Context;
use drinkscore::artifacts::{load_artifacts, store_for, ArtifactNames};
use drinkscore::server::run_server;
use drinkscore::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    println!("drinkscore - beverage scoring & recommendation");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let config = ServiceConfig::from_env();

    // Check for --use-real flag
    let use_real = std::env::args().any(|arg| arg == "--use-real");

    let engine = if use_real {
        println!("✓ Mode: REAL trained models");
        match &config.artifacts_url {
            Some(url) => println!("✓ Artifact host: {}", url),
            None => println!("✓ Artifact dir: {}", config.artifacts_dir.display()),
        }

        let store = store_for(&config);
        let loaded = load_artifacts(store.as_ref(), &ArtifactNames::from(&config))
            .await
            .context("Failed to load startup artifacts")?;

        RecommendationEngine::new(
            Arc::new(loaded.catalog),
            Arc::new(loaded.score_model),
            Arc::new(loaded.text_model),
            &config.engine,
        )?
    } else {
        println!("✓ Mode: DEMO catalog with rule-based stand-in models");
        println!("   (use --use-real to load trained artifacts)");

        let catalog = Catalog::from_raw_rows(&create_demo_rows());
        let feature_names = FeatureSchema::names_for_catalog(&catalog);

        RecommendationEngine::new(
            Arc::new(catalog),
            Arc::new(RuleScorePredictor::new(feature_names)),
            Arc::new(KeywordTagClassifier::new()),
            &config.engine,
        )?
    };

    println!("✓ Engine initialized with {} drinks", engine.catalog().len());
    println!("✓ Starting HTTP server on port {}...", config.port);
    println!();

    run_server(engine, config.port).await?;

    Ok(())
}

fn demo_row(
    category: &str,
    beverage: &str,
    prep: &str,
    nutrition: [&str; 6],
) -> RawDrinkRow {
    let cell = |raw: &str| Some(RawCell::Text(raw.to_string()));
    let [calories, sugars, protein, fat, caffeine, calcium] = nutrition;

    RawDrinkRow {
        beverage_category: Some(category.to_string()),
        beverage: beverage.to_string(),
        beverage_prep: prep.to_string(),
        calories: cell(calories),
        sugars: cell(sugars),
        protein: cell(protein),
        total_fat: cell(fat),
        caffeine: cell(caffeine),
        calcium: cell(calcium),
    }
}

/// Small menu excerpt for running without trained artifacts
fn create_demo_rows() -> Vec<RawDrinkRow> {
    vec![
        demo_row("Coffee", "Brewed Coffee", "Short", ["3", "0", "0.3", "0.1", "175", "0%"]),
        demo_row("Coffee", "Brewed Coffee", "Grande", ["5", "0", "1.0", "0.1", "330", "0%"]),
        demo_row("Coffee", "Brewed Coffee", "Venti", ["5", "0", "1.0", "0.1", "410", "2%"]),
        demo_row("Classic Espresso Drinks", "Caffè Latte", "Tall Nonfat Milk", ["100", "14", "10", "0.2", "75", "30%"]),
        demo_row("Classic Espresso Drinks", "Caffè Latte", "Grande 2% Milk", ["190", "17", "12", "7", "150", "40%"]),
        demo_row("Classic Espresso Drinks", "Caffè Latte", "Venti Whole Milk", ["290", "25", "15", "15", "150", "50%"]),
        demo_row("Classic Espresso Drinks", "Caffè Latte", "Grande Soymilk", ["170", "15", "10", "6", "150", "40%"]),
        demo_row("Classic Espresso Drinks", "Caffè Mocha (Without Whipped Cream)", "Tall Nonfat Milk", ["170", "27", "10", "1.5", "95", "25%"]),
        demo_row("Classic Espresso Drinks", "Caffè Mocha (Without Whipped Cream)", "Venti Whole Milk", ["400", "45", "16", "15", "185", "45%"]),
        demo_row("Frappuccino® Blended Coffee", "Caramel Frappuccino (With Whipped Cream)", "Venti Whole Milk", ["510", "76", "6", "17", "120", "20%"]),
        demo_row("Frappuccino® Blended Coffee", "Caramel Frappuccino (Without Whipped Cream)", "Tall Nonfat Milk", ["180", "38", "3", "0.1", "70", "10%"]),
        demo_row("Frappuccino® Blended Coffee", "Caramel Frappuccino (Without Whipped Cream)", "Grande Almond Milk", ["250", "49", "2", "3", "95", "15%"]),
        demo_row("Tazo® Tea Drinks", "Tazo® Full-Leaf Tea", "Grande", ["0", "0", "0", "0", "Varies", "0%"]),
        demo_row("Tazo® Tea Drinks", "Tazo® Chai Tea Latte", "Tall Oat Milk", ["190", "32", "5", "3", "70", "15%"]),
        demo_row("Smoothies", "Banana Chocolate Smoothie", "Grande Nonfat Milk", ["280", "32", "20", "2.5", "15", "20%"]),
    ]
}
