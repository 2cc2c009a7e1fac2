//! Offline labeling: raw menu rows in, normalized/tagged/scored catalog out

use anyhow::{Context, Result};
use drinkscore::{Catalog, RawDrinkRow};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        anyhow::bail!("usage: {} <raw_rows.json> <labeled_catalog.json>", args[0]);
    }
    let (input, output) = (&args[1], &args[2]);

    let raw = std::fs::read(input).with_context(|| format!("Failed to read {}", input))?;
    let rows: Vec<RawDrinkRow> =
        serde_json::from_slice(&raw).with_context(|| format!("Invalid raw rows in {}", input))?;

    let catalog = Catalog::from_raw_rows(&rows);
    let records = catalog.to_records();

    let json = serde_json::to_vec_pretty(&records)?;
    std::fs::write(output, json).with_context(|| format!("Failed to write {}", output))?;

    info!("Labeled {} rows into {}", records.len(), output);
    Ok(())
}
