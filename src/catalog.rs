//! Immutable catalog snapshot of normalized, tagged, scored drink variants

use crate::normalizer::normalize_row;
use crate::scoring::health_score;
use crate::tags::tag_variant;
use crate::types::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Read-only set of drink variants. Re-tagging or re-labelling yields a new snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    variants: Vec<DrinkVariant>,
}

pub type SharedCatalog = Arc<Catalog>;

impl Catalog {
    pub fn new(variants: Vec<DrinkVariant>) -> Self {
        Self { variants }
    }

    /// Normalize, tag and label raw source rows. Duplicate identities are kept.
    pub fn from_raw_rows(rows: &[RawDrinkRow]) -> Self {
        let variants = rows
            .iter()
            .map(|row| {
                let mut variant = normalize_row(row);
                variant.tags = Some(tag_variant(&variant));
                variant.score = Some(health_score(&variant));
                variant
            })
            .collect::<Vec<_>>();

        info!("Built catalog from {} raw rows", variants.len());
        Self { variants }
    }

    /// Load persisted records. Rows without a tag column stay untagged.
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        let variants = records.into_iter().map(record_to_variant).collect::<Vec<_>>();
        let untagged = variants.iter().filter(|v| v.tags.is_none()).count();

        info!(
            "Loaded catalog: {} variants ({} without tags)",
            variants.len(),
            untagged
        );
        Self { variants }
    }

    pub fn to_records(&self) -> Vec<CatalogRecord> {
        self.variants.iter().map(variant_to_record).collect()
    }

    pub fn variants(&self) -> &[DrinkVariant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// True when every row carries a tag set
    pub fn is_tagged(&self) -> bool {
        self.variants.iter().all(|v| v.tags.is_some())
    }

    /// New snapshot with tags derived from each row's nutrition
    pub fn retagged(&self) -> Catalog {
        Catalog::new(
            self.variants
                .iter()
                .map(|v| DrinkVariant {
                    tags: Some(tag_variant(v)),
                    ..v.clone()
                })
                .collect(),
        )
    }

    /// New snapshot with every row labelled by the health-score rules
    pub fn relabelled(&self) -> Catalog {
        Catalog::new(
            self.variants
                .iter()
                .map(|v| DrinkVariant {
                    score: Some(health_score(v)),
                    ..v.clone()
                })
                .collect(),
        )
    }

    /// First row with the queried identity
    pub fn find(&self, query: &DrinkQuery) -> Option<&DrinkVariant> {
        self.variants.iter().find(|v| query.matches(v))
    }

    /// All rows of one beverage, in catalog order
    pub fn variants_of<'a>(&'a self, beverage: &'a str) -> impl Iterator<Item = &'a DrinkVariant> + 'a {
        self.variants.iter().filter(move |v| v.beverage == beverage)
    }

    /// Distinct beverage names, sorted
    pub fn beverages(&self) -> Vec<&str> {
        self.variants
            .iter()
            .map(|v| v.beverage.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn parse_tags(beverage: &str, labels: Vec<String>) -> TagSet {
    labels
        .into_iter()
        .filter_map(|label| {
            let tag = Tag::from_label(&label);
            if tag.is_none() {
                warn!("Ignoring unknown tag '{}' on '{}'", label, beverage);
            }
            tag
        })
        .collect()
}

fn record_to_variant(record: CatalogRecord) -> DrinkVariant {
    let tags = record.tags.map(|labels| parse_tags(&record.beverage, labels));

    DrinkVariant {
        beverage: record.beverage,
        beverage_prep: record.beverage_prep,
        category: record.beverage_category,
        size: record.size,
        milk: record.milk_type,
        whipped_cream: record.whipped_cream,
        nutrition: Nutrition {
            calories: record.calories,
            sugar_g: record.sugars,
            protein_g: record.protein,
            fat_g: record.total_fat,
            caffeine_mg: record.caffeine,
            calcium_dv: record.calcium,
        },
        tags,
        score: record.score,
    }
}

fn variant_to_record(variant: &DrinkVariant) -> CatalogRecord {
    let n = &variant.nutrition;

    CatalogRecord {
        beverage: variant.beverage.clone(),
        beverage_prep: variant.beverage_prep.clone(),
        size: variant.size,
        milk_type: variant.milk.clone(),
        whipped_cream: variant.whipped_cream,
        calories: n.calories,
        sugars: n.sugar_g,
        protein: n.protein_g,
        total_fat: n.fat_g,
        caffeine: n.caffeine_mg,
        calcium: n.calcium_dv,
        beverage_category: variant.category.clone(),
        tags: variant
            .tags
            .as_ref()
            .map(|tags| tags.iter().map(|t| t.as_str().to_string()).collect()),
        score: variant.score,
    }
}
