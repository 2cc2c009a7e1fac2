//! Nutrition-to-tag derivation

use crate::types::*;

const SWEET_SUGAR_G: f64 = 30.0;
const LOW_SUGAR_G: f64 = 10.0;
const LOW_CALORIE: f64 = 100.0;
const HIGH_CALORIE: f64 = 400.0;
const HIGH_PROTEIN_G: f64 = 10.0;
const CAFFEINE_BOOST_MG: f64 = 150.0;
const NO_CAFFEINE_MG: f64 = 10.0;

/// Milk descriptors that mark a drink as dairy-free (case-sensitive)
const NON_DAIRY_MILKS: [&str; 2] = ["Almond", "Oat"];

/// Derive descriptor tags from canonical nutrition and the milk descriptor.
///
/// Axes are independent and accumulate. `Tag::LowProtein` is never emitted
/// here even though the classifier vocabulary knows it.
pub fn derive_tags(nutrition: &Nutrition, milk: &str) -> TagSet {
    let mut tags = TagSet::new();

    // Exactly one sweetness tag
    if nutrition.sugar_g > SWEET_SUGAR_G {
        tags.insert(Tag::Sweet);
    } else if nutrition.sugar_g < LOW_SUGAR_G {
        tags.insert(Tag::LowSugar);
    } else {
        tags.insert(Tag::NotSweet);
    }

    if nutrition.calories < LOW_CALORIE {
        tags.insert(Tag::LowCalorie);
    } else if nutrition.calories > HIGH_CALORIE {
        tags.insert(Tag::HighCalorie);
        tags.insert(Tag::Unhealthy);
    }

    if nutrition.protein_g > HIGH_PROTEIN_G {
        tags.insert(Tag::HighProtein);
    }

    if nutrition.caffeine_mg > CAFFEINE_BOOST_MG {
        tags.insert(Tag::CaffeineBoost);
    } else if nutrition.caffeine_mg < NO_CAFFEINE_MG {
        tags.insert(Tag::NoCaffeine);
    }

    if NON_DAIRY_MILKS.iter().any(|m| milk.contains(m)) {
        tags.insert(Tag::NonDairy);
    }

    if tags.is_empty() {
        tags.insert(Tag::Untagged);
    }
    tags
}

/// Tags for a normalized variant
pub fn tag_variant(variant: &DrinkVariant) -> TagSet {
    derive_tags(&variant.nutrition, &variant.milk)
}
