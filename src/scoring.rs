//! Deterministic health-score rules used to label the catalog

use crate::types::*;

const BASE_SCORE: i32 = 100;
const MIN_SCORE: i32 = 0;
const MAX_SCORE: i32 = 100;

/// Score bands per axis as (inclusive floor, delta), highest floor first
const PROTEIN_BANDS: &[(f64, i32)] = &[(10.0, 20), (6.0, 10)];
const SUGAR_BANDS: &[(f64, i32)] = &[(30.0, -30), (20.0, -20), (10.0, -10)];
const CALORIE_BANDS: &[(f64, i32)] = &[(300.0, -20), (200.0, -10)];
const FAT_BANDS: &[(f64, i32)] = &[(10.0, -10)];
const CALCIUM_BANDS: &[(f64, i32)] = &[(20.0, 10), (10.0, 5)];

const HIGH_CAFFEINE_MG: f64 = 350.0;
const LOW_CAFFEINE_MG: f64 = 50.0;

const WHIPPED_CREAM_PENALTY: i32 = -5;

/// Thresholds for the human-readable verdict
pub const GOOD_SCORE: f64 = 80.0;
pub const OK_SCORE: f64 = 60.0;

fn first_band(value: f64, bands: &[(f64, i32)]) -> i32 {
    bands
        .iter()
        .find(|(floor, _)| value >= *floor)
        .map(|(_, delta)| *delta)
        .unwrap_or(0)
}

fn caffeine_delta(caffeine_mg: f64) -> i32 {
    if caffeine_mg >= HIGH_CAFFEINE_MG {
        -10
    } else if caffeine_mg <= LOW_CAFFEINE_MG {
        5
    } else {
        0
    }
}

fn milk_delta(milk: &str) -> i32 {
    let milk = milk.to_lowercase();
    if milk.contains("soy") || milk.contains("nonfat") {
        3
    } else if milk.contains("2%") {
        1
    } else if milk.contains("whole") {
        -3
    } else {
        0
    }
}

fn size_delta(size: Option<Size>) -> i32 {
    match size {
        Some(Size::Venti) => -5,
        Some(Size::Grande) => -3,
        Some(Size::Short) => 2,
        Some(Size::Tall) | None => 0,
    }
}

/// Additive-band health score in [0, 100].
///
/// Each axis applies its first matching band. This is the offline label;
/// queries go through the trained predictor instead.
pub fn health_score(variant: &DrinkVariant) -> f64 {
    let n = &variant.nutrition;

    let mut score = BASE_SCORE;
    score += first_band(n.protein_g, PROTEIN_BANDS);
    score += first_band(n.sugar_g, SUGAR_BANDS);
    score += first_band(n.calories, CALORIE_BANDS);
    score += first_band(n.fat_g, FAT_BANDS);
    score += caffeine_delta(n.caffeine_mg);
    score += first_band(n.calcium_dv, CALCIUM_BANDS);

    if variant.whipped_cream {
        score += WHIPPED_CREAM_PENALTY;
    }
    score += milk_delta(&variant.milk);
    score += size_delta(variant.size);

    score.clamp(MIN_SCORE, MAX_SCORE) as f64
}

/// Verdict message shown next to a predicted score
pub fn verdict(score: f64) -> &'static str {
    if score >= GOOD_SCORE {
        "Good after workout!"
    } else if score >= OK_SCORE {
        "hmmm Ok, but be careful!"
    } else {
        "Cheat day only!"
    }
}

/// Round a score for presentation (2 decimals)
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
