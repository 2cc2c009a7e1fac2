//! Field normalization: raw menu rows into canonical drink fields

use crate::types::*;
use std::fmt;

const WHIPPED_CREAM: &str = "whipped cream";
const WITHOUT_WHIPPED_CREAM: &str = "without whipped cream";
const WITH_WHIPPED_CREAM: &str = "with whipped cream";

/// Placeholders that stand for "unknown" in the source data
const NUMERIC_PLACEHOLDERS: [&str; 3] = ["Varies", "varies", "nan"];

/// Size and milk descriptor split out of a `Beverage_prep` string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prep {
    pub size: Option<Size>,
    pub milk: String,
}

impl Prep {
    /// Split a prep string on the first matching size prefix.
    ///
    /// Sizes are tried as literal prefixes in `Size::ALL` order. Without a
    /// match the whole string becomes the milk descriptor.
    pub fn parse(raw: &str) -> Self {
        for size in Size::ALL {
            if let Some(rest) = raw.strip_prefix(size.as_str()) {
                return Self {
                    size: Some(size),
                    milk: rest.trim().to_string(),
                };
            }
        }

        Self {
            size: None,
            milk: raw.to_string(),
        }
    }
}

impl fmt::Display for Prep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.size, self.milk.is_empty()) {
            (Some(size), true) => write!(f, "{}", size),
            (Some(size), false) => write!(f, "{} {}", size, self.milk),
            (None, _) => f.write_str(&self.milk),
        }
    }
}

/// Split the whipped-cream qualifier off a beverage name.
///
/// Returns the cleaned name and whether the drink carries whipped cream.
/// "Without Whipped Cream" is checked first; a name with no qualifier has none.
pub fn split_whipped_cream(name: &str) -> (String, bool) {
    let lower = name.to_lowercase();
    let whipped = if lower.contains(WITHOUT_WHIPPED_CREAM) {
        false
    } else {
        lower.contains(WITH_WHIPPED_CREAM)
    };

    (strip_whipped_qualifier(name), whipped)
}

/// Remove every parenthesized segment mentioning whipped cream
fn strip_whipped_qualifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;

    while let Some(open) = rest.find('(') {
        let Some(len) = rest[open..].find(')') else {
            break;
        };
        let close = open + len;

        out.push_str(&rest[..open]);
        if !rest[open + 1..close].to_lowercase().contains(WHIPPED_CREAM) {
            out.push_str(&rest[open..=close]);
        }
        rest = &rest[close + 1..];
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Clean a raw numeric string. Never fails: anything unparsable is 0.
pub fn clean_numeric(raw: &str) -> f64 {
    let mut text: String = raw.chars().filter(|c| *c != '%' && *c != ' ').collect();
    for placeholder in NUMERIC_PLACEHOLDERS {
        text = text.replace(placeholder, "0");
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

impl RawCell {
    pub fn to_f64(&self) -> f64 {
        match self {
            RawCell::Number(value) if value.is_finite() => *value,
            RawCell::Number(_) => 0.0,
            RawCell::Text(text) => clean_numeric(text),
        }
    }
}

fn cell_value(cell: Option<&RawCell>) -> f64 {
    cell.map(RawCell::to_f64).unwrap_or(0.0)
}

/// Canonical nutrition for a raw row
pub fn normalize_nutrition(row: &RawDrinkRow) -> Nutrition {
    Nutrition {
        calories: cell_value(row.calories.as_ref()),
        sugar_g: cell_value(row.sugars.as_ref()),
        protein_g: cell_value(row.protein.as_ref()),
        fat_g: cell_value(row.total_fat.as_ref()),
        caffeine_mg: cell_value(row.caffeine.as_ref()),
        calcium_dv: cell_value(row.calcium.as_ref()),
    }
}

/// Normalize a raw row into an untagged, unscored variant
pub fn normalize_row(row: &RawDrinkRow) -> DrinkVariant {
    let (beverage, whipped_cream) = split_whipped_cream(&row.beverage);
    let prep = Prep::parse(&row.beverage_prep);

    DrinkVariant {
        beverage,
        beverage_prep: row.beverage_prep.clone(),
        category: row
            .beverage_category
            .as_ref()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        size: prep.size,
        milk: prep.milk,
        whipped_cream,
        nutrition: normalize_nutrition(row),
        tags: None,
        score: None,
    }
}
