//! Core type definitions for drink scoring and recommendation

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Cup size, in the order sizes are tried as prefixes of a prep string
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Size {
    Short,
    Tall,
    Grande,
    Venti,
}

impl Size {
    pub const ALL: [Size; 4] = [Size::Short, Size::Tall, Size::Grande, Size::Venti];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Short => "Short",
            Size::Tall => "Tall",
            Size::Grande => "Grande",
            Size::Venti => "Venti",
        }
    }

    pub fn from_name(name: &str) -> Option<Size> {
        Size::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical nutrition facts; every field defaults to 0 when the raw value is unusable
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub sugar_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub caffeine_mg: f64,
    pub calcium_dv: f64, // percent of daily value
}

/// Descriptor tag vocabulary
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Sweet,
    LowSugar,
    NotSweet,
    LowCalorie,
    HighCalorie,
    Unhealthy,
    HighProtein,
    LowProtein, // classifier vocabulary only, never derived from nutrition
    CaffeineBoost,
    NoCaffeine,
    NonDairy,
    #[serde(rename = "none")]
    Untagged,
}

impl Tag {
    pub const ALL: [Tag; 12] = [
        Tag::Sweet,
        Tag::LowSugar,
        Tag::NotSweet,
        Tag::LowCalorie,
        Tag::HighCalorie,
        Tag::Unhealthy,
        Tag::HighProtein,
        Tag::LowProtein,
        Tag::CaffeineBoost,
        Tag::NoCaffeine,
        Tag::NonDairy,
        Tag::Untagged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Sweet => "sweet",
            Tag::LowSugar => "low_sugar",
            Tag::NotSweet => "not_sweet",
            Tag::LowCalorie => "low_calorie",
            Tag::HighCalorie => "high_calorie",
            Tag::Unhealthy => "unhealthy",
            Tag::HighProtein => "high_protein",
            Tag::LowProtein => "low_protein",
            Tag::CaffeineBoost => "caffeine_boost",
            Tag::NoCaffeine => "no_caffeine",
            Tag::NonDairy => "non_dairy",
            Tag::Untagged => "none",
        }
    }

    pub fn from_label(label: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|t| t.as_str() == label)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of tags; `{Tag::Untagged}` means no rule fired
pub type TagSet = BTreeSet<Tag>;

/// One catalog row: a beverage in a specific size / milk / whipped-cream configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkVariant {
    pub beverage: String,
    pub beverage_prep: String, // raw prep string, kept for traceability
    pub category: Option<String>,
    pub size: Option<Size>,
    pub milk: String,
    pub whipped_cream: bool,
    pub nutrition: Nutrition,
    pub tags: Option<TagSet>,  // None when the source carried no tag column
    pub score: Option<f64>,    // offline label in [0, 100]
}

/// Identity of a drink variant as sent by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkQuery {
    pub beverage: String,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub milk: String,
    #[serde(default)]
    pub whipped_cream: bool,
}

impl DrinkQuery {
    pub fn matches(&self, variant: &DrinkVariant) -> bool {
        variant.beverage == self.beverage
            && variant.size == self.size
            && variant.milk == self.milk
            && variant.whipped_cream == self.whipped_cream
    }
}

impl fmt::Display for DrinkQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.beverage)?;
        if let Some(size) = self.size {
            write!(f, " / {}", size)?;
        }
        if !self.milk.is_empty() {
            write!(f, " / {}", self.milk)?;
        }
        if self.whipped_cream {
            write!(f, " / whipped cream")?;
        }
        Ok(())
    }
}

/// A healthier variant of the queried beverage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionResult {
    pub beverage: String,
    pub size: Option<Size>,
    pub milk: String,
    pub whipped_cream: bool,
    pub score: f64,
    pub score_delta: f64,
}

/// Response to a score-and-suggest query
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub score: f64, // rounded to 2 decimals
    pub message: String,
    pub beverage: String,
    pub size: Option<Size>,
    pub milk: String,
    pub whipped_cream: bool,
    pub suggestions: Vec<SuggestionResult>,
}

/// Which matching tier produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Strict,   // row tags are a superset of the predicted tags
    Fallback, // row tags intersect the predicted tags
    Empty,
}

impl MatchTier {
    /// Human-readable summary shown next to the matches
    pub fn message(&self) -> &'static str {
        match self {
            MatchTier::Strict => "Drinks matching all of your tags",
            MatchTier::Fallback => "No drink has every tag; showing partial matches",
            MatchTier::Empty => "No drinks found at all for these tags",
        }
    }
}

/// Catalog row selected by the text matcher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedDrink {
    pub beverage: String,
    pub beverage_prep: String,
    pub category: Option<String>,
    pub size: Option<Size>,
    pub milk: String,
    pub whipped_cream: bool,
    pub tags: TagSet,
    pub score: f64,
}

/// Response to a free-text query
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub predicted_tags: TagSet,
    pub tier: MatchTier,
    pub message: String,
    pub matches: Vec<MatchedDrink>,
}

/// Raw nutrition cell: either a number or free text such as "12%" or "Varies"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
}

/// Source row before normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDrinkRow {
    #[serde(rename = "Beverage_category", default)]
    pub beverage_category: Option<String>,
    #[serde(rename = "Beverage")]
    pub beverage: String,
    #[serde(rename = "Beverage_prep", default)]
    pub beverage_prep: String,
    #[serde(rename = "Calories", default)]
    pub calories: Option<RawCell>,
    #[serde(rename = "Sugars (g)", default)]
    pub sugars: Option<RawCell>,
    #[serde(rename = "Protein (g)", default)]
    pub protein: Option<RawCell>,
    #[serde(rename = "Total Fat (g)", default)]
    pub total_fat: Option<RawCell>,
    #[serde(rename = "Caffeine (mg)", default)]
    pub caffeine: Option<RawCell>,
    #[serde(rename = "Calcium (% DV)", default)]
    pub calcium: Option<RawCell>,
}

/// Persisted catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "Beverage")]
    pub beverage: String,
    #[serde(rename = "Beverage_prep", default)]
    pub beverage_prep: String,
    #[serde(rename = "Size", default)]
    pub size: Option<Size>,
    #[serde(rename = "Milk_Type", default)]
    pub milk_type: String,
    #[serde(rename = "Whipped_Cream", default)]
    pub whipped_cream: bool,
    #[serde(rename = "Calories", default)]
    pub calories: f64,
    #[serde(rename = "Sugars (g)", default)]
    pub sugars: f64,
    #[serde(rename = "Protein (g)", default)]
    pub protein: f64,
    #[serde(rename = "Total Fat (g)", default)]
    pub total_fat: f64,
    #[serde(rename = "Caffeine (mg)", default)]
    pub caffeine: f64,
    #[serde(rename = "Calcium (% DV)", default)]
    pub calcium: f64,
    #[serde(rename = "Beverage_category", default)]
    pub beverage_category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub score: Option<f64>,
}
