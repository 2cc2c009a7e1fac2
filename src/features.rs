//! Feature vectors aligned to a trained model's declared column order

use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::predictors::ScorePredictor;
use crate::types::*;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Numeric columns, in the order the regression model was trained on
pub const NUMERIC_FEATURES: [&str; 6] = [
    "Calories",
    "Sugars (g)",
    "Protein (g)",
    "Total Fat (g)",
    "Caffeine (mg)",
    "Calcium (% DV)",
];

pub const SIZE_PREFIX: &str = "Size_";
pub const MILK_PREFIX: &str = "Milk_Type_";
pub const WHIPPED_PREFIX: &str = "Whipped_Cream_";

/// How one declared column is filled from a variant
#[derive(Debug, Clone, PartialEq)]
enum Column {
    Numeric(usize), // index into NUMERIC_FEATURES
    Size(String),
    Milk(String),
    Whipped(bool),
}

fn numeric_value(n: &Nutrition, index: usize) -> f64 {
    match index {
        0 => n.calories,
        1 => n.sugar_g,
        2 => n.protein_g,
        3 => n.fat_g,
        4 => n.caffeine_mg,
        _ => n.calcium_dv,
    }
}

fn whipped_label(whipped: bool) -> &'static str {
    if whipped {
        "True"
    } else {
        "False"
    }
}

/// Declared, validated feature layout of a regression model
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl FeatureSchema {
    /// Validate a declared feature-name list.
    ///
    /// Every numeric column must be declared exactly once, and every other
    /// column must be a size, milk or whipped-cream dummy.
    pub fn new(names: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(names.len());

        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(EngineError::Configuration(format!(
                    "feature '{}' declared more than once",
                    name
                )));
            }
            columns.push(Self::classify(name)?);
        }

        for (index, numeric) in NUMERIC_FEATURES.iter().enumerate() {
            if !columns.contains(&Column::Numeric(index)) {
                return Err(EngineError::Configuration(format!(
                    "feature schema is missing numeric column '{}'",
                    numeric
                )));
            }
        }

        Ok(Self { names, columns })
    }

    fn classify(name: &str) -> Result<Column> {
        if let Some(index) = NUMERIC_FEATURES.iter().position(|n| *n == name) {
            return Ok(Column::Numeric(index));
        }
        if let Some(size) = name.strip_prefix(SIZE_PREFIX) {
            return Ok(Column::Size(size.to_string()));
        }
        if let Some(milk) = name.strip_prefix(MILK_PREFIX) {
            return Ok(Column::Milk(milk.to_string()));
        }
        match name.strip_prefix(WHIPPED_PREFIX) {
            Some("True") => Ok(Column::Whipped(true)),
            Some("False") => Ok(Column::Whipped(false)),
            _ => Err(EngineError::Configuration(format!(
                "feature '{}' cannot be built from a drink variant",
                name
            ))),
        }
    }

    /// Feature names a model trained on this catalog would declare:
    /// numeric columns, then sorted size, milk and whipped-cream dummies.
    pub fn names_for_catalog(catalog: &Catalog) -> Vec<String> {
        let mut sizes = BTreeSet::new();
        let mut milks = BTreeSet::new();
        let mut whipped = BTreeSet::new();

        for variant in catalog.variants() {
            if let Some(size) = variant.size {
                sizes.insert(size.as_str());
            }
            if !variant.milk.is_empty() {
                milks.insert(variant.milk.as_str());
            }
            whipped.insert(whipped_label(variant.whipped_cream));
        }

        let mut names: Vec<String> = NUMERIC_FEATURES.iter().map(|n| n.to_string()).collect();
        names.extend(sizes.into_iter().map(|s| format!("{}{}", SIZE_PREFIX, s)));
        names.extend(milks.into_iter().map(|m| format!("{}{}", MILK_PREFIX, m)));
        names.extend(whipped.into_iter().map(|w| format!("{}{}", WHIPPED_PREFIX, w)));
        names
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Project a variant onto the declared columns. Dummies for values the
    /// schema does not declare are dropped.
    pub fn build(&self, variant: &DrinkVariant) -> FeatureVector<'_> {
        let values = self
            .columns
            .iter()
            .map(|column| match column {
                Column::Numeric(index) => numeric_value(&variant.nutrition, *index),
                Column::Size(size) => {
                    indicator(variant.size.map(|s| s.as_str()) == Some(size.as_str()))
                }
                Column::Milk(milk) => indicator(!variant.milk.is_empty() && variant.milk == *milk),
                Column::Whipped(flag) => indicator(variant.whipped_cream == *flag),
            })
            .collect();

        FeatureVector {
            names: &self.names,
            values,
        }
    }
}

fn indicator(hit: bool) -> f64 {
    if hit {
        1.0
    } else {
        0.0
    }
}

/// Numeric + one-hot projection of a variant, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'a> {
    names: &'a [String],
    values: Vec<f64>,
}

impl<'a> FeatureVector<'a> {
    /// Pair explicit names and values; lengths must agree
    pub fn from_parts(names: &'a [String], values: Vec<f64>) -> Result<Self> {
        if names.len() != values.len() {
            return Err(EngineError::Configuration(format!(
                "feature vector has {} values for {} names",
                values.len(),
                names.len()
            )));
        }
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| self.values[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Scores variants by building aligned vectors for a trained predictor
#[derive(Clone)]
pub struct ScoreAdapter {
    schema: Arc<FeatureSchema>,
    predictor: Arc<dyn ScorePredictor>,
}

impl ScoreAdapter {
    pub fn new(predictor: Arc<dyn ScorePredictor>) -> Result<Self> {
        let schema = FeatureSchema::new(predictor.feature_names().to_vec())?;
        Ok(Self {
            schema: Arc::new(schema),
            predictor,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn predictor_name(&self) -> &'static str {
        self.predictor.name()
    }

    /// Predicted score for a variant
    pub fn score(&self, variant: &DrinkVariant) -> Result<f64> {
        let features = self.schema.build(variant);
        let score = self.predictor.predict(&features)?;

        if !score.is_finite() {
            return Err(EngineError::Prediction(format!(
                "{} returned a non-finite score for '{}'",
                self.predictor.name(),
                variant.beverage
            )));
        }
        Ok(score)
    }
}
