use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Macros {
    pub protein: f64, // g
    pub carbs: f64,   // g
    pub fat: f64,     // g
}

impl Macros {
    pub fn total(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }

    /// True when there is nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.protein == 0.0 && self.carbs == 0.0 && self.fat == 0.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NutritionDetails {
    pub fiber: f64,       // g
    pub sugar: f64,       // g
    pub sodium: f64,      // mg
    pub cholesterol: f64, // mg
}

/// Nutritional profile of a single food as estimated by the analysis service.
///
/// When `is_valid_food` is false the service has classified the query as not
/// edible and every other field is meaningless.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    pub is_valid_food: bool,
    pub food_name: String,
    pub serving_size: String,
    pub calories: f64,
    pub macros: Macros,
    pub details: NutritionDetails,
    pub summary: String,
    pub health_tips: Vec<String>,
}

impl NutritionRecord {
    /// Sanity checks on a decoded record before it can be displayed.
    ///
    /// Negative classifications are not checked since none of their fields are used.
    pub fn validate(&self) -> Result<(), String> {
        if !self.is_valid_food {
            return Ok(());
        }

        let required_text = [
            ("foodName", &self.food_name),
            ("servingSize", &self.serving_size),
            ("summary", &self.summary),
        ];
        for (field, value) in required_text {
            if value.trim().is_empty() {
                return Err(format!("'{}' must not be empty", field));
            }
        }

        let amounts = [
            ("calories", self.calories),
            ("macros.protein", self.macros.protein),
            ("macros.carbs", self.macros.carbs),
            ("macros.fat", self.macros.fat),
            ("details.fiber", self.details.fiber),
            ("details.sugar", self.details.sugar),
            ("details.sodium", self.details.sodium),
            ("details.cholesterol", self.details.cholesterol),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("'{}' must be a non-negative number, got {}", field, value));
            }
        }
        if !self.macros.total().is_finite() {
            return Err("macro total is not a finite number".to_string());
        }

        Ok(())
    }
}
