use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which object the model is asked to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Composition analysis, answered with an [`AnalysisResult`]
    #[default]
    Analyze,
    /// Recipe suggestions, answered with a [`RecipeSet`]
    Recipes,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Analyze => "analyze",
            Mode::Recipes => "recipes",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safety classification produced by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RiskLevel {
    Safe,
    Moderate,
    High,
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(RiskLevel::Safe),
            "moderate" => Ok(RiskLevel::Moderate),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level '{other}'")),
        }
    }
}

impl TryFrom<String> for RiskLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Kind of a suggested recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RecipeType {
    Cocktail,
    Dish,
    Beverage,
}

impl FromStr for RecipeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cocktail" => Ok(RecipeType::Cocktail),
            "dish" => Ok(RecipeType::Dish),
            "beverage" => Ok(RecipeType::Beverage),
            other => Err(format!("unknown recipe type '{other}'")),
        }
    }
}

impl TryFrom<String> for RecipeType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Result of a composition analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub product_name: String,
    pub verdict: String,
    pub risk_level: RiskLevel,
    /// E-codes found in the composition, each with a short note
    pub highlights: Vec<String>,
    pub allergens: Vec<String>,
    pub features: Vec<String>,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RecipeType,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

/// Recipes suggested for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSet {
    pub recipes: Vec<Recipe>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_defaults_to_analyze() {
        assert_eq!(Mode::default(), Mode::Analyze);
        let mode: Mode = serde_json::from_value(json!("recipes")).unwrap();
        assert_eq!(mode, Mode::Recipes);
        assert!(serde_json::from_value::<Mode>(json!("translate")).is_err());
    }

    #[test]
    fn test_risk_level_is_case_insensitive() {
        assert_eq!("SAFE".parse::<RiskLevel>().unwrap(), RiskLevel::Safe);
        assert_eq!(" Moderate ".parse::<RiskLevel>().unwrap(), RiskLevel::Moderate);
        assert!("unknown".parse::<RiskLevel>().is_err());

        let level: RiskLevel = serde_json::from_value(json!("High")).unwrap();
        assert_eq!(level, RiskLevel::High);
    }

    #[test]
    fn test_analysis_result_uses_camel_case() {
        let value = json!({
            "productName": "Juice",
            "verdict": "ok",
            "riskLevel": "safe",
            "highlights": ["E330: acidity regulator"],
            "allergens": [],
            "features": ["no sugar"],
            "advice": "fine"
        });

        let result: AnalysisResult = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(result.product_name, "Juice");
        assert_eq!(result.risk_level, RiskLevel::Safe);
        assert_eq!(serde_json::to_value(&result).unwrap(), value);
    }

    #[test]
    fn test_recipe_type_field_is_renamed() {
        let set: RecipeSet = serde_json::from_value(json!({
            "recipes": [{
                "name": "Lemonade",
                "type": "Beverage",
                "description": "Fresh",
                "ingredients": ["water", "lemon"],
                "steps": ["mix"]
            }]
        }))
        .unwrap();

        assert_eq!(set.recipes.len(), 1);
        assert_eq!(set.recipes[0].kind, RecipeType::Beverage);
    }
}
