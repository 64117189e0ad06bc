use std::sync::OnceLock;

use juniper::GraphQLObject;
use regex::Regex;
use scraper::Html;

use crate::parse::statics;
use crate::parse::text::lenient_float;
use crate::static_regex;

#[derive(Debug, Clone, Copy, Default, PartialEq, GraphQLObject, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub added_sugar: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, GraphQLObject, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Micronutrients {
    pub cholesterol: f64,
    pub sodium: f64,
    pub potassium: f64,
    pub calcium: f64,
    pub iron: f64,
    #[serde(rename = "vitaminD")]
    pub vitamin_d: f64,
}

/// Nutrition facts scraped from one item's detail page. Values missing from
/// the page are 0.
#[derive(Debug, Clone, Default, PartialEq, GraphQLObject, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    pub name: String,
    pub serving_size: Option<String>,
    pub calories: f64,
    pub macros: Macros,
    pub micronutrients: Micronutrients,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Calories,
    Fat,
    SaturatedFat,
    TransFat,
    Cholesterol,
    Sodium,
    Carbs,
    Fiber,
    Sugar,
    AddedSugar,
    Protein,
    Iron,
    Potassium,
    VitaminD,
    Calcium,
}

/// A label on the nutrition facts panel and the pattern capturing its value.
/// Rules target disjoint labels and are applied independently.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: Field,
    pub pattern: &'static str,
}

pub const RULES: [Rule; 15] = [
    Rule { field: Field::Calories, pattern: r"Calories(?:\s*per serving)?\s*(\d+)" },
    Rule { field: Field::Fat, pattern: r"(?:Total )?Fat\s+([\d.]+)g" },
    Rule { field: Field::SaturatedFat, pattern: r"Saturated Fat\s+([\d.]+)g" },
    Rule { field: Field::TransFat, pattern: r"Trans (?:Fatty Acid|Fat)\s+([\d.]+)g" },
    Rule { field: Field::Cholesterol, pattern: r"Cholesterol\s+([\d.]+)mg" },
    Rule { field: Field::Sodium, pattern: r"Sodium\s+([\d.]+)mg" },
    Rule { field: Field::Carbs, pattern: r"(?:Total )?Carbohydrates?\s+([\d.]+)g" },
    Rule { field: Field::Fiber, pattern: r"Dietary Fiber\s+([\d.]+)g" },
    Rule { field: Field::Sugar, pattern: r"Total Sugars\s+([\d.]+)g" },
    Rule {
        field: Field::AddedSugar,
        pattern: r"(?:Added Sugars?|Includes\s+[\d.]+g\s+Added Sugars?)\s+([\d.]+)g",
    },
    Rule { field: Field::Protein, pattern: r"Protein\s+([\d.]+)g" },
    Rule { field: Field::Iron, pattern: r"Iron\s+([\d.]+)mg" },
    Rule { field: Field::Potassium, pattern: r"Potassium\s+([\d.]+)mg" },
    Rule { field: Field::VitaminD, pattern: r"Vitamin D[^0-9]+([\d.]+)mcg" },
    Rule { field: Field::Calcium, pattern: r"Calcium\s+([\d.]+)mg" },
];

fn compiled_rules() -> &'static [(Field, Regex)] {
    static COMPILED: OnceLock<Vec<(Field, Regex)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| (rule.field, statics::regex(rule.pattern)))
            .collect()
    })
}

impl Rule {
    /// The first value labelled by this rule in `text`, if any.
    pub fn apply(&self, text: &str) -> Option<f64> {
        let (_, re) = compiled_rules()
            .iter()
            .find(|(field, _)| *field == self.field)?;
        re.captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| lenient_float(m.as_str()))
    }
}

impl NutritionRecord {
    /// Extracts every field from a detail page's source.
    pub fn from_detail_page(name: &str, page: &str) -> Self {
        let text: String = Html::parse_document(page).root_element().text().collect();
        let mut record = Self {
            name: name.to_owned(),
            serving_size: serving_size(page),
            ..Self::default()
        };
        for rule in &RULES {
            if let Some(value) = rule.apply(&text) {
                *record.field_mut(rule.field) = value;
            }
        }
        record
    }

    pub fn field_mut(&mut self, field: Field) -> &mut f64 {
        match field {
            Field::Calories => &mut self.calories,
            Field::Fat => &mut self.macros.fat,
            Field::SaturatedFat => &mut self.macros.saturated_fat,
            Field::TransFat => &mut self.macros.trans_fat,
            Field::Carbs => &mut self.macros.carbs,
            Field::Fiber => &mut self.macros.fiber,
            Field::Sugar => &mut self.macros.sugar,
            Field::AddedSugar => &mut self.macros.added_sugar,
            Field::Protein => &mut self.macros.protein,
            Field::Cholesterol => &mut self.micronutrients.cholesterol,
            Field::Sodium => &mut self.micronutrients.sodium,
            Field::Iron => &mut self.micronutrients.iron,
            Field::Potassium => &mut self.micronutrients.potassium,
            Field::VitaminD => &mut self.micronutrients.vitamin_d,
            Field::Calcium => &mut self.micronutrients.calcium,
        }
    }
}

/// Serving size is read from the raw markup, where the amount usually sits a
/// few tags after its label.
pub fn serving_size(page: &str) -> Option<String> {
    static_regex!(SERVING_SIZE <- r"Serving size[\s\S]{0,100}?(\d+\s+(?:EACH|OZ|OZL|G|ML|PIECE|ROLL|CUP))");
    SERVING_SIZE
        .captures(page)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
}
