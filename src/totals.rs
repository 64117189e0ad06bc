use juniper::{GraphQLInputObject, GraphQLObject};

use crate::parse::{NutritionTableRow, MACRO_COLUMNS, MINERAL_COLUMNS};

/// Anything that carries report columns keyed by header text.
pub trait NutrientColumns {
    fn macro_value(&self, column: &str) -> Option<f64>;
    fn mineral_value(&self, column: &str) -> Option<f64>;
}

impl NutrientColumns for NutritionTableRow {
    fn macro_value(&self, column: &str) -> Option<f64> {
        self.macros.get(column).copied()
    }

    fn mineral_value(&self, column: &str) -> Option<f64> {
        self.minerals.get(column).copied()
    }
}

#[derive(Debug, Clone, PartialEq, GraphQLInputObject, serde::Serialize, serde::Deserialize)]
pub struct ColumnValueInput {
    pub column: String,
    pub value: f64,
}

/// A report row as sent back by a client, already scaled to its quantity.
#[derive(
    Debug, Clone, Default, PartialEq, GraphQLInputObject, serde::Serialize, serde::Deserialize,
)]
pub struct NutrientColumnsInput {
    pub macros: Vec<ColumnValueInput>,
    pub minerals: Vec<ColumnValueInput>,
}

fn lookup(values: &[ColumnValueInput], column: &str) -> Option<f64> {
    values
        .iter()
        .find(|value| value.column == column)
        .map(|value| value.value)
}

impl NutrientColumns for NutrientColumnsInput {
    fn macro_value(&self, column: &str) -> Option<f64> {
        lookup(&self.macros, column)
    }

    fn mineral_value(&self, column: &str) -> Option<f64> {
        lookup(&self.minerals, column)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, GraphQLObject, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    pub calories: f64,
    pub total_fat: f64,
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub cholesterol: f64,
    pub sodium: f64,
    pub carbohydrates: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub added_sugar: f64,
    pub protein: f64,
    pub iron: f64,
    pub potassium: f64,
    #[serde(rename = "vitaminD")]
    pub vitamin_d: f64,
}

impl NutritionTotals {
    /// The field a report macro column adds into.
    fn macro_field(&mut self, column: &str) -> Option<&mut f64> {
        Some(match column {
            "Cals" => &mut self.calories,
            "Fat-T" => &mut self.total_fat,
            "Fat-S" => &mut self.saturated_fat,
            "TFA" => &mut self.trans_fat,
            "Chol" => &mut self.cholesterol,
            "Sod" => &mut self.sodium,
            "Carb" => &mut self.carbohydrates,
            "Fiber" => &mut self.fiber,
            "Sugar" => &mut self.sugar,
            "Prot" => &mut self.protein,
            _ => return None,
        })
    }

    fn mineral_field(&mut self, column: &str) -> Option<&mut f64> {
        Some(match column {
            "Iron" => &mut self.iron,
            "Potas" => &mut self.potassium,
            "D-mcg" => &mut self.vitamin_d,
            "SugAdd" => &mut self.added_sugar,
            _ => return None,
        })
    }
}

/// Sums every row column by column. A column a row lacks counts as zero.
pub fn calculate_nutrition_totals<'a, T, I>(items: I) -> NutritionTotals
where
    T: NutrientColumns + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut totals = NutritionTotals::default();
    for item in items {
        for column in MACRO_COLUMNS {
            let value = item.macro_value(column).unwrap_or(0.0);
            if let Some(field) = totals.macro_field(column) {
                *field += value;
            }
        }
        for column in MINERAL_COLUMNS {
            let value = item.mineral_value(column).unwrap_or(0.0);
            if let Some(field) = totals.mineral_field(column) {
                *field += value;
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(macros: &[(&str, f64)], minerals: &[(&str, f64)]) -> NutritionTableRow {
        NutritionTableRow {
            name: "Item".into(),
            macros: macros.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
            minerals: minerals.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sums_present_columns() {
        let rows = [
            row(&[("Cals", 100.0), ("Prot", 10.0)], &[]),
            row(&[("Cals", 200.0), ("Prot", 5.0)], &[]),
        ];
        let totals = calculate_nutrition_totals(&rows);
        assert_eq!(totals.calories, 300.0);
        assert_eq!(totals.protein, 15.0);
        assert_eq!(
            totals,
            NutritionTotals {
                calories: 300.0,
                protein: 15.0,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_minerals() {
        let rows = [
            row(&[], &[("Iron", 1.5), ("D-mcg", 0.1), ("SugAdd", 4.0)]),
            row(&[("Sugar", 2.0)], &[("Iron", 0.5), ("Potas", 300.0)]),
        ];
        let totals = calculate_nutrition_totals(rows.iter());
        assert_eq!(totals.iron, 2.0);
        assert_eq!(totals.vitamin_d, 0.1);
        assert_eq!(totals.added_sugar, 4.0);
        assert_eq!(totals.sugar, 2.0);
        assert_eq!(totals.potassium, 300.0);
    }

    #[test]
    fn test_empty() {
        let rows: [NutritionTableRow; 0] = [];
        assert_eq!(calculate_nutrition_totals(&rows), NutritionTotals::default());
    }

    #[test]
    fn test_every_report_column_is_mapped() {
        let mut totals = NutritionTotals::default();
        for column in MACRO_COLUMNS {
            assert!(totals.macro_field(column).is_some(), "{column} is not summed");
        }
        for column in MINERAL_COLUMNS {
            assert!(totals.mineral_field(column).is_some(), "{column} is not summed");
        }
    }

    #[test]
    fn test_client_rows() {
        let input = NutrientColumnsInput {
            macros: vec![ColumnValueInput {
                column: "Fat-T".into(),
                value: 4.5,
            }],
            minerals: vec![ColumnValueInput {
                column: "Potas".into(),
                value: 120.0,
            }],
        };
        let totals = calculate_nutrition_totals([&input, &input]);
        assert_eq!(totals.total_fat, 9.0);
        assert_eq!(totals.potassium, 240.0);
        assert_eq!(totals.calories, 0.0);
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_value(NutritionTotals::default()).unwrap();
        assert!(json.get("vitaminD").is_some());
        assert!(json.get("addedSugar").is_some());
    }
}
