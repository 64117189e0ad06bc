use std::collections::BTreeMap;

use juniper::{graphql_object, GraphQLObject};
use scraper::{ElementRef, Html};

use crate::parse::text::{element_text, lenient_float};
use crate::parse::Error;
use crate::static_selector;

/// A table is a nutrition table if its header row names any of these columns.
pub const SIGNATURE_COLUMNS: [&str; 3] = ["Cals", "Fat-T", "Prot"];

pub const MACRO_COLUMNS: [&str; 10] = [
    "Fat-T", "Chol", "Sod", "Carb", "Prot", "Fat-S", "TFA", "Fiber", "Sugar", "Cals",
];
pub const MINERAL_COLUMNS: [&str; 4] = ["Iron", "Potas", "D-mcg", "SugAdd"];

pub const TOTALS_MARKER: &str = "TOTALS FOR MEAL";

#[derive(Debug, Clone, PartialEq, GraphQLObject)]
pub struct ColumnValue {
    pub column: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NutritionTableRow {
    pub name: String,
    pub portion: String,
    pub quantity: f64,
    pub macros: BTreeMap<String, f64>,
    pub minerals: BTreeMap<String, f64>,
}

#[graphql_object]
impl NutritionTableRow {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn portion(&self) -> &str {
        &self.portion
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn macros(&self) -> Vec<ColumnValue> {
        columns(&self.macros)
    }

    pub fn minerals(&self) -> Vec<ColumnValue> {
        columns(&self.minerals)
    }
}

fn columns(map: &BTreeMap<String, f64>) -> Vec<ColumnValue> {
    map.iter()
        .map(|(column, value)| ColumnValue {
            column: column.clone(),
            value: *value,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NutritionReport {
    pub items: Vec<NutritionTableRow>,
    pub totals: Option<NutritionTableRow>,
}

#[graphql_object]
impl NutritionReport {
    pub fn items(&self) -> &[NutritionTableRow] {
        &self.items
    }

    pub fn totals(&self) -> Option<&NutritionTableRow> {
        self.totals.as_ref()
    }
}

impl NutritionTableRow {
    /// Columns 0, 1 and 2 are name, portion and quantity by position. The
    /// rest are keyed by their header text; headers outside the macro and
    /// mineral lists are dropped.
    fn from_cells<'a>(cells: impl Iterator<Item = ElementRef<'a>>, headers: &[String]) -> Self {
        let mut row = Self::default();
        for (idx, cell) in cells.enumerate() {
            let text = element_text(cell);
            match idx {
                0 => row.name = text,
                1 => row.portion = text,
                2 => row.quantity = lenient_float(&text).unwrap_or(0.0),
                _ => {
                    let header = headers.get(idx).map_or("", String::as_str);
                    let numeric: String = text
                        .chars()
                        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                        .collect();
                    let Some(value) = lenient_float(&numeric) else {
                        continue;
                    };
                    if MACRO_COLUMNS.contains(&header) {
                        row.macros.insert(header.to_owned(), value);
                    } else if MINERAL_COLUMNS.contains(&header) {
                        row.minerals.insert(header.to_owned(), value);
                    }
                }
            }
        }
        row
    }
}

impl NutritionReport {
    pub fn from_report_page(page: &str) -> Result<Self, Error> {
        static_selector!(TABLE_SELECTOR <- "table");
        static_selector!(ROW_SELECTOR <- "tr");
        static_selector!(HEADER_CELL_SELECTOR <- "th, td");
        static_selector!(CELL_SELECTOR <- "td");

        let document = Html::parse_document(page);
        let mut report = Self::default();
        let mut found_table = false;

        for table in document.select(&TABLE_SELECTOR) {
            let mut rows = table.select(&ROW_SELECTOR);
            let Some(header_row) = rows.next() else {
                continue;
            };
            let headers: Vec<String> = header_row
                .select(&HEADER_CELL_SELECTOR)
                .map(element_text)
                .collect();
            if !headers
                .iter()
                .any(|header| SIGNATURE_COLUMNS.contains(&header.as_str()))
            {
                continue;
            }
            found_table = true;

            for row in rows {
                let mut cells = row.select(&CELL_SELECTOR).peekable();
                if cells.peek().is_none() {
                    continue;
                }
                let parsed = NutritionTableRow::from_cells(cells, &headers);
                if element_text(row).contains(TOTALS_MARKER) {
                    report.totals = Some(parsed);
                } else if !parsed.name.is_empty() {
                    report.items.push(parsed);
                }
            }
        }

        if found_table {
            Ok(report)
        } else {
            Err(Error::html_parse_error(
                "Report page has no table with nutrition columns",
            ))
        }
    }
}
