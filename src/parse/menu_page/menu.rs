use std::collections::HashSet;

use juniper::graphql_object;
use scraper::Html;

use super::menu_item::MenuItem;
use crate::locations::MealKind;
use crate::parse::text::element_text;
use crate::{static_regex, static_selector};

const MAX_ITEM_LEN: usize = 100;

// navigation and instructions share the menu's cells
const NAVIGATION: [&str; 6] = [
    "Menu",
    "Select",
    "nutritional",
    "Click",
    "daypart",
    "Top of Page",
];

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Category {
    pub name: String,
    pub items: Vec<MenuItem>,
}

#[graphql_object]
impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResult {
    pub location: String,
    /// `MM/DD/YYYY`
    pub date: String,
    pub meal: MealKind,
    pub meal_name: String,
    pub categories: Vec<Category>,
    pub item_count: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl MenuResult {
    pub fn new(
        location: &str,
        date: String,
        meal: MealKind,
        meal_name: &str,
        categories: Vec<Category>,
    ) -> Self {
        let item_count = categories.iter().map(|c| c.items.len()).sum();
        Self {
            location: location.to_owned(),
            date,
            meal,
            meal_name: meal_name.to_owned(),
            categories,
            item_count,
            error: None,
        }
    }

    /// The empty result handed back when the page could not be retrieved.
    pub fn failed(
        location: &str,
        date: String,
        meal: MealKind,
        meal_name: &str,
        error: String,
    ) -> Self {
        Self {
            error: Some(error),
            ..Self::new(location, date, meal, meal_name, Vec::new())
        }
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }
}

#[graphql_object(name = "Menu")]
impl MenuResult {
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn meal(&self) -> MealKind {
        self.meal
    }

    pub fn meal_name(&self) -> &str {
        &self.meal_name
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn item_count(&self) -> i32 {
        i32::try_from(self.item_count).unwrap_or(i32::MAX)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// `-- Grill --` gives `Some("Grill")`. A marker with nothing inside, like
/// `----`, gives `Some("")`. Anything else is not a header.
pub fn category_header(text: &str) -> Option<&str> {
    if !(text.starts_with("--") && text.ends_with("--")) {
        return None;
    }
    let inner = text[2..].trim_start();
    let inner = inner.strip_suffix("--").unwrap_or(inner);
    Some(inner.trim())
}

/// Serving sizes (`1/2 CUP`, `2 OZ`, `3 SLICES`) sit in their own cells next
/// to the item names.
pub fn is_serving_size(text: &str) -> bool {
    static_regex!(SERVING_SIZE <- r"^(?:\d+(?:\.\d+)?|\d+/\d+)\s*(?:OZ|EACH|PIECE|SLICE|SLICES|Roll|Pita|OZL|CUP|TBSP|TSP|G|ML|LB|SERVING|SERVINGS)L?$");
    SERVING_SIZE.is_match(text)
}

pub fn is_excluded(text: &str) -> bool {
    NAVIGATION.iter().any(|nav| text.contains(nav))
        || is_serving_size(text)
        || text.chars().count() > MAX_ITEM_LEN
}

#[derive(Debug, Default)]
struct CategoryBuilder {
    name: String,
    items: Vec<MenuItem>,
    seen: HashSet<String>,
}

/// Walks every table cell of a menu page in document order, filing each item
/// under the category header that most recently preceded it. Categories that
/// end up empty are left out.
pub fn parse_categories(page: &str) -> Vec<Category> {
    static_selector!(CELL_SELECTOR <- "td");
    let document = Html::parse_document(page);

    let mut categories: Vec<CategoryBuilder> = Vec::new();
    let mut current: Option<usize> = None;

    for cell in document.select(&CELL_SELECTOR) {
        let text = element_text(cell);
        if text.is_empty() {
            continue;
        }

        if let Some(name) = category_header(&text) {
            current = if name.is_empty() {
                None
            } else if let Some(i) = categories.iter().position(|c| c.name == name) {
                Some(i)
            } else {
                categories.push(CategoryBuilder {
                    name: name.to_owned(),
                    ..CategoryBuilder::default()
                });
                Some(categories.len() - 1)
            };
            continue;
        }

        let Some(i) = current else {
            continue;
        };
        if is_excluded(&text) {
            continue;
        }
        let category = &mut categories[i];
        if category.seen.insert(text.clone()) {
            category.items.push(MenuItem::from_cell(cell, text));
        }
    }

    categories
        .into_iter()
        .filter(|c| !c.items.is_empty())
        .map(|c| Category {
            name: c.name,
            items: c.items,
        })
        .collect()
}
