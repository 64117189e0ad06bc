use juniper::graphql_object;
use scraper::ElementRef;

use super::dietary::DietaryFlags;
use crate::static_selector;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "MenuItemRepr", into = "MenuItemRepr")]
pub struct MenuItem {
    name: String,
    dietary: DietaryFlags,
    nutrition_link: Option<String>,
}

// wire form keeps the three flags as separate booleans
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuItemRepr {
    name: String,
    vegan: bool,
    vegetarian: bool,
    halal: bool,
    nutrition_link: Option<String>,
}

impl From<MenuItem> for MenuItemRepr {
    fn from(item: MenuItem) -> Self {
        Self {
            vegan: item.vegan(),
            vegetarian: item.vegetarian(),
            halal: item.halal(),
            name: item.name,
            nutrition_link: item.nutrition_link,
        }
    }
}

impl From<MenuItemRepr> for MenuItem {
    fn from(repr: MenuItemRepr) -> Self {
        let mut dietary = DietaryFlags::empty();
        dietary.set(DietaryFlags::Vegan, repr.vegan);
        dietary.set(DietaryFlags::Vegetarian, repr.vegetarian);
        dietary.set(DietaryFlags::Halal, repr.halal);
        Self {
            name: repr.name,
            dietary,
            nutrition_link: repr.nutrition_link,
        }
    }
}

impl MenuItem {
    pub fn new(name: impl Into<String>, dietary: DietaryFlags, nutrition_link: Option<String>) -> Self {
        Self {
            name: name.into(),
            dietary,
            nutrition_link,
        }
    }

    /// Builds the item for an already-accepted cell whose trimmed text is `name`.
    pub fn from_cell(cell: ElementRef<'_>, name: String) -> Self {
        static_selector!(LINK_SELECTOR <- "a");
        let nutrition_link = cell
            .select(&LINK_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_owned);
        Self {
            name,
            dietary: DietaryFlags::from_cell(cell),
            nutrition_link,
        }
    }

    pub const fn dietary(&self) -> DietaryFlags {
        self.dietary
    }
}

#[graphql_object]
impl MenuItem {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vegan(&self) -> bool {
        self.dietary.contains(DietaryFlags::Vegan)
    }

    pub fn vegetarian(&self) -> bool {
        self.dietary.contains(DietaryFlags::Vegetarian)
    }

    pub fn halal(&self) -> bool {
        self.dietary.contains(DietaryFlags::Halal)
    }

    pub fn nutrition_link(&self) -> Option<&str> {
        self.nutrition_link.as_deref()
    }
}
