mod dates;
mod urls;

use std::fmt::Display;
use std::slice::Iter;

use juniper::{graphql_object, GraphQLEnum};

use crate::error::{Error, Result};

pub use dates::{available_dates, escape_date, today, unescape_date, AvailableDate};
pub use urls::Site;

#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, GraphQLEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MealKind {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealKind {
    pub const ALL: [Self; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

impl Display for MealKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page-visible meal names of one location. `None` means the location does
/// not serve that meal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealNames {
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
}

impl MealNames {
    pub fn new(breakfast: Option<&str>, lunch: Option<&str>, dinner: Option<&str>) -> Self {
        Self {
            breakfast: breakfast.map(str::to_owned),
            lunch: lunch.map(str::to_owned),
            dinner: dinner.map(str::to_owned),
        }
    }

    pub fn get(&self, meal: MealKind) -> Option<&str> {
        match meal {
            MealKind::Breakfast => self.breakfast.as_deref(),
            MealKind::Lunch => self.lunch.as_deref(),
            MealKind::Dinner => self.dinner.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    id: String, // the `locationNum` query parameter, ex. "30" for Annenberg
    name: String,
    display_name: String,
    meal_names: MealNames,
}

impl Location {
    pub fn new(id: &str, name: &str, display_name: &str, meal_names: MealNames) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            display_name: display_name.to_owned(),
            meal_names,
        }
    }

    pub fn available_meals(&self) -> Vec<MealKind> {
        MealKind::ALL
            .into_iter()
            .filter(|meal| self.meal_names.get(*meal).is_some())
            .collect()
    }
}

#[graphql_object]
impl Location {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn meals(&self) -> Vec<MealKind> {
        self.available_meals()
    }

    pub fn meal_name(&self, meal: MealKind) -> Option<&str> {
        self.meal_names.get(meal)
    }
}

/// The fixed set of dining locations, defined once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    locations: Vec<Location>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::harvard()
    }
}

impl Registry {
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    pub fn harvard() -> Self {
        Self::new(vec![
            Location::new(
                "30",
                "Annenberg",
                "Annenberg Dining Hall",
                MealNames::new(Some("Breakfast Menu"), Some("Lunch Menu"), Some("Dinner Menu")),
            ),
            Location::new(
                "08",
                "Quincy",
                "Quincy House",
                MealNames::new(Some("Breakfast"), Some("LUNCH"), Some("DINNER")),
            ),
            Location::new(
                "38",
                "Houses",
                "Houses (except Quincy)",
                MealNames::new(Some("Breakfast"), Some("Lunch"), Some("Dinner")),
            ),
        ])
    }

    pub fn iter(&self) -> Iter<Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn location(&self, location_id: &str) -> Result<&Location> {
        self.locations
            .iter()
            .find(|location| location.id == location_id)
            .ok_or_else(|| Error::UnknownLocation(location_id.to_owned()))
    }

    pub fn resolve_meal_name(&self, location_id: &str, meal: MealKind) -> Result<&str> {
        let location = self.location(location_id)?;
        location
            .meal_names
            .get(meal)
            .ok_or_else(|| Error::UnsupportedMeal {
                location: location.display_name.clone(),
                meal,
            })
    }

    pub fn available_meals(&self, location_id: &str) -> Result<Vec<MealKind>> {
        self.location(location_id).map(Location::available_meals)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Registry with one lunch-only location, "99".
    pub(crate) fn lunch_only_registry() -> Registry {
        Registry::new(vec![Location::new(
            "99",
            "Flyby",
            "Flyby",
            MealNames::new(None, Some("Lunch"), None),
        )])
    }

    #[test]
    fn test_resolve_agrees_with_available_meals() {
        let registries = [Registry::harvard(), lunch_only_registry()];
        for registry in &registries {
            for location in registry.iter() {
                let available = registry.available_meals(location.id()).unwrap();
                for meal in MealKind::ALL {
                    let resolved = registry.resolve_meal_name(location.id(), meal);
                    if available.contains(&meal) {
                        assert!(!resolved.unwrap().is_empty());
                    } else {
                        assert!(matches!(resolved, Err(Error::UnsupportedMeal { .. })));
                    }
                }
            }
        }
    }

    #[test]
    fn test_meal_names() {
        let registry = Registry::harvard();
        assert_eq!(
            registry.resolve_meal_name("30", MealKind::Lunch).unwrap(),
            "Lunch Menu"
        );
        assert_eq!(
            registry.resolve_meal_name("08", MealKind::Dinner).unwrap(),
            "DINNER"
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_unknown_location() {
        let registry = Registry::harvard();
        assert!(matches!(
            registry.resolve_meal_name("12", MealKind::Lunch),
            Err(Error::UnknownLocation(id)) if id == "12"
        ));
        assert!(matches!(
            registry.available_meals("12"),
            Err(Error::UnknownLocation(_))
        ));
    }

    #[test]
    fn test_available_meals_order() {
        let registry = Registry::new(vec![Location::new(
            "1",
            "Late",
            "Late",
            MealNames::new(None, Some("Lunch"), Some("Dinner")),
        )]);
        assert_eq!(
            registry.available_meals("1").unwrap(),
            vec![MealKind::Lunch, MealKind::Dinner]
        );
        assert_eq!(
            lunch_only_registry().available_meals("99").unwrap(),
            vec![MealKind::Lunch]
        );
    }

    #[test]
    fn test_unsupported_meal_message() {
        let err = lunch_only_registry()
            .resolve_meal_name("99", MealKind::Breakfast)
            .unwrap_err();
        assert_eq!(err.to_string(), "Flyby does not serve breakfast");
        assert!(err.is_configuration());
    }
}
