mod multithreaded;

use std::collections::HashMap;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

use crate::locations::{today, MealKind};
use crate::parse::{MenuResult, NutritionRecord};

pub use multithreaded::Multithreaded;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuKey {
    pub location: String,
    pub meal: MealKind,
    /// Escaped, as passed to the site.
    pub date: String,
}

impl MenuKey {
    pub fn new(location: &str, meal: MealKind, date: &str) -> Self {
        Self {
            location: location.to_owned(),
            meal,
            date: date.to_owned(),
        }
    }
}

/// Scraped menus and nutrition labels for one local day. Menus are only
/// published a day at a time, so the whole cache is dropped at midnight
/// rather than per entry.
#[derive(Debug)]
pub struct MenuCache {
    day: NaiveDate,
    menus: HashMap<MenuKey, MenuResult>,
    nutrition: HashMap<MenuKey, HashMap<String, NutritionRecord>>,
}

impl Default for MenuCache {
    fn default() -> Self {
        Self::new(today())
    }
}

impl MenuCache {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            menus: HashMap::new(),
            nutrition: HashMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    #[inline]
    #[must_use]
    pub fn needs_refresh_at(&self, today: NaiveDate) -> bool {
        today != self.day
    }

    #[inline]
    #[must_use]
    pub fn time_until_refresh_at(&self, now: NaiveDateTime) -> Duration {
        (self.day + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .map_or_else(Duration::zero, |midnight| midnight.signed_duration_since(now))
    }

    #[inline]
    #[must_use]
    pub fn time_until_refresh(&self) -> Duration {
        self.time_until_refresh_at(Local::now().naive_local())
    }

    /// Empties the cache and starts it over for `day`.
    pub fn reset(&mut self, day: NaiveDate) {
        self.day = day;
        self.menus.clear();
        self.nutrition.clear();
    }

    pub fn menu(&self, key: &MenuKey) -> Option<&MenuResult> {
        self.menus.get(key)
    }

    /// Returns whether the menu was stored. Results that carry an error are
    /// not, so the next request tries the site again.
    pub fn insert_menu(&mut self, key: MenuKey, menu: MenuResult) -> bool {
        if menu.error.is_some() {
            return false;
        }
        self.menus.insert(key, menu);
        true
    }

    pub fn nutrition(&self, key: &MenuKey, item_name: &str) -> Option<&NutritionRecord> {
        self.nutrition.get(key)?.get(item_name)
    }

    pub fn insert_nutrition(&mut self, key: MenuKey, record: NutritionRecord) {
        self.nutrition
            .entry(key)
            .or_default()
            .insert(record.name.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.menus.len() + self.nutrition.values().map(HashMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
