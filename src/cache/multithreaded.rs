use std::{collections::HashSet, ops::Deref};

use futures::future::join_all;
use futures_locks::RwLock;
use log::info;

use super::{MenuCache, MenuKey};
use crate::error::Result;
use crate::locations::{today, MealKind};
use crate::parse::{MenuItem, MenuResult, NutritionRecord};
use crate::pipeline::Pipeline;

/// How many nutrition pages the preloader requests at once.
pub const PRELOAD_BATCH: usize = 5;

/// A [`MenuCache`] shared between request handlers. Lookups that miss go to
/// the pipeline and store what comes back.
#[derive(Debug)]
pub struct Multithreaded(RwLock<MenuCache>);

impl Default for Multithreaded {
    fn default() -> Self {
        Self::new(MenuCache::default())
    }
}

impl Multithreaded {
    pub fn new(cache: MenuCache) -> Self {
        Self(RwLock::new(cache))
    }

    pub async fn get(&self) -> impl Deref<Target = MenuCache> + '_ {
        self.0.read().await
    }

    /// Drops yesterday's entries. Returns whether it did.
    pub async fn refresh(&self) -> bool {
        let today = today();
        let stale = self.0.read().await.needs_refresh_at(today);
        if !stale {
            return false;
        }
        let mut guard = self.0.write().await;
        // another request may have reset it while we waited
        if guard.needs_refresh_at(today) {
            info!("Menu cache is from {}, starting over for {today}", guard.day());
            guard.reset(today);
        }
        true
    }

    pub async fn has_menu(&self, location_id: &str, meal: MealKind, date: &str) -> bool {
        let key = MenuKey::new(location_id, meal, date);
        self.0.read().await.menu(&key).is_some()
    }

    pub async fn menu(
        &self,
        pipeline: &Pipeline,
        location_id: &str,
        date: &str,
        meal: MealKind,
    ) -> Result<MenuResult> {
        self.refresh().await;
        let key = MenuKey::new(location_id, meal, date);
        let cached = self.0.read().await.menu(&key).cloned();
        if let Some(menu) = cached {
            return Ok(menu);
        }

        let menu = pipeline.fetch_menu(location_id, date, meal).await?;
        self.0.write().await.insert_menu(key, menu.clone());
        Ok(menu)
    }

    pub async fn all_meals(
        &self,
        pipeline: &Pipeline,
        location_id: &str,
        date: &str,
    ) -> Result<Vec<MenuResult>> {
        let meals = pipeline.registry().available_meals(location_id)?;
        let mut menus = Vec::with_capacity(meals.len());
        for meal in meals {
            menus.push(self.menu(pipeline, location_id, date, meal).await?);
        }
        Ok(menus)
    }

    /// Only labels that were found are stored; a miss is retried next time.
    pub async fn item_nutrition(
        &self,
        pipeline: &Pipeline,
        location_id: &str,
        date: &str,
        meal: MealKind,
        item_name: &str,
    ) -> Result<Option<NutritionRecord>> {
        self.refresh().await;
        let key = MenuKey::new(location_id, meal, date);
        let cached = self.0.read().await.nutrition(&key, item_name).cloned();
        if cached.is_some() {
            return Ok(cached);
        }

        let record = pipeline
            .fetch_item_nutrition(location_id, date, meal, item_name)
            .await?;
        if let Some(record) = &record {
            self.0.write().await.insert_nutrition(key, record.clone());
        }
        Ok(record)
    }

    /// Fetches the label of every item on a menu that is not cached yet,
    /// [`PRELOAD_BATCH`] requests at a time. Returns how many labels were
    /// stored.
    pub async fn preload_nutrition(
        &self,
        pipeline: &Pipeline,
        location_id: &str,
        date: &str,
        meal: MealKind,
    ) -> Result<usize> {
        let menu = self.menu(pipeline, location_id, date, meal).await?;
        let key = MenuKey::new(location_id, meal, date);
        let pending: Vec<&str> = {
            let cache = self.0.read().await;
            let mut seen = HashSet::new();
            menu.categories
                .iter()
                .flat_map(|category| category.items.iter().map(MenuItem::name))
                .filter(|name| seen.insert(*name) && cache.nutrition(&key, name).is_none())
                .collect()
        };
        info!(
            "Preloading nutrition for {} items at location {location_id}, meal {meal}",
            pending.len()
        );

        let mut loaded = 0;
        for batch in pending.chunks(PRELOAD_BATCH) {
            let results = join_all(
                batch
                    .iter()
                    .map(|name| self.item_nutrition(pipeline, location_id, date, meal, name)),
            )
            .await;
            for result in results {
                if result?.is_some() {
                    loaded += 1;
                }
            }
        }
        Ok(loaded)
    }
}
