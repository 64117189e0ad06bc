use log::{info, warn};

use super::Pipeline;
use crate::error::Result;
use crate::locations::{unescape_date, MealKind};
use crate::parse::{parse_categories, MenuResult};

impl Pipeline {
    /// Scrapes one meal's menu. Only registry errors are returned as `Err`;
    /// a page that cannot be fetched yields an empty result carrying the
    /// error message.
    pub async fn fetch_menu(&self, location_id: &str, date: &str, meal: MealKind) -> Result<MenuResult> {
        let meal_name = self.registry.resolve_meal_name(location_id, meal)?;
        info!("Scraping {meal} ({meal_name}) for location {location_id} on {date}");

        let page = match self.menu_page(location_id, date, meal_name).await {
            Ok(page) => page,
            Err(e) if e.is_configuration() => return Err(e),
            Err(e) => {
                warn!("Error scraping {meal} menu for location {location_id}: {e}");
                return Ok(MenuResult::failed(
                    location_id,
                    unescape_date(date),
                    meal,
                    meal_name,
                    e.to_string(),
                ));
            }
        };
        let categories = parse_categories(&page);
        Ok(MenuResult::new(
            location_id,
            unescape_date(date),
            meal,
            meal_name,
            categories,
        ))
    }

    /// Every meal the location serves, in breakfast, lunch, dinner order.
    pub async fn fetch_all_meals(&self, location_id: &str, date: &str) -> Result<Vec<MenuResult>> {
        let meals = self.registry.available_meals(location_id)?;
        let mut menus = Vec::with_capacity(meals.len());
        for meal in meals {
            menus.push(self.fetch_menu(location_id, date, meal).await?);
        }
        Ok(menus)
    }

    pub(super) async fn menu_page(&self, location_id: &str, date: &str, meal_name: &str) -> Result<String> {
        let url = self.fetcher.site().menu_url(location_id, date, meal_name)?;
        self.fetcher.page(url).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;

    use super::*;
    use crate::error::Error;
    use crate::fetch::tests::test_fetcher;
    use crate::locations::tests::lunch_only_registry;
    use crate::pipeline::tests::{fixture, test_pipeline};

    const DATE: &str = "10%2f17%2f2026";

    #[tokio::test]
    async fn test_fetch_menu() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/foodpro/longmenucopy.aspx")
                    .query_param("locationNum", "30");
                then.status(200).body(fixture("menu/lunch.html"));
            })
            .await;
        let pipeline = test_pipeline(&server);

        let menu = pipeline.fetch_menu("30", DATE, MealKind::Lunch).await.unwrap();
        mock.assert_async().await;
        assert_eq!(menu.error, None);
        assert_eq!(menu.date, "10/17/2026");
        assert_eq!(menu.meal_name, "Lunch Menu");
        assert_eq!(menu.item_count, 6);
        assert_eq!(menu.categories.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/foodpro/longmenucopy.aspx");
                then.status(503);
            })
            .await;
        let pipeline = test_pipeline(&server);

        let menu = pipeline.fetch_menu("08", DATE, MealKind::Dinner).await.unwrap();
        assert!(menu.categories.is_empty());
        assert_eq!(menu.item_count, 0);
        assert_eq!(menu.meal_name, "DINNER");
        assert!(menu.error.is_some());
    }

    #[tokio::test]
    async fn test_timeout_degrades() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/foodpro/longmenucopy.aspx");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .body(fixture("menu/lunch.html"));
            })
            .await;
        let pipeline = Pipeline::new(
            test_fetcher(&server, Duration::from_millis(200)),
            crate::locations::Registry::harvard(),
        );

        let menu = pipeline.fetch_menu("30", DATE, MealKind::Lunch).await.unwrap();
        assert_eq!(menu.item_count, 0);
        assert!(menu.error.is_some());
    }

    #[tokio::test]
    async fn test_unsupported_meal_before_any_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|_, then| {
                then.status(200).body(fixture("menu/lunch.html"));
            })
            .await;
        let pipeline = Pipeline::new(
            test_fetcher(&server, Duration::from_secs(5)),
            lunch_only_registry(),
        );

        let result = pipeline.fetch_menu("99", DATE, MealKind::Breakfast).await;
        assert!(matches!(result, Err(Error::UnsupportedMeal { meal: MealKind::Breakfast, .. })));
        let result = pipeline.fetch_menu("404", DATE, MealKind::Lunch).await;
        assert!(matches!(result, Err(Error::UnknownLocation(_))));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_fetch_all_meals() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/foodpro/longmenucopy.aspx");
                then.status(200).body(fixture("menu/lunch.html"));
            })
            .await;
        let pipeline = test_pipeline(&server);

        let menus = pipeline.fetch_all_meals("38", DATE).await.unwrap();
        let meals: Vec<_> = menus.iter().map(|m| m.meal).collect();
        assert_eq!(meals, MealKind::ALL);
        assert_eq!(mock.hits_async().await, 3);
    }
}
