use log::{info, warn};

use super::Pipeline;
use crate::error::Result;
use crate::locations::MealKind;
use crate::parse::{find_rec_num, NutritionRecord};

impl Pipeline {
    /// Scrapes the nutrition label of one menu item.
    ///
    /// The detail page is keyed by a record number that only appears in the
    /// menu page's links, so the menu page is fetched again to find it.
    /// `Ok(None)` means the item has no reachable label, or that a page could
    /// not be fetched; only registry errors are returned as `Err`.
    pub async fn fetch_item_nutrition(
        &self,
        location_id: &str,
        date: &str,
        meal: MealKind,
        item_name: &str,
    ) -> Result<Option<NutritionRecord>> {
        let meal_name = self.registry.resolve_meal_name(location_id, meal)?;
        info!("Fetching nutrition for {item_name:?} at location {location_id}, meal {meal}");

        match self.item_nutrition(location_id, date, meal_name, item_name).await {
            Ok(record) => Ok(record),
            Err(e) if e.is_configuration() => Err(e),
            Err(e) => {
                warn!("Error scraping nutrition for {item_name:?}: {e}");
                Ok(None)
            }
        }
    }

    async fn item_nutrition(
        &self,
        location_id: &str,
        date: &str,
        meal_name: &str,
        item_name: &str,
    ) -> Result<Option<NutritionRecord>> {
        let menu_page = self.menu_page(location_id, date, meal_name).await?;
        let Some(rec_num) = find_rec_num(&menu_page, item_name) else {
            info!("Could not find RecNumAndPort for {item_name:?}");
            return Ok(None);
        };
        log::debug!("Found RecNumAndPort {rec_num} for {item_name:?}");

        let url = self.fetcher.site().detail_url(location_id, date, &rec_num)?;
        let detail_page = self.fetcher.page(url).await?;
        Ok(Some(NutritionRecord::from_detail_page(item_name, &detail_page)))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;
    use crate::error::Error;
    use crate::pipeline::tests::{fixture, test_pipeline};

    const DATE: &str = "10%2f17%2f2026";

    async fn mock_menu(server: &MockServer) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/foodpro/longmenucopy.aspx");
                then.status(200).body(fixture("menu/lunch.html"));
            })
            .await
    }

    #[tokio::test]
    async fn test_fetch_item_nutrition() {
        let server = MockServer::start_async().await;
        let menu = mock_menu(&server).await;
        let detail = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/foodpro/menudetail.aspx")
                    .query_param("RecNumAndPort", "161007*1");
                then.status(200).body(fixture("detail/chicken.html"));
            })
            .await;
        let pipeline = test_pipeline(&server);

        let record = pipeline
            .fetch_item_nutrition("30", DATE, MealKind::Lunch, "Grilled Chicken Breast")
            .await
            .unwrap()
            .expect("the item links to a detail page");
        menu.assert_async().await;
        detail.assert_async().await;
        assert_eq!(record.name, "Grilled Chicken Breast");
        assert_eq!(record.calories, 187.0);
        assert_eq!(record.macros.protein, 35.2);
    }

    #[tokio::test]
    async fn test_unknown_item_is_none() {
        let server = MockServer::start_async().await;
        mock_menu(&server).await;
        let detail = server
            .mock_async(|when, then| {
                when.method(GET).path("/foodpro/menudetail.aspx");
                then.status(200).body(fixture("detail/chicken.html"));
            })
            .await;
        let pipeline = test_pipeline(&server);

        let record = pipeline
            .fetch_item_nutrition("30", DATE, MealKind::Lunch, "Lobster Thermidor")
            .await
            .unwrap();
        assert_eq!(record, None);
        assert_eq!(detail.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_detail_failure_is_none() {
        let server = MockServer::start_async().await;
        mock_menu(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/foodpro/menudetail.aspx");
                then.status(500);
            })
            .await;
        let pipeline = test_pipeline(&server);

        let record = pipeline
            .fetch_item_nutrition("30", DATE, MealKind::Lunch, "Grilled Chicken Breast")
            .await
            .unwrap();
        assert_eq!(record, None);
    }

    #[tokio::test]
    async fn test_unknown_location_propagates() {
        let server = MockServer::start_async().await;
        let pipeline = test_pipeline(&server);
        let result = pipeline
            .fetch_item_nutrition("77", DATE, MealKind::Lunch, "Grilled Chicken Breast")
            .await;
        assert!(matches!(result, Err(Error::UnknownLocation(_))));
    }
}
