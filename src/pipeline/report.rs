use juniper::GraphQLInputObject;
use log::info;

use super::Pipeline;
use crate::error::Result;
use crate::parse::NutritionReport;

/// A line of the caller's meal: an item and how many servings of it.
#[derive(Debug, Clone, PartialEq, GraphQLInputObject, serde::Serialize, serde::Deserialize)]
pub struct SelectedItem {
    pub name: String,
    pub quantity: f64,
}

impl Pipeline {
    /// Scrapes the tabular nutrition report of a whole meal. Unlike the menu
    /// and item lookups, failures are returned to the caller.
    ///
    /// The report page always covers the full meal; `items` is what the
    /// caller asked about and only shows up in the logs.
    pub async fn fetch_nutrition_report(
        &self,
        location_id: &str,
        date: &str,
        meal_name: &str,
        items: &[SelectedItem],
    ) -> Result<NutritionReport> {
        info!(
            "Fetching nutrition report for {} items at location {location_id}, meal {meal_name}",
            items.len()
        );
        let url = self
            .fetcher
            .site()
            .nutrition_report_url(location_id, date, meal_name)?;
        let page = self.fetcher.page(url).await?;
        let report = NutritionReport::from_report_page(&page)?;
        Ok(report)
    }
}
