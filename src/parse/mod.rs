//! Extraction from the three FoodPro page families: the menu listing, the
//! per-item detail label and the tabular nutrition report. Every function
//! here takes page source and returns owned data, so no parsed document
//! outlives the call.
mod detail_page;
mod error;
mod menu_page;
mod report_page;
pub mod statics;
mod text;

pub use detail_page::{find_rec_num, NutritionRecord};
pub use error::Error;
pub use menu_page::{parse_categories, MenuItem, MenuResult};
pub use report_page::{NutritionReport, NutritionTableRow, MACRO_COLUMNS, MINERAL_COLUMNS};
