mod dietary;
mod menu;
mod menu_item;

pub use menu::{parse_categories, MenuResult};
pub use menu_item::MenuItem;
