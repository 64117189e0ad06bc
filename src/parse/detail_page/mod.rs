mod nutrition;
mod rec_num;

pub use nutrition::NutritionRecord;
pub use rec_num::find_rec_num;
