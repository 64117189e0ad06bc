//! The network-facing side of extraction: resolve the meal through the
//! registry, fetch the page, hand its source to `parse`.
mod menu;
mod nutrition;
mod report;

use crate::fetch::Fetcher;
use crate::locations::Registry;

pub use report::SelectedItem;

#[derive(Debug, Clone)]
pub struct Pipeline {
    fetcher: Fetcher,
    registry: Registry,
}

impl Pipeline {
    pub const fn new(fetcher: Fetcher, registry: Registry) -> Self {
        Self { fetcher, registry }
    }

    pub const fn registry(&self) -> &Registry {
        &self.registry
    }
}
