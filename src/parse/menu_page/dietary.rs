use bitflags::bitflags;
use scraper::ElementRef;

use crate::static_selector;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DietaryFlags: u8 {
        const Vegan = 1;
        const Vegetarian = 1 << 1;
        const Halal = 1 << 2;
    }
}

// icon file name fragments; the site is inconsistent about the case of `hal`
static ICONS: [(&str, DietaryFlags); 4] = [
    ("vgn.gif", DietaryFlags::Vegan),
    ("veg.gif", DietaryFlags::Vegetarian),
    ("hal.gif", DietaryFlags::Halal),
    ("Hal.gif", DietaryFlags::Halal),
];

impl DietaryFlags {
    /// Flags for every legend icon found inside `cell`. Unknown icons are ignored.
    pub fn from_cell(cell: ElementRef<'_>) -> Self {
        static_selector!(ICON_SELECTOR <- "img[src]");
        cell.select(&ICON_SELECTOR)
            .filter_map(|img| img.value().attr("src"))
            .fold(Self::empty(), |acc, src| acc | Self::from_img_src(src))
    }

    fn from_img_src(src: &str) -> Self {
        ICONS
            .iter()
            .filter(|(fragment, _)| src.contains(fragment))
            .fold(Self::empty(), |acc, (_, flag)| acc | *flag)
    }
}
