use scraper::Html;

use crate::parse::text::element_text;
use crate::{static_regex, static_selector};

const DETAIL_PAGE: &str = "menudetail.aspx";

/// Finds the detail-page record identifier (`RecNumAndPort`) linked from the
/// first anchor on a menu page whose text is exactly `item_name`.
pub fn find_rec_num(menu_page: &str, item_name: &str) -> Option<String> {
    static_selector!(ANCHOR_SELECTOR <- "a[href]");
    let document = Html::parse_document(menu_page);
    document
        .select(&ANCHOR_SELECTOR)
        .filter(|a| element_text(*a) == item_name)
        .filter_map(|a| a.value().attr("href"))
        .find_map(rec_num_from_href)
}

pub fn rec_num_from_href(href: &str) -> Option<String> {
    static_regex!(REC_NUM <- r"RecNumAndPort=([^&]+)");
    if !href.contains(DETAIL_PAGE) {
        return None;
    }
    REC_NUM
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}
