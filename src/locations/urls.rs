use url::{form_urlencoded, Url};

use crate::parse::Error;

pub const DEFAULT_BASE_URL: &str = "https://www.foodpro.huds.harvard.edu/foodpro/";

const SITE_NAME: &str = "HARVARD+UNIVERSITY+DINING+SERVICES";
const LOCATION_NAME: &str = "Dining+Hall";

/// The FoodPro site the pages are fetched from.
///
/// Dates are expected in the site's escaped form (`MM%2fDD%2fYYYY`) and are
/// inserted verbatim. Meal names are escaped here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    base: Url,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("base url should be valid"),
        }
    }
}

impl Site {
    pub fn new(base: &str) -> Result<Self, Error> {
        let mut base = Url::parse(base)?;
        // `join` replaces the last path segment unless the base ends in a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub const fn base(&self) -> &Url {
        &self.base
    }

    pub fn menu_url(&self, location_id: &str, date: &str, meal_name: &str) -> Result<Url, Error> {
        let meal_name = escape(meal_name);
        self.page(
            "longmenucopy.aspx",
            &format!(
                "sName={SITE_NAME}&locationNum={location_id}&locationName={LOCATION_NAME}\
                &naFlag=1&WeeksMenus=This+Week%27s+Menus&dtdate={date}&mealName={meal_name}"
            ),
        )
    }

    pub fn nutrition_report_url(
        &self,
        location_id: &str,
        date: &str,
        meal_name: &str,
    ) -> Result<Url, Error> {
        let meal_name = escape(meal_name);
        self.page(
            "showreport.aspx",
            &format!(
                "locationNum={location_id}&locationName={LOCATION_NAME}&dtdate={date}\
                &mealName={meal_name}&sName={SITE_NAME}"
            ),
        )
    }

    pub fn detail_url(&self, location_id: &str, date: &str, rec_num: &str) -> Result<Url, Error> {
        self.page(
            "menudetail.aspx",
            &format!(
                "locationNum={location_id}&locationName={LOCATION_NAME}&dtdate={date}\
                &RecNumAndPort={rec_num}"
            ),
        )
    }

    fn page(&self, page: &str, query: &str) -> Result<Url, Error> {
        let mut url = self.base.join(page)?;
        url.set_query(Some(query));
        Ok(url)
    }
}

fn escape(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_url() {
        let url = Site::default()
            .menu_url("30", "10%2f17%2f2026", "Lunch Menu")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.foodpro.huds.harvard.edu/foodpro/longmenucopy.aspx?\
            sName=HARVARD+UNIVERSITY+DINING+SERVICES&locationNum=30&locationName=Dining+Hall\
            &naFlag=1&WeeksMenus=This+Week%27s+Menus&dtdate=10%2f17%2f2026&mealName=Lunch+Menu"
        );
    }

    #[test]
    fn test_report_url_keeps_escaped_date() {
        let url = Site::default()
            .nutrition_report_url("08", "01%2f02%2f2026", "LUNCH")
            .unwrap();
        assert_eq!(url.path(), "/foodpro/showreport.aspx");
        let dtdate = url
            .query_pairs()
            .find(|(k, _)| k == "dtdate")
            .map(|(_, v)| v.into_owned());
        assert_eq!(dtdate.as_deref(), Some("01/02/2026"));
        assert!(url.as_str().contains("dtdate=01%2f02%2f2026"));
    }

    #[test]
    fn test_detail_url() {
        let url = Site::new("http://127.0.0.1:8080/foodpro")
            .unwrap()
            .detail_url("38", "10%2f17%2f2026", "161007*1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/foodpro/menudetail.aspx?locationNum=38&locationName=Dining+Hall\
            &dtdate=10%2f17%2f2026&RecNumAndPort=161007*1"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(Site::new("not a url"), Err(Error::InvalidUrl(_))));
    }
}
