use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use scraper::Selector;

/// A CSS selector or regex written as a literal and compiled on first use.
#[derive(Debug)]
pub struct Static<T> {
    cell: OnceLock<T>,
    source: &'static str,
    compile: fn(&'static str) -> T,
}

impl<T> Static<T> {
    pub const fn new(source: &'static str, compile: fn(&'static str) -> T) -> Self {
        Self {
            cell: OnceLock::new(),
            source,
            compile,
        }
    }
}

impl<T> core::ops::Deref for Static<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.cell.get_or_init(|| (self.compile)(self.source))
    }
}

pub fn selector(source: &'static str) -> Selector {
    match Selector::parse(source) {
        Ok(sel) => sel,
        Err(e) => panic!("Error parsing static selector {source}: {e:?}"),
    }
}

/// Patterns are matched case-insensitively, like the labels they target.
pub fn regex(source: &'static str) -> Regex {
    match RegexBuilder::new(source).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => panic!("Error compiling static regex {source}: {e}"),
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::parse::statics::Static<scraper::Selector> =
            $crate::parse::statics::Static::new($sel, $crate::parse::statics::selector);
    };
}

#[macro_export]
macro_rules! static_regex {
    ($x: ident <- $re: literal) => {
        static $x: $crate::parse::statics::Static<regex::Regex> =
            $crate::parse::statics::Static::new($re, $crate::parse::statics::regex);
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_compiled_once() {
        static_regex!(LABEL <- r"protein\s+(\d+)g");
        let first: *const regex::Regex = &*LABEL;
        let second: *const regex::Regex = &*LABEL;
        assert_eq!(first, second);
        assert!(LABEL.is_match("PROTEIN 12g"));
    }

    #[test]
    fn test_selector() {
        static_selector!(CELL <- "td");
        let html = scraper::Html::parse_document("<table><tr><td>a</td><td>b</td></tr></table>");
        assert_eq!(html.select(&CELL).count(), 2);
    }
}
