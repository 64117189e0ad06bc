use scraper::ElementRef;

/// All text below `element`, concatenated in document order and trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.trim().to_owned()
}

/// Reads the longest numeric prefix of `s` (optional sign, digits, at most
/// one decimal point), so `"1.2.3"` reads as `1.2` and `"12g"` as `12`.
/// Leading whitespace is skipped. Returns `None` when there is no number.
pub fn lenient_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '-' | '+' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    let number = s[..end].trim_end_matches('.');
    number.parse().ok()
}
