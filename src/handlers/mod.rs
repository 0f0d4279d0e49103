// handlers/mod.rs - route handlers grouped by service
//
// trivia:  public question/category/quiz endpoints
// drinks:  coffee-shop endpoints; mutations and the detail listing sit behind
//          the permission middleware wired up in app.rs
// service: root, health and fallbacks

pub mod drinks;
pub mod service;
pub mod trivia;

/// Parse a path id the way an `<int:id>` route segment would: digits only
pub(crate) fn route_id(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::route_id;

    #[test]
    fn route_id_accepts_digits_only() {
        assert_eq!(route_id("42"), Some(42));
        assert_eq!(route_id("007"), Some(7));
        assert_eq!(route_id("-1"), None);
        assert_eq!(route_id("1.5"), None);
        assert_eq!(route_id("abc"), None);
        assert_eq!(route_id(""), None);
        assert_eq!(route_id("99999999999"), None);
    }
}
