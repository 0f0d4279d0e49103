use serde::Deserialize;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=N` query. Anything that is not a positive integer reads as page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map_or(1, |p| usize::try_from(p).unwrap_or(usize::MAX))
    }
}

/// Slice one page out of an ordered list. Pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: &str) -> PageQuery {
        PageQuery { page: Some(page.to_string()) }
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(PageQuery::default().page(), 1);
        assert_eq!(query("abc").page(), 1);
        assert_eq!(query("0").page(), 1);
        assert_eq!(query("-3").page(), 1);
        assert_eq!(query("2").page(), 2);
    }

    #[test]
    fn slices_fixed_size_pages() {
        let items: Vec<i32> = (1..=19).collect();
        assert_eq!(paginate(&items, 1), &items[0..10]);
        assert_eq!(paginate(&items, 2), &items[10..19]);
        assert!(paginate(&items, 3).is_empty());
        assert!(paginate(&items, 1000).is_empty());
        assert!(paginate(&items, usize::MAX).is_empty());
    }

    #[test]
    fn keeps_input_order() {
        let items = vec![5, 3, 9];
        assert_eq!(paginate(&items, 1), &[5, 3, 9]);
    }
}
