//! Page-number pagination shared by every list endpoint.

/// Items per page on every list endpoint.
pub const PAGE_SIZE: u64 = 20;

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

impl PageRequest {
    pub fn new(number: u64) -> Option<Self> {
        (number > 0).then_some(Self { number })
    }

    pub fn first() -> Self {
        Self { number: 1 }
    }

    /// `?page=` as sent by the client; absent means the first page.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            None => Some(Self::first()),
            Some(raw) => raw.trim().parse::<u64>().ok().and_then(Self::new),
        }
    }

    pub fn number(self) -> u64 {
        self.number
    }

    pub fn size(self) -> u64 {
        PAGE_SIZE
    }

    /// 0-based, as `Paginator::fetch_page` counts.
    pub fn index(self) -> u64 {
        self.number - 1
    }

    pub fn offset(self) -> u64 {
        self.index() * self.size()
    }
}

/// One page of a result set plus the size of the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Cuts the requested page out of a fully loaded list.
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size() as usize)
            .collect();
        Self::new(items, total, request)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    pub fn number(&self) -> u64 {
        self.request.number()
    }

    pub fn has_next(&self) -> bool {
        self.request.offset() + self.request.size() < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.request.number() > 1
    }

    /// The first page may be empty; any later page past the end is invalid.
    pub fn is_out_of_range(&self) -> bool {
        self.has_previous() && self.request.offset() >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u64) -> PageRequest {
        PageRequest::new(n).unwrap()
    }

    #[test]
    fn parses_page_numbers() {
        assert_eq!(PageRequest::parse(None), Some(PageRequest::first()));
        assert_eq!(PageRequest::parse(Some(" 3 ")).map(PageRequest::number), Some(3));
        assert_eq!(PageRequest::parse(Some("0")), None);
        assert_eq!(PageRequest::parse(Some("-1")), None);
        assert_eq!(PageRequest::parse(Some("two")), None);
    }

    #[test]
    fn from_all_cuts_the_requested_window() {
        let all: Vec<u64> = (1..=45).collect();

        let second = Page::from_all(all.clone(), page(2));
        assert_eq!(second.items.first(), Some(&21));
        assert_eq!(second.items.len(), 20);
        assert_eq!(second.total, 45);
        assert!(second.has_next());
        assert!(second.has_previous());

        let third = Page::from_all(all, page(3));
        assert_eq!(third.items, vec![41, 42, 43, 44, 45]);
        assert!(!third.has_next());
    }

    #[test]
    fn exact_multiple_has_no_next_page() {
        let full = Page::from_all((0..20).collect::<Vec<_>>(), PageRequest::first());
        assert!(!full.has_next());
        assert!(!full.has_previous());
    }

    #[test]
    fn empty_first_page_is_valid_but_later_pages_are_not() {
        assert!(!Page::<u8>::from_all(Vec::new(), PageRequest::first()).is_out_of_range());
        assert!(Page::<u8>::from_all(Vec::new(), page(2)).is_out_of_range());
        assert!(Page::from_all(vec![1; 20], page(2)).is_out_of_range());
        assert!(!Page::from_all(vec![1; 21], page(2)).is_out_of_range());
    }
}
