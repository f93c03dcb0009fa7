use serde::{Deserialize, Serialize};

/// `page` and `limit` as sent by the client. Missing or zero values fall back to defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub pages: usize,
}

/// Cuts one page out of `items`, which must already be sorted.
///
/// `limit` is capped at `max_limit`. A page past the end yields no items but still reports
/// the real `total` and `pages`.
pub fn paginate<T>(
    items: Vec<T>,
    request: PageRequest,
    default_limit: u32,
    max_limit: u32,
) -> (Vec<T>, Pagination) {
    let page = request.page.filter(|p| *p > 0).unwrap_or(1);
    let limit = request
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(default_limit)
        .clamp(1, max_limit.max(1));

    let total = items.len();
    let pages = total.div_ceil(limit as usize);
    let skip = (page as usize - 1).saturating_mul(limit as usize);
    let slice = items.into_iter().skip(skip).take(limit as usize).collect();

    (
        slice,
        Pagination {
            page,
            limit,
            total,
            pages,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let (items, p) = paginate((1..=25).collect::<Vec<u32>>(), PageRequest::new(2, 10), 10, 100);
        assert_eq!(items, (11..=20).collect::<Vec<u32>>());
        assert_eq!(
            p,
            Pagination {
                page: 2,
                limit: 10,
                total: 25,
                pages: 3
            }
        );
    }

    #[test]
    fn test_defaults_and_cap() {
        let (items, p) = paginate((1..=5).collect::<Vec<u32>>(), PageRequest::default(), 20, 100);
        assert_eq!(items.len(), 5);
        assert_eq!((p.page, p.limit, p.pages), (1, 20, 1));

        let (_, p) = paginate(Vec::<u32>::new(), PageRequest::new(0, 1000), 10, 100);
        assert_eq!((p.page, p.limit, p.total, p.pages), (1, 100, 0, 0));
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let (items, p) = paginate((1..=3).collect::<Vec<u32>>(), PageRequest::new(9, 2), 10, 100);
        assert!(items.is_empty());
        assert_eq!(p.pages, 2);
    }
}
