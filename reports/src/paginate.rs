//! Deterministic pagination of a filtered sequence.

/// One page of results plus the total count of the sequence before slicing.
#[derive(Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Slice `rows` into the 1-based `page` of size `limit`.
///
/// The total is counted before slicing. A page past the end yields an empty
/// slice; degenerate inputs (`page == 0`, `limit == 0`) produce degenerate
/// slices rather than panicking. Sanity of the values is the caller's
/// concern.
pub fn paginate<T>(rows: Vec<T>, page: usize, limit: usize) -> Page<T> {
    let total = rows.len();
    let start = page.saturating_sub(1).saturating_mul(limit);
    let items = rows.into_iter().skip(start).take(limit).collect();
    Page { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_pages_and_reports_total() {
        let rows: Vec<u32> = (0..25).collect();

        let first = paginate(rows.clone(), 1, 10);
        assert_eq!(first.total, 25);
        assert_eq!(first.items, (0..10).collect::<Vec<_>>());

        let last = paginate(rows.clone(), 3, 10);
        assert_eq!(last.total, 25);
        assert_eq!(last.items, (20..25).collect::<Vec<_>>());
    }

    #[test]
    fn page_past_the_end_is_empty_not_an_error() {
        let page = paginate(vec![1, 2, 3], 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn one_full_page_reconstructs_the_sequence() {
        let rows: Vec<u32> = (0..7).collect();
        let page = paginate(rows.clone(), 1, rows.len());
        assert_eq!(page.items, rows);
        assert_eq!(page.total, 7);
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        let zero_page = paginate(vec![1, 2, 3], 0, 2);
        assert_eq!(zero_page.items, vec![1, 2]);

        let zero_limit = paginate(vec![1, 2, 3], 1, 0);
        assert!(zero_limit.items.is_empty());
        assert_eq!(zero_limit.total, 3);

        let huge = paginate(vec![1], usize::MAX, usize::MAX);
        assert!(huge.items.is_empty());
    }

    #[test]
    fn empty_input_paginates_cleanly() {
        let page = paginate(Vec::<u32>::new(), 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }
}
