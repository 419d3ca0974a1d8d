/// Resolve the position a newly inserted sibling should take.
///
/// No requested position, or a non-positive one, means append. Requests
/// inside the occupied range pass through untouched; requests past the end
/// are clamped to the append slot rather than rejected.
pub(crate) fn resolve_insert_order(existing: &[i32], requested: Option<i32>) -> i32 {
    let append = existing.iter().copied().max().unwrap_or(0) + 1;
    match requested {
        Some(value) if value >= 1 => value.min(append),
        _ => append,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_starts_at_one() {
        assert_eq!(resolve_insert_order(&[], None), 1);
        assert_eq!(resolve_insert_order(&[], Some(7)), 1);
    }

    #[test]
    fn absent_request_appends() {
        assert_eq!(resolve_insert_order(&[1, 2, 3], None), 4);
    }

    #[test]
    fn non_positive_request_appends() {
        assert_eq!(resolve_insert_order(&[1, 2, 3], Some(0)), 4);
        assert_eq!(resolve_insert_order(&[1, 2, 3], Some(-5)), 4);
    }

    #[test]
    fn in_range_request_passes_through() {
        assert_eq!(resolve_insert_order(&[1, 2, 3], Some(1)), 1);
        assert_eq!(resolve_insert_order(&[1, 2, 3], Some(2)), 2);
        assert_eq!(resolve_insert_order(&[1, 2, 3], Some(3)), 3);
    }

    #[test]
    fn beyond_end_clamps_to_append_slot() {
        assert_eq!(resolve_insert_order(&[1, 2, 3], Some(10)), 4);
        assert_eq!(resolve_insert_order(&[1, 2, 3], Some(4)), 4);
    }

    #[test]
    fn same_inputs_same_result() {
        for _ in 0..3 {
            assert_eq!(resolve_insert_order(&[1, 2, 3, 4], Some(2)), 2);
        }
    }
}
