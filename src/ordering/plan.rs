/// A live item under the parent, as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sibling {
    pub(crate) id: String,
    pub(crate) order: i32,
}

/// One planned order mutation for an existing sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderShift {
    pub(crate) item_id: String,
    pub(crate) new_order: i32,
}

pub(crate) type ShiftPlan = Vec<OrderShift>;

/// Open a slot at `desired_order`: everything at or after it moves up one.
pub(crate) fn plan_insert(siblings: &[Sibling], desired_order: i32) -> ShiftPlan {
    siblings
        .iter()
        .filter(|sibling| sibling.order >= desired_order)
        .map(|sibling| OrderShift { item_id: sibling.id.clone(), new_order: sibling.order + 1 })
        .collect()
}

/// Close the gap left at `deleted_order`: everything after it moves down one.
/// The deleted item itself must not be in `siblings`.
pub(crate) fn plan_delete(siblings: &[Sibling], deleted_order: i32) -> ShiftPlan {
    siblings
        .iter()
        .filter(|sibling| sibling.order > deleted_order)
        .map(|sibling| OrderShift { item_id: sibling.id.clone(), new_order: sibling.order - 1 })
        .collect()
}

/// Plan a reposition of one item among `others` (the moving item excluded).
///
/// Returns the resolved order for the moving item plus the shifts required.
/// Requests past the end clamp to the highest occupied position; absent or
/// non-positive requests keep the item where it is. Unlike insert/delete,
/// which shift a whole range, a move swaps with the occupant of the target
/// position and leaves everything else alone.
pub(crate) fn plan_move(
    others: &[Sibling],
    old_order: i32,
    requested_order: Option<i32>,
) -> (i32, ShiftPlan) {
    let max_allowed = others.iter().map(|sibling| sibling.order).max().unwrap_or(1);

    let resolved = match requested_order {
        Some(value) if value >= 1 => value.min(max_allowed),
        _ => old_order,
    };

    if resolved == old_order {
        return (old_order, Vec::new());
    }

    let plan = others
        .iter()
        .find(|sibling| sibling.order == resolved)
        .map(|occupant| vec![OrderShift { item_id: occupant.id.clone(), new_order: old_order }])
        .unwrap_or_default();

    (resolved, plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn siblings(pairs: &[(&str, i32)]) -> Vec<Sibling> {
        pairs.iter().map(|(id, order)| Sibling { id: (*id).to_string(), order: *order }).collect()
    }

    fn shift(id: &str, new_order: i32) -> OrderShift {
        OrderShift { item_id: id.to_string(), new_order }
    }

    #[test]
    fn insert_at_start_shifts_everything() {
        let plan = plan_insert(&siblings(&[("a", 1), ("b", 2), ("c", 3)]), 1);
        assert_eq!(plan, vec![shift("a", 2), shift("b", 3), shift("c", 4)]);
    }

    #[test]
    fn insert_in_middle_shifts_tail_only() {
        let plan = plan_insert(&siblings(&[("a", 1), ("b", 2), ("c", 3)]), 2);
        assert_eq!(plan, vec![shift("b", 3), shift("c", 4)]);
    }

    #[test]
    fn insert_at_append_slot_shifts_nothing() {
        let plan = plan_insert(&siblings(&[("a", 1), ("b", 2), ("c", 3)]), 4);
        assert!(plan.is_empty());
    }

    #[test]
    fn insert_into_empty_set_shifts_nothing() {
        assert!(plan_insert(&[], 1).is_empty());
    }

    #[test]
    fn delete_middle_compacts_tail() {
        // Item previously at 2 is already gone from the sibling set.
        let plan = plan_delete(&siblings(&[("a", 1), ("c", 3), ("d", 4)]), 2);
        assert_eq!(plan, vec![shift("c", 2), shift("d", 3)]);
    }

    #[test]
    fn delete_last_needs_no_shifts() {
        let plan = plan_delete(&siblings(&[("a", 1), ("b", 2)]), 3);
        assert!(plan.is_empty());
    }

    #[test]
    fn delete_sole_item_needs_no_shifts() {
        assert!(plan_delete(&[], 1).is_empty());
    }

    #[test]
    fn move_swaps_with_occupant() {
        // Mover at 1, others at 2 and 3, request 3: occupant of 3 takes 1.
        let (resolved, plan) = plan_move(&siblings(&[("b", 2), ("c", 3)]), 1, Some(3));
        assert_eq!(resolved, 3);
        assert_eq!(plan, vec![shift("c", 1)]);
    }

    #[test]
    fn move_leaves_bystanders_alone() {
        let (_, plan) = plan_move(&siblings(&[("b", 2), ("c", 3)]), 1, Some(3));
        assert!(!plan.iter().any(|entry| entry.item_id == "b"));
    }

    #[test]
    fn move_to_own_position_is_noop() {
        let (resolved, plan) = plan_move(&siblings(&[("b", 2), ("c", 3)]), 1, Some(1));
        assert_eq!(resolved, 1);
        assert!(plan.is_empty());
    }

    #[test]
    fn move_without_request_is_noop() {
        let (resolved, plan) = plan_move(&siblings(&[("b", 2)]), 1, None);
        assert_eq!(resolved, 1);
        assert!(plan.is_empty());
    }

    #[test]
    fn move_with_non_positive_request_is_noop() {
        let (resolved, plan) = plan_move(&siblings(&[("b", 2)]), 1, Some(0));
        assert_eq!(resolved, 1);
        assert!(plan.is_empty());
    }

    #[test]
    fn move_clamps_to_highest_occupied_position() {
        let (resolved, plan) = plan_move(&siblings(&[("a", 1), ("b", 2)]), 3, Some(9));
        assert_eq!(resolved, 2);
        assert_eq!(plan, vec![shift("b", 3)]);
    }

    #[test]
    fn move_with_no_other_siblings_stays_put() {
        let (resolved, plan) = plan_move(&[], 1, Some(5));
        assert_eq!(resolved, 1);
        assert!(plan.is_empty());
    }
}
