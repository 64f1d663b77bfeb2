// ==========================================
// 时段容量分配引擎测试
// ==========================================
// 职责: 验证时段列表过滤/排序与容量预订不变量
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod slot_allocator_test {
    use click_collect::engine::SlotAllocator;
    use click_collect::repository::RepositoryError;

    use crate::test_helpers::{at, base_day, create_test_state, seed_slot, seed_store};

    // ==========================================
    // 列表查询
    // ==========================================

    #[test]
    fn test_list_available_orders_ascending_and_filters_other_stores() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "list-store", 5);
        let other = seed_store(&state, "other-store", 5);

        let late = seed_slot(&state, &store, 14, 0, 5, true);
        let early = seed_slot(&state, &store, 10, 0, 5, true);
        let _other_slot = seed_slot(&state, &other, 9, 0, 5, true);

        let allocator = SlotAllocator::new(state.slot_repo.clone());
        let slots = allocator
            .list_available(&store.store_id, base_day(), at(8, 0))
            .unwrap();

        let ids: Vec<&str> = slots.iter().map(|s| s.slot_id.as_str()).collect();
        assert_eq!(ids, vec![early.slot_id.as_str(), late.slot_id.as_str()]);
    }

    #[test]
    fn test_list_available_excludes_elapsed_and_closed_slots() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "filter-store", 5);

        let _morning = seed_slot(&state, &store, 10, 0, 5, true);
        let _closed = seed_slot(&state, &store, 13, 0, 5, false);
        let afternoon = seed_slot(&state, &store, 14, 0, 5, true);

        let allocator = SlotAllocator::new(state.slot_repo.clone());
        // 中午查询：上午时段已过，下午时段保留，关闭时段不出现
        let slots = allocator
            .list_available(&store.store_id, base_day(), at(12, 0))
            .unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot_id, afternoon.slot_id);
    }

    #[test]
    fn test_list_available_includes_full_slots_with_counts() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "full-store", 1);
        let slot = seed_slot(&state, &store, 10, 0, 1, true);

        let allocator = SlotAllocator::new(state.slot_repo.clone());
        allocator.reserve(&slot.slot_id).unwrap();

        // 满员时段仍在列表中，调用方据计数展示"已约满"
        let slots = allocator
            .list_available(&store.store_id, base_day(), at(8, 0))
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].booked_count, 1);
        assert_eq!(slots[0].max_capacity, 1);
    }

    // ==========================================
    // 容量预订
    // ==========================================

    #[test]
    fn test_reserve_increments_booked_count() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "reserve-store", 5);
        let slot = seed_slot(&state, &store, 10, 0, 3, true);

        let allocator = SlotAllocator::new(state.slot_repo.clone());

        let updated = allocator.reserve(&slot.slot_id).unwrap();
        assert_eq!(updated.booked_count, 1);

        let updated = allocator.reserve(&slot.slot_id).unwrap();
        assert_eq!(updated.booked_count, 2);
    }

    #[test]
    fn test_reserve_never_exceeds_capacity() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "cap-store", 2);
        let slot = seed_slot(&state, &store, 10, 0, 2, true);

        let allocator = SlotAllocator::new(state.slot_repo.clone());
        allocator.reserve(&slot.slot_id).unwrap();
        allocator.reserve(&slot.slot_id).unwrap();

        // 第三次预订必须失败，且计数保持在上限
        let err = allocator.reserve(&slot.slot_id).unwrap_err();
        assert!(matches!(err, RepositoryError::SlotFull { .. }));

        let current = state.slot_repo.find_by_id(&slot.slot_id).unwrap().unwrap();
        assert_eq!(current.booked_count, 2);
    }

    #[test]
    fn test_reserve_closed_slot_fails() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "closed-store", 5);
        let slot = seed_slot(&state, &store, 10, 0, 5, false);

        let allocator = SlotAllocator::new(state.slot_repo.clone());
        let err = allocator.reserve(&slot.slot_id).unwrap_err();
        assert!(matches!(err, RepositoryError::SlotFull { .. }));

        let current = state.slot_repo.find_by_id(&slot.slot_id).unwrap().unwrap();
        assert_eq!(current.booked_count, 0);
    }

    #[test]
    fn test_reserve_unknown_slot_fails_not_found() {
        let (_temp_file, state) = create_test_state().unwrap();
        let _store = seed_store(&state, "nf-store", 5);

        let allocator = SlotAllocator::new(state.slot_repo.clone());
        let err = allocator.reserve("no-such-slot").unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
