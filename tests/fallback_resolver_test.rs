// ==========================================
// 时段回退解析引擎测试
// ==========================================
// 职责: 验证过期时段引用的确定性回退与门店自动选择
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod fallback_resolver_test {
    use click_collect::engine::FallbackResolver;
    use click_collect::repository::RepositoryError;

    use crate::test_helpers::{at, create_test_state, seed_slot, seed_store};

    // ==========================================
    // 时段解析
    // ==========================================

    #[test]
    fn test_valid_requested_slot_returned_unchanged() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "fb-valid", 5);
        let _earlier = seed_slot(&state, &store, 9, 0, 5, true);
        let requested = seed_slot(&state, &store, 14, 0, 5, true);

        let resolver = FallbackResolver::new(state.slot_repo.clone(), state.store_repo.clone());
        let resolved = resolver
            .resolve(&requested.slot_id, &store.store_id, at(8, 0))
            .unwrap();

        // 有效的请求时段原样返回，不被"更早"的时段替换
        assert_eq!(resolved.slot_id, requested.slot_id);
    }

    #[test]
    fn test_unknown_slot_falls_back_to_earliest_open_slot() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "fb-unknown", 5);
        let _late = seed_slot(&state, &store, 16, 0, 5, true);
        let earliest = seed_slot(&state, &store, 9, 30, 5, true);
        let _closed_earlier = seed_slot(&state, &store, 9, 0, 5, false);

        let resolver = FallbackResolver::new(state.slot_repo.clone(), state.store_repo.clone());
        let resolved = resolver
            .resolve("slot-deleted-from-browser-cache", &store.store_id, at(8, 0))
            .unwrap();

        assert_eq!(resolved.slot_id, earliest.slot_id);
    }

    #[test]
    fn test_elapsed_requested_slot_falls_back() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "fb-elapsed", 5);
        let morning = seed_slot(&state, &store, 9, 0, 5, true);
        let afternoon = seed_slot(&state, &store, 15, 0, 5, true);

        let resolver = FallbackResolver::new(state.slot_repo.clone(), state.store_repo.clone());
        // 中午提交：上午时段已开始，回退到下午
        let resolved = resolver
            .resolve(&morning.slot_id, &store.store_id, at(12, 0))
            .unwrap();

        assert_eq!(resolved.slot_id, afternoon.slot_id);
    }

    #[test]
    fn test_other_store_slot_falls_back() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "fb-mine", 5);
        let other = seed_store(&state, "fb-theirs", 5);
        let foreign = seed_slot(&state, &other, 9, 0, 5, true);
        let own = seed_slot(&state, &store, 11, 0, 5, true);

        let resolver = FallbackResolver::new(state.slot_repo.clone(), state.store_repo.clone());
        let resolved = resolver
            .resolve(&foreign.slot_id, &store.store_id, at(8, 0))
            .unwrap();

        assert_eq!(resolved.slot_id, own.slot_id);
    }

    #[test]
    fn test_full_requested_slot_is_not_redirected() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "fb-full", 1);
        let full = seed_slot(&state, &store, 10, 0, 1, true);
        let _open = seed_slot(&state, &store, 11, 0, 1, true);

        state.slot_repo.reserve(&full.slot_id).unwrap();

        // 容量不在解析时裁决：满员时段原样返回，由预订事务给出 SlotFull
        let resolver = FallbackResolver::new(state.slot_repo.clone(), state.store_repo.clone());
        let resolved = resolver
            .resolve(&full.slot_id, &store.store_id, at(8, 0))
            .unwrap();

        assert_eq!(resolved.slot_id, full.slot_id);
    }

    #[test]
    fn test_no_open_slots_fails() {
        let (_temp_file, state) = create_test_state().unwrap();
        let store = seed_store(&state, "fb-empty", 5);
        let _closed = seed_slot(&state, &store, 10, 0, 5, false);

        let resolver = FallbackResolver::new(state.slot_repo.clone(), state.store_repo.clone());
        let err = resolver
            .resolve("whatever", &store.store_id, at(8, 0))
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NoSlotsAvailable { .. }));
    }

    // ==========================================
    // 门店解析
    // ==========================================

    #[test]
    fn test_resolve_store_auto_selects_first_store() {
        let (_temp_file, state) = create_test_state().unwrap();
        let first = seed_store(&state, "store-first", 5);
        let _second = seed_store(&state, "store-second", 5);

        let resolver = FallbackResolver::new(state.slot_repo.clone(), state.store_repo.clone());

        for store_id in [None, Some(""), Some("auto")] {
            let resolved = resolver.resolve_store(store_id).unwrap();
            assert_eq!(resolved.store_id, first.store_id);
        }
    }

    #[test]
    fn test_resolve_store_explicit_id() {
        let (_temp_file, state) = create_test_state().unwrap();
        let _first = seed_store(&state, "store-a", 5);
        let second = seed_store(&state, "store-b", 5);

        let resolver = FallbackResolver::new(state.slot_repo.clone(), state.store_repo.clone());
        let resolved = resolver.resolve_store(Some(&second.store_id)).unwrap();
        assert_eq!(resolved.store_id, second.store_id);

        let err = resolver.resolve_store(Some("no-such-store")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_resolve_store_fails_when_system_has_no_store() {
        let (_temp_file, state) = create_test_state().unwrap();

        let resolver = FallbackResolver::new(state.slot_repo.clone(), state.store_repo.clone());
        let err = resolver.resolve_store(None).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
