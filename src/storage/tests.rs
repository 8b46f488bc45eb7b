//! Storage Module Tests
//!
//! Validates key placement and local storage mechanics.
//!
//! ## Test Scopes
//! - **Partitioner**: Ensures deterministic hashing, fair distribution and the replica formula.
//! - **LocalStore**: Verifies local operations (set/get/delete), snapshots and merges.
//!
//! *Note: Replication and forwarding are covered by the `node` tests.*

#[cfg(test)]
mod tests {
    use crate::cluster::types::NodeId;
    use crate::storage::memory::LocalStore;
    use crate::storage::partitioner::Partitioner;
    use std::collections::HashMap;
    use std::sync::Arc;

    // ============================================================
    // PARTITIONER TESTS
    // ============================================================

    #[test]
    fn test_owner_is_deterministic() {
        let partitioner = Partitioner::new(5);

        let o1 = partitioner.owner("user_100");
        let o2 = partitioner.owner("user_100");
        assert_eq!(o1, o2, "The same key should yield the same owner");
    }

    #[test]
    fn test_owner_identical_across_instances() {
        // Two nodes build their partitioners independently.
        let on_node_a = Partitioner::new(7);
        let on_node_b = Partitioner::new(7);

        for i in 0..500 {
            let key = format!("key-{}", i);
            assert_eq!(on_node_a.owner(&key), on_node_b.owner(&key));
        }
    }

    #[test]
    fn test_owner_is_within_range() {
        let partitioner = Partitioner::new(3);

        for i in 0..1000 {
            let key = format!("test_key_{}", i);
            let owner = partitioner.owner(&key);
            assert!(owner.0 < 3, "Owner {} should be < 3", owner);
        }
    }

    #[test]
    fn test_owner_distribution() {
        let partitioner = Partitioner::new(4);
        let mut counts = HashMap::new();

        for i in 0..10000 {
            let key = format!("user_{}", i);
            *counts.entry(partitioner.owner(&key)).or_insert(0) += 1;
        }

        // ~2500 per node; anything below 2000 would mean a badly skewed hash.
        assert_eq!(counts.len(), 4);
        for (node, count) in counts {
            assert!(count > 2000, "node {} only owns {} keys", node, count);
        }
    }

    #[test]
    fn test_replicas_are_successors() {
        let partitioner = Partitioner::new(5);

        assert_eq!(partitioner.replicas(NodeId(0)), (NodeId(1), NodeId(2)));
        assert_eq!(partitioner.replicas(NodeId(3)), (NodeId(4), NodeId(0)));
        assert_eq!(partitioner.replicas(NodeId(4)), (NodeId(0), NodeId(1)));
    }

    #[test]
    fn test_owner_never_its_own_replica() {
        for size in 3..10 {
            let partitioner = Partitioner::new(size);
            for id in 0..size {
                let owner = NodeId(id);
                let (first, second) = partitioner.replicas(owner);
                assert_ne!(owner, first);
                assert_ne!(owner, second);
                assert_ne!(first, second);
            }
        }
    }

    #[test]
    fn test_preference_list_starts_with_owner() {
        let partitioner = Partitioner::new(3);

        let list = partitioner.preference_list("a");
        let owner = partitioner.owner("a");
        let (first, second) = partitioner.replicas(owner);
        assert_eq!(list, [owner, first, second]);
    }

    // ============================================================
    // LOCAL STORE TESTS
    // ============================================================

    #[test]
    fn test_store_set_and_get() {
        let store = LocalStore::new();

        store.set("user-001".to_string(), "Rust Programming".to_string());

        assert_eq!(store.get("user-001"), Some("Rust Programming".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent_key() {
        let store = LocalStore::new();
        assert!(store.get("nonexistent").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite_value() {
        let store = LocalStore::new();

        store.set("user-001".to_string(), "First Title".to_string());
        store.set("user-001".to_string(), "Updated Title".to_string());

        assert_eq!(store.get("user-001").unwrap(), "Updated Title");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_delete() {
        let store = LocalStore::new();
        store.set("k".to_string(), "v".to_string());

        assert_eq!(store.delete("k"), Some("v".to_string()));
        assert!(store.get("k").is_none());

        // Deleting again is a no-op.
        assert_eq!(store.delete("k"), None);
    }

    #[test]
    fn test_store_snapshot_filters_by_partition() {
        let partitioner = Partitioner::new(3);
        let store = LocalStore::new();

        for i in 0..100 {
            store.set(format!("key-{:03}", i), format!("value-{}", i));
        }

        let snapshot = store.snapshot(|key| partitioner.owner(key) == NodeId(1));

        assert!(!snapshot.is_empty());
        assert!(snapshot.len() < 100);
        for (key, value) in &snapshot {
            assert_eq!(partitioner.owner(key), NodeId(1));
            assert_eq!(store.get(key).as_ref(), Some(value));
        }

        let expected = (0..100)
            .map(|i| format!("key-{:03}", i))
            .filter(|key| partitioner.owner(key) == NodeId(1))
            .count();
        assert_eq!(snapshot.len(), expected);
    }

    #[test]
    fn test_store_snapshot_is_a_copy() {
        let store = LocalStore::new();
        store.set("a".to_string(), "1".to_string());

        let snapshot = store.snapshot(|_| true);
        store.set("a".to_string(), "2".to_string());
        store.set("b".to_string(), "3".to_string());

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["a"], "1");
    }

    #[test]
    fn test_store_merge_overwrites_collisions() {
        let store = LocalStore::new();
        store.set("a".to_string(), "old".to_string());
        store.set("keep".to_string(), "same".to_string());

        let incoming = HashMap::from([
            ("a".to_string(), "new".to_string()),
            ("b".to_string(), "added".to_string()),
        ]);
        store.merge(incoming);

        assert_eq!(store.get("a").unwrap(), "new");
        assert_eq!(store.get("b").unwrap(), "added");
        assert_eq!(store.get("keep").unwrap(), "same");
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_store_concurrent_writers() {
        let store = Arc::new(LocalStore::new());
        let mut handles = Vec::new();

        for worker in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    store.set(format!("w{}-{}", worker, i), i.to_string());
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 800);
    }
}
