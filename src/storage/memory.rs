use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory key/value table of a single node.
///
/// One reader/writer lock guards the whole table, so every operation is atomic
/// with respect to the others and `snapshot` sees a single point in time.
#[derive(Debug, Default)]
pub struct LocalStore {
    data: RwLock<HashMap<String, String>>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    pub fn set(&self, key: String, value: String) {
        self.data.write().insert(key, value);
    }

    /// Removes `key`, returning the previous value. Absent keys are a no-op.
    pub fn delete(&self, key: &str) -> Option<String> {
        self.data.write().remove(key)
    }

    /// Copies out every entry whose key satisfies `predicate`.
    pub fn snapshot<F>(&self, predicate: F) -> HashMap<String, String>
    where
        F: Fn(&str) -> bool,
    {
        self.data
            .read()
            .iter()
            .filter(|(key, _)| predicate(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Bulk insert; incoming entries overwrite existing ones.
    pub fn merge(&self, entries: HashMap<String, String>) {
        let mut data = self.data.write();
        data.extend(entries);
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}
