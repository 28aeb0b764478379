use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use finback_core::TenantId;

/// Tenant-isolated key/value store.
///
/// Implementations must never return a value written under another tenant.
pub trait TenantStore<K, V>: Send + Sync {
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V>;
    fn upsert(&self, tenant_id: TenantId, key: K, value: V);
    /// All values for a tenant, ordered by key.
    fn list(&self, tenant_id: TenantId) -> Vec<V>;
    fn clear_tenant(&self, tenant_id: TenantId);
}

impl<K, V, S> TenantStore<K, V> for Arc<S>
where
    S: TenantStore<K, V> + ?Sized,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        (**self).get(tenant_id, key)
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        (**self).upsert(tenant_id, key, value)
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        (**self).list(tenant_id)
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        (**self).clear_tenant(tenant_id)
    }
}

/// In-memory store partitioned per tenant, for tests/dev.
#[derive(Debug)]
pub struct InMemoryTenantStore<K, V> {
    partitions: RwLock<HashMap<TenantId, BTreeMap<K, V>>>,
}

impl<K, V> InMemoryTenantStore<K, V> {
    pub fn new() -> Self {
        Self {
            partitions: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryTenantStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TenantStore<K, V> for InMemoryTenantStore<K, V>
where
    K: Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        let partitions = self.partitions.read().ok()?;
        partitions.get(&tenant_id)?.get(key).cloned()
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        if let Ok(mut partitions) = self.partitions.write() {
            partitions.entry(tenant_id).or_default().insert(key, value);
        }
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        match self.partitions.read() {
            Ok(partitions) => partitions
                .get(&tenant_id)
                .map(|p| p.values().cloned().collect())
                .unwrap_or_default(),
            Err(_) => vec![],
        }
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        if let Ok(mut partitions) = self.partitions.write() {
            partitions.remove(&tenant_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenants_are_isolated() {
        let store: InMemoryTenantStore<u32, &'static str> = InMemoryTenantStore::new();
        let a = TenantId::new();
        let b = TenantId::new();

        store.upsert(a, 1, "a1");
        store.upsert(b, 1, "b1");

        assert_eq!(store.get(a, &1), Some("a1"));
        assert_eq!(store.get(b, &1), Some("b1"));

        store.clear_tenant(a);
        assert_eq!(store.get(a, &1), None);
        assert_eq!(store.list(b), vec!["b1"]);
    }

    #[test]
    fn list_is_ordered_by_key_and_upsert_replaces() {
        let store: InMemoryTenantStore<u32, u32> = InMemoryTenantStore::new();
        let t = TenantId::new();
        store.upsert(t, 3, 30);
        store.upsert(t, 1, 10);
        store.upsert(t, 3, 31);

        assert_eq!(store.list(t), vec![10, 31]);
    }
}
