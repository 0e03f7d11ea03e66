use crate::partitioning::BvhNodeId;
use crate::utils::hashmap::HashMap;
use core::hash::Hash;

/// An object→leaf lookup table, the bookkeeping part of a
/// [`BvhNodeAdaptor`](crate::partitioning::BvhNodeAdaptor).
#[derive(Clone, Debug)]
pub struct LeafMap<K> {
    leaves: HashMap<K, BvhNodeId>,
}

impl<K> Default for LeafMap<K> {
    fn default() -> Self {
        Self {
            leaves: HashMap::default(),
        }
    }
}

impl<K: Hash + Eq + Clone> LeafMap<K> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `key` to `leaf`, replacing any previous association.
    pub fn map(&mut self, key: &K, leaf: BvhNodeId) {
        let _ = self.leaves.insert(key.clone(), leaf);
    }

    /// Removes the association of `key`, returning the leaf it was associated to.
    pub fn unmap(&mut self, key: &K) -> Option<BvhNodeId> {
        self.leaves.remove(key)
    }

    /// The leaf associated to `key`.
    pub fn get(&self, key: &K) -> Option<BvhNodeId> {
        self.leaves.get(key).copied()
    }

    /// Is `key` associated to a leaf?
    pub fn contains(&self, key: &K) -> bool {
        self.leaves.contains_key(key)
    }

    /// The number of keys associated to a leaf.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Is this table empty?
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Iterates through all the `(key, leaf)` associations.
    pub fn iter(&self) -> impl Iterator<Item = (&K, BvhNodeId)> {
        self.leaves.iter().map(|(key, leaf)| (key, *leaf))
    }
}

#[cfg(test)]
mod test {
    use super::LeafMap;
    use crate::partitioning::BvhNodeId;

    #[test]
    fn remapping_replaces_the_leaf() {
        let mut map = LeafMap::new();
        map.map(&"a", BvhNodeId(1));
        map.map(&"a", BvhNodeId(4));
        map.map(&"b", BvhNodeId(2));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"a"), Some(BvhNodeId(4)));
        assert_eq!(map.unmap(&"a"), Some(BvhNodeId(4)));
        assert_eq!(map.unmap(&"a"), None);
        assert!(!map.contains(&"a"));
        assert!(map.contains(&"b"));
    }
}
