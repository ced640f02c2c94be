//! Union-find structures backing node resolution.
//!
//! Two flavors are needed: a plain index-keyed structure for wires (which
//! already have dense indices) and a keyed wrapper that interns arbitrary
//! hashable keys, used for component terminals.

use std::collections::HashMap;
use std::hash::Hash;

/// Disjoint-set over dense `usize` indices with path compression.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    /// Create a structure with `len` singleton sets.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    /// Add a fresh singleton and return its index.
    pub fn push(&mut self) -> usize {
        let index = self.parent.len();
        self.parent.push(index);
        index
    }

    /// Find the set representative, compressing the path on the way.
    pub fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cursor = index;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`. Returns false when they were
    /// already one set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        self.parent[root_b] = root_a;
        true
    }
}

/// Disjoint-set over arbitrary hashable keys.
///
/// Keys are interned on first use; insertion order is recorded so callers
/// can walk the key set deterministically.
#[derive(Debug, Clone)]
pub struct KeyedUnionFind<K> {
    indices: HashMap<K, usize>,
    keys: Vec<K>,
    inner: UnionFind,
}

impl<K: Eq + Hash + Clone> KeyedUnionFind<K> {
    /// Create an empty structure.
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
            keys: Vec::new(),
            inner: UnionFind::new(0),
        }
    }

    /// Intern a key (if new) and return its dense index.
    pub fn insert(&mut self, key: K) -> usize {
        if let Some(&index) = self.indices.get(&key) {
            return index;
        }
        let index = self.inner.push();
        self.indices.insert(key.clone(), index);
        self.keys.push(key);
        index
    }

    /// Representative index of the set containing `key`, interning it first
    /// if needed.
    pub fn find(&mut self, key: K) -> usize {
        let index = self.insert(key);
        self.inner.find(index)
    }

    /// Merge the sets containing the two keys.
    pub fn union(&mut self, a: K, b: K) -> bool {
        let index_a = self.insert(a);
        let index_b = self.insert(b);
        self.inner.union(index_a, index_b)
    }

    /// Keys in the order they were first interned.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedUnionFind<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_find_basic_merging() {
        let mut uf = UnionFind::new(4);
        assert!(uf.union(0, 1));
        assert!(uf.union(2, 3));
        assert_ne!(uf.find(0), uf.find(2));
        assert!(uf.union(1, 3));
        assert_eq!(uf.find(0), uf.find(2));
        // Merging twice is a no-op.
        assert!(!uf.union(0, 3));
    }

    #[test]
    fn test_union_find_path_compression() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(1, 2);
        uf.union(2, 3);
        uf.union(3, 4);
        let root = uf.find(4);
        for i in 0..5 {
            assert_eq!(uf.find(i), root);
        }
    }

    #[test]
    fn test_keyed_union_find_interns_in_order() {
        let mut uf = KeyedUnionFind::new();
        uf.union("c2:left", "c3:right");
        uf.find("c1:left");
        assert_eq!(uf.keys(), &["c2:left", "c3:right", "c1:left"]);
        assert_eq!(uf.find("c2:left"), uf.find("c3:right"));
        assert_ne!(uf.find("c1:left"), uf.find("c2:left"));
    }

    #[test]
    fn test_keyed_union_find_is_order_independent() {
        let mut left = KeyedUnionFind::new();
        left.union(1, 2);
        left.union(2, 3);

        let mut right = KeyedUnionFind::new();
        right.union(2, 3);
        right.union(1, 2);

        assert_eq!(left.find(1), left.find(3));
        assert_eq!(right.find(1), right.find(3));
    }
}
