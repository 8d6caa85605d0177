use std::hash::Hash;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Type alias for maps that remember the order in which keys were inserted. This is used
/// wherever the position of an entry carries meaning, like the order of states in a machine.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;
/// Type alias for sets that remember the order in which elements were inserted.
pub type OrderedSet<S> = indexmap::IndexSet<S, fxhash::FxBuildHasher>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition of the elements `0..n` into groups, stored as the group index of every
/// element. Group indices are canonical: they are handed out in the order in which the
/// groups are first encountered when going through the elements in ascending order. Two
/// partitions are therefore equal if and only if they group the elements in the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Partition {
    groups: Vec<usize>,
    size: usize,
}

impl Partition {
    /// Groups element `i` with element `j` if and only if the `i`-th and the `j`-th key
    /// produced by `keys` are equal.
    pub fn from_keys<K, I>(keys: I) -> Self
    where
        K: Hash + Eq,
        I: IntoIterator<Item = K>,
    {
        let mut known: Map<K, usize> = Map::default();
        let groups = keys
            .into_iter()
            .map(|key| {
                let next = known.len();
                *known.entry(key).or_insert(next)
            })
            .collect();
        Self {
            groups,
            size: known.len(),
        }
    }

    /// Returns the number of groups.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of elements that are partitioned.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the index of the group that contains `element`.
    pub fn group_of(&self, element: usize) -> Option<usize> {
        self.groups.get(element).copied()
    }

    /// Returns the elements of every group, groups and elements in ascending order.
    pub fn classes(&self) -> Vec<Vec<usize>> {
        let mut classes = vec![vec![]; self.size];
        for (element, &group) in self.groups.iter().enumerate() {
            classes[group].push(element);
        }
        classes
    }

    /// Returns the smallest element of every group, ordered by group index.
    pub fn representatives(&self) -> Vec<usize> {
        let mut representatives = Vec::with_capacity(self.size);
        for (element, &group) in self.groups.iter().enumerate() {
            if group == representatives.len() {
                representatives.push(element);
            }
        }
        representatives
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn partition_from_keys_is_canonical() {
        let left = Partition::from_keys(["x", "y", "x", "z"]);
        let right = Partition::from_keys([7, 3, 7, 1]);
        assert_eq!(left, right);
        assert_eq!(left.size(), 3);
        assert_eq!(left.len(), 4);
        assert_eq!(left.group_of(2), Some(0));
        assert_eq!(left.group_of(4), None);
        assert_eq!(left.classes(), vec![vec![0, 2], vec![1], vec![3]]);
        assert_eq!(left.representatives(), vec![0, 1, 3]);
        assert_ne!(left, Partition::from_keys([1, 2, 3, 4]));
    }
}
