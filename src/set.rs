//! Entity-set abstraction built on top of roaring bitmaps.

use std::fmt;

use roaring::RoaringBitmap;

/// Unique identifier for an entity owned by the dataset.
pub type EntityId = u32;

/// Borrowed iterator that yields [`EntityId`] values in ascending order.
pub type EntityIdIter<'a> = Box<dyn Iterator<Item = EntityId> + Send + 'a>;

/// Set of entity identifiers supporting the algebra the evaluator needs.
#[derive(Clone, Default, PartialEq)]
pub struct EntitySet {
    bitmap: RoaringBitmap,
}

impl EntitySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entity identifier into the set.
    pub fn insert(&mut self, entity: EntityId) {
        self.bitmap.insert(entity);
    }

    /// Returns true when the set contains the provided identifier.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.bitmap.contains(entity)
    }

    /// Returns the number of entities tracked by the set.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.bitmap.len()).unwrap_or(usize::MAX)
    }

    /// Returns true when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bitmap.is_empty()
    }

    /// Returns an iterator over entity identifiers.
    pub fn iter(&self) -> EntityIdIter<'_> {
        Box::new(self.bitmap.iter())
    }

    /// Returns the identifiers as an ascending vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<EntityId> {
        self.bitmap.iter().collect()
    }

    /// Returns the intersection between this set and `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let bitmap = &self.bitmap & &other.bitmap;
        Self { bitmap }
    }

    /// Returns the union between this set and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let bitmap = &self.bitmap | &other.bitmap;
        Self { bitmap }
    }

    /// Returns the relative complement (`self \ other`).
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let bitmap = &self.bitmap - &other.bitmap;
        Self { bitmap }
    }

    /// Returns the entities present in exactly one of the two sets.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        let bitmap = &self.bitmap ^ &other.bitmap;
        Self { bitmap }
    }

    /// Returns `universe \ self`.
    #[must_use]
    pub fn complement(&self, universe: &Self) -> Self {
        universe.difference(self)
    }

    /// Returns true when every entity of `self` is also in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.bitmap.is_subset(&other.bitmap)
    }
}

impl FromIterator<EntityId> for EntitySet {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self {
            bitmap: iter.into_iter().collect(),
        }
    }
}

impl Extend<EntityId> for EntitySet {
    fn extend<I: IntoIterator<Item = EntityId>>(&mut self, iter: I) {
        self.bitmap.extend(iter);
    }
}

impl fmt::Debug for EntitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bitmap.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_algebra() {
        let a: EntitySet = [1, 2, 3].into_iter().collect();
        let b: EntitySet = [3, 4].into_iter().collect();

        assert_eq!(a.intersect(&b).to_vec(), vec![3]);
        assert_eq!(a.union(&b).to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(a.difference(&b).to_vec(), vec![1, 2]);
        assert_eq!(a.symmetric_difference(&b).to_vec(), vec![1, 2, 4]);
    }

    #[test]
    fn complement_is_relative_to_universe() {
        let universe: EntitySet = (0..6).collect();
        let set: EntitySet = [0, 5, 9].into_iter().collect();

        assert_eq!(set.complement(&universe).to_vec(), vec![1, 2, 3, 4]);
        assert!(EntitySet::new().complement(&universe) == universe);
    }

    #[test]
    fn len_and_subset() {
        let mut set = EntitySet::new();
        assert!(set.is_empty());
        set.insert(7);
        set.insert(7);
        assert_eq!(set.len(), 1);
        assert!(set.contains(7));
        assert!(set.is_subset(&[7, 8].into_iter().collect()));
        assert_eq!(format!("{set:?}"), "{7}");
    }
}
