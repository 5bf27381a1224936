use crate::arena::{Arena, Slot};
use crate::entry::Entry;
use crate::skiplist::level::LevelGenerator;
use crate::skiplist::Result;
use rand::Rng;
use rand::XorShiftRng;
use std::cmp::Ordering;
use std::mem;
use std::ops::{Index, IndexMut};

/// Target capacity used by the convenience constructors.
pub const DEFAULT_CAPACITY: usize = 65536;
/// Promotion probability used by the convenience constructors.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

struct Node<T, U> {
    entry: Entry<T, U>,
    // sized exactly to the drawn height; the node participates in levels
    // `0..tower.len()`
    tower: Vec<Option<Slot>>,
}

/// An ordered map implemented by a skiplist.
///
/// A skiplist is a probabilistic data structure that allows for binary search
/// tree operations by maintaining a linked hierarchy of subsequences. The
/// first subsequence is essentially a sorted linked list of all the elements
/// that it contains. Each successive subsequence contains approximately a
/// `probability` fraction of the elements of the previous subsequence. Using
/// the sparser subsequences, elements can be skipped and searching,
/// insertion, and deletion of entries can be done in approximately logarithm
/// time.
///
/// The ordering of keys is decided by a comparator supplied at construction.
/// The comparator must be a strict total order consistent with its own
/// equality: `cmp(a, b) == Ordering::Equal` exactly when `a` and `b` are the
/// same key for the purposes of the map. This is a precondition and is not
/// checked at runtime; the behavior of a map given an inconsistent comparator
/// is unspecified.
///
/// # Examples
/// ```
/// use skiplist_map::skiplist::SkipMap;
///
/// let mut map = SkipMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Some(2));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct SkipMap<T, U, C = fn(&T, &T) -> Ordering, R = XorShiftRng>
where C: Fn(&T, &T) -> Ordering
{
    arena: Arena<Node<T, U>>,
    // the sentinel: one entry point per level, length equals the maximum
    // height
    head: Vec<Option<Slot>>,
    height: usize,
    levels: LevelGenerator<R>,
    cmp: C,
}

impl<T, U> SkipMap<T, U>
where T: Ord
{
    /// Constructs a new, empty `SkipMap<T, U>` ordered by the natural
    /// ordering of its keys, with a target capacity of
    /// [`DEFAULT_CAPACITY`](constant.DEFAULT_CAPACITY.html) entries and a
    /// promotion probability of
    /// [`DEFAULT_PROBABILITY`](constant.DEFAULT_PROBABILITY.html).
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let map: SkipMap<u32, u32> = SkipMap::new();
    /// ```
    pub fn new() -> Self {
        let levels = LevelGenerator::from_valid(
            DEFAULT_CAPACITY,
            DEFAULT_PROBABILITY,
            XorShiftRng::new_unseeded(),
        );
        Self::from_parts(levels, T::cmp as fn(&T, &T) -> Ordering)
    }

    /// Constructs a new, empty `SkipMap<T, U>` ordered by the natural
    /// ordering of its keys. `capacity` is the expected maximum number of
    /// entries, and `probability` is the chance that a node present at one
    /// level is also present at the next; together they bound the height of
    /// the list.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero or if `probability` is not
    /// strictly between 0 and 1.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let map: SkipMap<u32, u32> = SkipMap::with_config(1024, 0.5).unwrap();
    ///
    /// assert!(SkipMap::<u32, u32>::with_config(0, 0.5).is_err());
    /// assert!(SkipMap::<u32, u32>::with_config(1024, 1.5).is_err());
    /// ```
    pub fn with_config(capacity: usize, probability: f64) -> Result<Self> {
        let levels = LevelGenerator::new(capacity, probability)?;
        Ok(Self::from_parts(levels, T::cmp as fn(&T, &T) -> Ordering))
    }
}

impl<T, U, C> SkipMap<T, U, C>
where C: Fn(&T, &T) -> Ordering
{
    /// Constructs a new, empty `SkipMap<T, U, C>` ordered by a
    /// caller-supplied comparator.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero or if `probability` is not
    /// strictly between 0 and 1.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::with_comparator(|a: &u32, b: &u32| b.cmp(a), 1024, 0.5).unwrap();
    /// map.insert(1, 'a');
    /// map.insert(2, 'b');
    /// assert_eq!(map.get(&2), Some(&'b'));
    /// ```
    pub fn with_comparator(cmp: C, capacity: usize, probability: f64) -> Result<Self> {
        let levels = LevelGenerator::new(capacity, probability)?;
        Ok(Self::from_parts(levels, cmp))
    }
}

impl<T, U, C, R> SkipMap<T, U, C, R>
where
    C: Fn(&T, &T) -> Ordering,
    R: Rng,
{
    /// Constructs a new, empty `SkipMap<T, U, C, R>` ordered by a
    /// caller-supplied comparator, drawing node heights from a
    /// caller-supplied random number generator. Supplying a deterministic
    /// generator makes the shape of the list reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero or if `probability` is not
    /// strictly between 0 and 1.
    pub fn with_rng(cmp: C, capacity: usize, probability: f64, rng: R) -> Result<Self> {
        let levels = LevelGenerator::with_rng(capacity, probability, rng)?;
        Ok(Self::from_parts(levels, cmp))
    }

    fn from_parts(levels: LevelGenerator<R>, cmp: C) -> Self {
        let max_height = levels.max_height();
        SkipMap {
            arena: Arena::new(),
            head: vec![None; max_height],
            height: 1,
            levels,
            cmp,
        }
    }

    fn successor(&self, pred: Option<Slot>, level: usize) -> Option<Slot> {
        match pred {
            None => self.head[level],
            Some(slot) => self.arena[slot].tower[level],
        }
    }

    fn set_successor(&mut self, pred: Option<Slot>, level: usize, next: Option<Slot>) {
        match pred {
            None => self.head[level] = next,
            Some(slot) => self.arena[slot].tower[level] = next,
        }
    }

    /// The shared traversal primitive. Walks from the head at the current
    /// top level down to level 0, at each level advancing while the successor
    /// key is strictly smaller than `key`. Returns the matching node, if any,
    /// and the rightmost node with a smaller key at every level, which is
    /// exactly the set of splice points insertion and deletion need. `None`
    /// in the predecessor array stands for the head sentinel.
    fn search(&self, key: &T) -> (Option<Slot>, Vec<Option<Slot>>) {
        let mut preds = vec![None; self.height];
        let mut pred = None;
        let mut next = None;

        for level in (0..self.height).rev() {
            next = self.successor(pred, level);
            while let Some(slot) = next {
                if (self.cmp)(&self.arena[slot].entry.key, key) == Ordering::Less {
                    pred = Some(slot);
                    next = self.successor(pred, level);
                } else {
                    break;
                }
            }
            preds[level] = pred;
        }

        let found =
            next.filter(|&slot| (self.cmp)(&self.arena[slot].entry.key, key) == Ordering::Equal);
        (found, preds)
    }

    /// Inserts a key-value pair into the map. If the key already exists in
    /// the map, the value is replaced in place and the old value is returned;
    /// the node keeps its original key and its position in every level.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some(1));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<U> {
        let (found, mut preds) = self.search(&key);
        if let Some(slot) = found {
            return Some(mem::replace(&mut self.arena[slot].entry.value, value));
        }

        let new_height = self.levels.gen_height();
        if new_height > self.height {
            // the levels above the old height were never walked, so the head
            // is their rightmost smaller node
            preds.resize(new_height, None);
            self.height = new_height;
        }

        let slot = self.arena.allocate(Node {
            entry: Entry { key, value },
            tower: vec![None; new_height],
        });
        for level in 0..new_height {
            let next = self.successor(preds[level], level);
            self.arena[slot].tower[level] = next;
            self.set_successor(preds[level], level, Some(slot));
        }
        None
    }

    /// Removes a key-value pair from the map. If the key exists in the map,
    /// the node is unlinked from every level it participates in and the
    /// associated value is returned. Otherwise `None` is returned and the
    /// map is unchanged.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some(1));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<U> {
        let (found, preds) = self.search(key);
        let slot = found?;

        // the first level whose predecessor does not point at the node is the
        // node's top level
        for level in 0..self.height {
            if self.successor(preds[level], level) != Some(slot) {
                break;
            }
            let next = self.arena[slot].tower[level];
            self.set_successor(preds[level], level, next);
        }
        while self.height > 1 && self.head[self.height - 1].is_none() {
            self.height -= 1;
        }

        let node = self.arena.free(slot);
        Some(node.entry.value)
    }

    /// Returns an immutable reference to the value associated with a
    /// particular key. It will return `None` if the key does not exist in the
    /// map.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get(&self, key: &T) -> Option<&U> {
        let (found, _) = self.search(key);
        found.map(move |slot| &self.arena[slot].entry.value)
    }

    /// Returns a mutable reference to the value associated with a particular
    /// key. Returns `None` if such a key does not exist.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &T) -> Option<&mut U> {
        let (found, _) = self.search(key);
        match found {
            Some(slot) => Some(&mut self.arena[slot].entry.value),
            None => None,
        }
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key(&self, key: &T) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let map: SkipMap<u32, u32> = SkipMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    /// ```
    /// use skiplist_map::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        for link in &mut self.head {
            *link = None;
        }
        self.height = 1;
    }
}

impl<T, U> Default for SkipMap<T, U>
where T: Ord
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, U, C, R> Index<&'a T> for SkipMap<T, U, C, R>
where
    C: Fn(&T, &T) -> Ordering,
    R: Rng,
{
    type Output = U;

    fn index(&self, key: &T) -> &Self::Output {
        self.get(key).expect("Key does not exist.")
    }
}

impl<'a, T, U, C, R> IndexMut<&'a T> for SkipMap<T, U, C, R>
where
    C: Fn(&T, &T) -> Ordering,
    R: Rng,
{
    fn index_mut(&mut self, key: &T) -> &mut Self::Output {
        self.get_mut(key).expect("Key does not exist.")
    }
}

#[cfg(test)]
mod tests {
    use super::SkipMap;
    use rand::Rng;
    use std::cmp::Ordering;
    use std::collections::BTreeMap;

    struct SequenceRng {
        draws: Vec<u32>,
        index: usize,
    }

    impl SequenceRng {
        fn new(draws: Vec<u32>) -> Self {
            SequenceRng { draws, index: 0 }
        }
    }

    impl Rng for SequenceRng {
        fn next_u32(&mut self) -> u32 {
            let draw = self.draws[self.index % self.draws.len()];
            self.index += 1;
            draw
        }
    }

    impl<T, U, C, R> SkipMap<T, U, C, R>
    where
        C: Fn(&T, &T) -> Ordering,
        R: Rng,
    {
        fn keys_at_level(&self, level: usize) -> Vec<&T> {
            let mut keys = Vec::new();
            let mut next = self.head[level];
            while let Some(slot) = next {
                keys.push(&self.arena[slot].entry.key);
                next = self.arena[slot].tower[level];
            }
            keys
        }

        fn assert_invariants(&self) {
            let max_height = self.levels.max_height();
            assert!(self.height >= 1 && self.height <= max_height);
            // head links above the current height are never populated
            for level in self.height..max_height {
                assert_eq!(self.head[level], None);
            }
            if self.height > 1 {
                assert!(self.head[self.height - 1].is_some());
            }
            for level in 0..self.height {
                let keys = self.keys_at_level(level);
                for window in keys.windows(2) {
                    assert_eq!((self.cmp)(window[0], window[1]), Ordering::Less);
                }
            }
            assert_eq!(self.keys_at_level(0).len(), self.len());
            let mut next = self.head[0];
            while let Some(slot) = next {
                let height = self.arena[slot].tower.len();
                assert!(height >= 1 && height <= self.height);
                next = self.arena[slot].tower[0];
            }
        }
    }

    #[test]
    fn test_len_empty() {
        let map: SkipMap<u32, u32> = SkipMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: SkipMap<u32, u32> = SkipMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert() {
        let mut map = SkipMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
        map.assert_invariants();
    }

    #[test]
    fn test_insert_replace() {
        let mut map = SkipMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert_eq!(map.insert(1, 3), Some(1));
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(map.len(), 1);
        map.assert_invariants();
    }

    #[test]
    fn test_remove() {
        let mut map = SkipMap::new();
        map.insert(1, 1);
        assert_eq!(map.remove(&1), Some(1));
        assert!(!map.contains_key(&1));
        map.assert_invariants();
    }

    #[test]
    fn test_remove_missing() {
        let mut map = SkipMap::new();
        map.insert(1, 1);
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.remove(&1), Some(1));
        assert_eq!(map.remove(&1), None);
        assert!(map.is_empty());
        map.assert_invariants();
    }

    #[test]
    fn test_remove_keeps_other_entries() {
        let mut map = SkipMap::new();
        for key in 0..100 {
            map.insert(key, key * 10);
        }
        assert_eq!(map.remove(&50), Some(500));
        assert_eq!(map.get(&50), None);
        assert_eq!(map.len(), 99);
        for key in (0..100).filter(|key| *key != 50) {
            assert_eq!(map.get(&key), Some(&(key * 10)));
        }
        map.assert_invariants();
    }

    #[test]
    fn test_get_mut() {
        let mut map = SkipMap::new();
        map.insert(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
    }

    #[test]
    fn test_index() {
        let mut map = SkipMap::new();
        map.insert(1, 1);
        map[&1] = 3;
        assert_eq!(map[&1], 3);
    }

    #[test]
    #[should_panic]
    fn test_index_missing_key() {
        let map: SkipMap<u32, u32> = SkipMap::new();
        let _ = map[&0];
    }

    #[test]
    fn test_clear() {
        let mut map = SkipMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        map.clear();
        assert_eq!(map.is_empty(), true);
        assert_eq!(map.get(&1), None);
        map.assert_invariants();

        map.insert(3, 3);
        assert_eq!(map.get(&3), Some(&3));
        assert_eq!(map.len(), 1);
        map.assert_invariants();
    }

    #[test]
    fn test_degenerate_list() {
        // capacity 1 forces a maximum height of one, so the map degenerates
        // to a sorted linked list
        let mut map = SkipMap::with_config(1, 0.5).unwrap();
        map.insert(3, "c");
        map.insert(1, "a");
        map.insert(2, "b");

        assert_eq!(map.get(&1), Some(&"a"));
        assert_eq!(map.get(&2), Some(&"b"));
        assert_eq!(map.get(&4), None);

        assert_eq!(map.remove(&2), Some("b"));
        assert_eq!(map.get(&2), None);
        assert_eq!(map.get(&1), Some(&"a"));
        assert_eq!(map.get(&3), Some(&"c"));
        map.assert_invariants();
    }

    #[test]
    fn test_custom_comparator() {
        let mut map =
            SkipMap::with_comparator(|a: &u32, b: &u32| b.cmp(a), 1024, 0.5).unwrap();
        map.insert(1, 'a');
        map.insert(3, 'c');
        map.insert(2, 'b');

        assert_eq!(map.keys_at_level(0), vec![&3, &2, &1]);
        assert_eq!(map.get(&2), Some(&'b'));
        assert_eq!(map.remove(&3), Some('c'));
        assert_eq!(map.keys_at_level(0), vec![&2, &1]);
        map.assert_invariants();
    }

    #[test]
    fn test_height_bound() {
        let mut map = SkipMap::with_config(4, 0.5).unwrap();
        assert_eq!(map.levels.max_height(), 2);
        for key in 0..1000u32 {
            map.insert(key, key);
        }
        assert!(map.height <= 2);
        map.assert_invariants();
        for key in 0..1000u32 {
            assert_eq!(map.get(&key), Some(&key));
        }
    }

    #[test]
    fn test_injected_rng_shapes_towers() {
        // draws of 0 promote to the maximum height, maximal draws stay at
        // height one
        let rng = SequenceRng::new(vec![u32::MAX, 0, u32::MAX]);
        let mut map = SkipMap::with_rng(|a: &u32, b: &u32| a.cmp(b), 4, 0.5, rng).unwrap();
        map.insert(1, 1);
        assert_eq!(map.height, 1);
        map.insert(2, 2);
        assert_eq!(map.height, 2);
        map.insert(3, 3);

        assert_eq!(map.keys_at_level(0), vec![&1, &2, &3]);
        assert_eq!(map.keys_at_level(1), vec![&2]);
        map.assert_invariants();

        // removing the only tall node lowers the list height again
        assert_eq!(map.remove(&2), Some(2));
        assert_eq!(map.height, 1);
        map.assert_invariants();
    }

    #[test]
    fn test_fuzz_against_btreemap() {
        let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
        let mut map = SkipMap::with_config(256, 0.5).unwrap();
        let mut expected = BTreeMap::new();

        for round in 0..10_000 {
            let key = rng.gen::<u32>() % 512;
            let val = rng.gen::<u32>();

            match rng.gen::<u32>() % 3 {
                0 => assert_eq!(map.insert(key, val), expected.insert(key, val)),
                1 => assert_eq!(map.remove(&key), expected.remove(&key)),
                _ => assert_eq!(map.get(&key), expected.get(&key)),
            }
            assert_eq!(map.len(), expected.len());

            if round % 1000 == 0 {
                map.assert_invariants();
            }
        }
        map.assert_invariants();
    }
}
