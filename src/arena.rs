//! Fast, but limited allocator.

use std::mem;
use std::ops::{Index, IndexMut};

/// A handle to an object allocated in an `Arena<T>`.
///
/// Slots are plain indices: they are `Copy`, they stay valid while the object
/// they point to is allocated, and several of them may refer to the same
/// object at once. This makes them suitable as links in structures where one
/// node is the target of many incoming references.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Slot(usize);

enum Block<T> {
    Occupied(T),
    Vacant(Option<Slot>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// All objects inside the arena will be destroyed when the arena is
/// destroyed. The arena supports deallocation of individual objects and
/// yields both mutable and immutable references to objects. The underlying
/// container is simply a `Vec` of blocks threaded with a free list, so the
/// code itself is very simple and uses no unsafe code. Freed blocks are
/// reused before the underlying `Vec` grows.
///
/// # Examples
///
/// ```
/// use skiplist_map::arena::Arena;
///
/// let mut arena = Arena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// ```
pub struct Arena<T> {
    blocks: Vec<Block<T>>,
    head: Option<Slot>,
    len: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// ```
    pub fn new() -> Self {
        Arena {
            blocks: Vec::new(),
            head: None,
            len: 0,
        }
    }

    /// Constructs a new, empty `Arena<T>` with space for `capacity` objects
    /// before the underlying `Vec` reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::with_capacity(1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            blocks: Vec::with_capacity(capacity),
            head: None,
            len: 0,
        }
    }

    /// Allocates an object in the arena and returns the `Slot` that refers to
    /// it. The slot can later be used to retrieve references to the object
    /// and to deallocate it.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// ```
    pub fn allocate(&mut self, value: T) -> Slot {
        self.len += 1;
        match self.head.take() {
            None => {
                self.blocks.push(Block::Occupied(value));
                Slot(self.blocks.len() - 1)
            }
            Some(slot) => {
                let vacant_block = mem::replace(&mut self.blocks[slot.0], Block::Occupied(value));
                match vacant_block {
                    Block::Vacant(next_slot) => {
                        self.head = next_slot;
                        slot
                    }
                    Block::Occupied(_) => panic!("Expected a vacant block."),
                }
            }
        }
    }

    /// Deallocates the object referred to by `slot` and returns it. The slot
    /// is pushed onto the free list and will be reused by a later allocation.
    ///
    /// # Panics
    ///
    /// Panics if `slot` refers to an invalid or vacant block.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, slot: Slot) -> T {
        if slot.0 >= self.blocks.len() {
            panic!("Error: attempting to free invalid block.");
        }
        let old_block = mem::replace(&mut self.blocks[slot.0], Block::Vacant(self.head));
        match old_block {
            Block::Occupied(value) => {
                self.head = Some(slot);
                self.len -= 1;
                value
            }
            Block::Vacant(next_slot) => {
                self.blocks[slot.0] = Block::Vacant(next_slot);
                panic!("Error: attempting to free vacant block.");
            }
        }
    }

    /// Returns an immutable reference to the object referred to by `slot`.
    /// Returns `None` if the slot does not refer to an allocated object.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn get(&self, slot: Slot) -> Option<&T> {
        match self.blocks.get(slot.0) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object referred to by `slot`.
    /// Returns `None` if the slot does not refer to an allocated object.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get_mut(x), Some(&mut 0));
    /// ```
    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut T> {
        match self.blocks.get_mut(slot.0) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of allocated objects in the arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// arena.allocate(1);
    /// assert_eq!(arena.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena contains no allocated objects.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// assert!(arena.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the arena, dropping all allocated objects and invalidating all
    /// previously returned slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// arena.allocate(1);
    /// arena.clear();
    /// assert!(arena.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Slot> for Arena<T> {
    type Output = T;

    fn index(&self, slot: Slot) -> &Self::Output {
        self.get(slot).expect("Error: slot out of bounds.")
    }
}

impl<T> IndexMut<Slot> for Arena<T> {
    fn index_mut(&mut self, slot: Slot) -> &mut Self::Output {
        self.get_mut(slot).expect("Error: slot out of bounds.")
    }
}
