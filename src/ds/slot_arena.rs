//! Generation-checked slot arena.
//!
//! Values live in a `Vec` of slots and are addressed by [`SlotId`], a pair of
//! slot index and generation. Freed slots go on a free list and are reused by
//! later inserts; every reuse bumps the slot's generation, so an id handed out
//! for the previous occupant no longer resolves.
//!
//! ```text
//!   slots: [ (gen 0, Some(A)) | (gen 1, None) | (gen 0, Some(C)) ]
//!   free_list: [1]
//!
//!   SlotId { index: 1, generation: 0 }  -> stale, resolves to None
//!   insert(D) reuses slot 1 at generation 1
//! ```
//!
//! All operations are O(1) except [`SlotArena::clear`], which is O(slots).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: usize,
    generation: u32,
}

impl SlotId {
    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            SlotId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            SlotId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        };
        self.len += 1;
        id
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        self.free_list.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value but keeps the slots, bumping the generation of each
    /// occupied one. Ids issued before the clear never resolve again.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free_list.clear();
        self.free_list.extend((0..self.slots.len()).rev());
        self.len = 0;
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_arena_insert_remove_reuse() {
        let mut arena = SlotArena::new();
        let id1 = arena.insert("a");
        let id2 = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id1), Some(&"a"));
        assert_eq!(arena.get(id2), Some(&"b"));

        assert_eq!(arena.remove(id1), Some("a"));
        assert_eq!(arena.len(), 1);

        let id3 = arena.insert("c");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id3), Some(&"c"));
        assert_eq!(id1.index(), id3.index());
        assert_ne!(id1.generation(), id3.generation());
    }

    #[test]
    fn stale_id_does_not_resolve_after_reuse() {
        let mut arena = SlotArena::new();
        let stale = arena.insert(1);
        arena.remove(stale);
        let fresh = arena.insert(2);

        assert_eq!(arena.get(stale), None);
        assert_eq!(arena.get_mut(stale), None);
        assert!(!arena.contains(stale));
        assert_eq!(arena.remove(stale), None);

        assert_eq!(arena.get(fresh), Some(&2));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn double_remove_is_rejected() {
        let mut arena = SlotArena::new();
        let id = arena.insert(7);
        assert_eq!(arena.remove(id), Some(7));
        assert_eq!(arena.remove(id), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn clear_resets_len_and_reuses_slots() {
        let mut arena = SlotArena::with_capacity(4);
        arena.insert(1);
        arena.insert(2);
        arena.clear();
        assert!(arena.is_empty());

        let id = arena.insert(3);
        assert_eq!(id.index(), 0);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn ids_from_before_clear_stay_stale() {
        let mut arena = SlotArena::new();
        let before_a = arena.insert('a');
        let before_b = arena.insert('b');
        arena.remove(before_b);
        arena.clear();

        let after_a = arena.insert('x');
        let after_b = arena.insert('y');
        assert_eq!(after_a.index(), before_a.index());
        assert_eq!(after_b.index(), before_b.index());

        assert_eq!(arena.get(before_a), None);
        assert_eq!(arena.get(before_b), None);
        assert_eq!(arena.remove(before_a), None);
        assert_eq!(arena.get(after_a), Some(&'x'));
        assert_eq!(arena.get(after_b), Some(&'y'));
    }
}
