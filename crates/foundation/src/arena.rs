/// Index arena: values are addressed by the `usize` returned from `alloc`.
///
/// Used for node graphs (linked intersection lists) where links are plain
/// indices instead of shared pointers.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, v: T) -> usize {
        self.items.push(v);
        self.items.len() - 1
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> std::ops::Index<usize> for Arena<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.items[idx]
    }
}

impl<T> std::ops::IndexMut<usize> for Arena<T> {
    fn index_mut(&mut self, idx: usize) -> &mut T {
        &mut self.items[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::Arena;

    #[test]
    fn alloc_returns_sequential_indices() {
        let mut arena = Arena::new();
        assert_eq!(arena.alloc("a"), 0);
        assert_eq!(arena.alloc("b"), 1);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(1), Some(&"b"));
        assert_eq!(arena.get(2), None);
    }

    #[test]
    fn index_mut_updates_in_place() {
        let mut arena = Arena::with_capacity(1);
        let i = arena.alloc(1);
        arena[i] += 41;
        assert_eq!(arena[i], 42);
    }
}
