/// Round-robin list whose cursor always points at an element (or is 0 when
/// the list is empty).
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> Default for Rotation<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
        }
    }
}

impl<T> From<Vec<T>> for Rotation<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }
}

impl<T> Rotation<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.items.get_mut(self.index)
    }

    /// Move the cursor to the next element, wrapping at the end.
    pub fn advance(&mut self) {
        if !self.items.is_empty() {
            self.index = (self.index + 1) % self.items.len();
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the element at `position`, keeping the cursor on the same
    /// element where possible.
    ///
    /// Removing before the cursor shifts it back by one; removing the last
    /// element while the cursor sits on it wraps the cursor to 0.
    pub fn remove(&mut self, position: usize) -> Option<T> {
        if position >= self.items.len() {
            return None;
        }

        let removed = self.items.remove(position);
        if position < self.index {
            self.index -= 1;
        }
        if self.index >= self.items.len() {
            self.index = 0;
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index = 0;
    }
}
