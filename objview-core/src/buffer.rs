/// Append-only growable storage backing every geometry table
use std::ops::Deref;

use crate::error::BufferError;

/// Base capacity for vertex, normal, texcoord and face tables
pub const GEOMETRY_BASE_CAPACITY: usize = 128;
/// Base capacity for the material table
pub const MATERIAL_BASE_CAPACITY: usize = 8;

/// A write-once array whose capacity doubles on overflow.
///
/// The first append reserves `base` slots; every later overflow doubles the
/// capacity, so `n` appends cost O(log n) reallocations. There is no removal.
#[derive(Debug, Clone)]
pub struct DynamicBuffer<T> {
    items: Vec<T>,
    base: usize,
}

impl<T> DynamicBuffer<T> {
    pub fn new(base: usize) -> Self {
        Self {
            items: Vec::new(),
            base: base.max(1),
        }
    }

    /// Append an element and return its 0-based index
    pub fn append(&mut self, item: T) -> Result<usize, BufferError> {
        if self.items.len() == self.items.capacity() {
            let grow_by = if self.items.capacity() == 0 {
                self.base
            } else {
                self.items.capacity()
            };
            self.items
                .try_reserve_exact(grow_by)
                .map_err(|_| BufferError::Allocation { requested: grow_by })?;
        }
        let index = self.items.len();
        self.items.push(item);
        Ok(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Hand the storage over to its final owner
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Deref for DynamicBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for DynamicBuffer<T> {
    fn default() -> Self {
        Self::new(GEOMETRY_BASE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_sequential_indices() {
        let mut buffer = DynamicBuffer::new(4);
        assert_eq!(buffer.append('a').unwrap(), 0);
        assert_eq!(buffer.append('b').unwrap(), 1);
        assert_eq!(buffer.append('c').unwrap(), 2);
        assert_eq!(&buffer[..], &['a', 'b', 'c']);
    }

    #[test]
    fn test_capacity_doubles_from_base() {
        let mut buffer = DynamicBuffer::new(8);
        assert_eq!(buffer.capacity(), 0);

        buffer.append(0u32).unwrap();
        assert!(buffer.capacity() >= 8);

        for i in 1..9 {
            buffer.append(i).unwrap();
        }
        assert!(buffer.capacity() >= 16);
        assert_eq!(buffer.len(), 9);
    }

    #[test]
    fn test_empty_buffer_is_valid() {
        let buffer: DynamicBuffer<f32> = DynamicBuffer::default();
        assert!(buffer.is_empty());
        assert!(buffer.into_vec().is_empty());
    }
}
