//! Sorted-array min-priority queue with decrease-key.
//!
//! Node counts handled here are small (tens to low hundreds), so keeping a flat array sorted by
//! priority and paying an O(n) shift per update is cheaper in practice than a binary heap with a
//! value-to-slot side table, and decrease-key reduces to "find, rotate, overwrite".

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("cannot pop from an empty priority queue")]
    Empty,
    #[error("no element with priority {priority} and the given value is queued")]
    ElementNotFound { priority: i64 },
    #[error("new priority {new} is not lower than the current priority {old}")]
    PriorityNotLower { old: i64, new: i64 },
    #[error("priority queue is full (capacity {capacity})")]
    Full { capacity: usize },
}

/// Min-priority queue over `(priority, value)` pairs kept in ascending priority order.
///
/// Equal priorities keep insertion order.
#[derive(Debug, Clone)]
pub struct PriorityQueue<V> {
    entries: Vec<(i64, V)>,
    capacity: usize,
}

impl<V: Copy + PartialEq> PriorityQueue<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn add(&mut self, priority: i64, value: V) -> Result<(), QueueError> {
        if self.entries.len() >= self.capacity {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }
        let index = self.entries.partition_point(|(p, _)| *p <= priority);
        self.entries.insert(index, (priority, value));
        Ok(())
    }

    pub fn pop_minimal_value(&mut self) -> Result<V, QueueError> {
        if self.entries.is_empty() {
            return Err(QueueError::Empty);
        }
        Ok(self.entries.remove(0).1)
    }

    /// Moves `value` from `old_priority` to the strictly lower `new_priority`.
    pub fn lower_priority(
        &mut self,
        value: V,
        old_priority: i64,
        new_priority: i64,
    ) -> Result<(), QueueError> {
        if new_priority >= old_priority {
            return Err(QueueError::PriorityNotLower {
                old: old_priority,
                new: new_priority,
            });
        }

        let old_index = self
            .find(old_priority, value)
            .ok_or(QueueError::ElementNotFound {
                priority: old_priority,
            })?;

        // Everything before `old_index` has priority <= old_priority, so the new slot is in there.
        let new_index = self.entries[..old_index].partition_point(|(p, _)| *p <= new_priority);
        self.entries[new_index..=old_index].rotate_right(1);
        self.entries[new_index] = (new_priority, value);
        Ok(())
    }

    fn find(&self, priority: i64, value: V) -> Option<usize> {
        let start = self.entries.partition_point(|(p, _)| *p < priority);
        self.entries[start..]
            .iter()
            .take_while(|(p, _)| *p == priority)
            .position(|(_, v)| *v == value)
            .map(|offset| start + offset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn value_at(&self, index: usize) -> Option<V> {
        self.entries.get(index).map(|(_, v)| *v)
    }

    pub fn priority_at(&self, index: usize) -> Option<i64> {
        self.entries.get(index).map(|(p, _)| *p)
    }

    /// Pending `(priority, value)` pairs, lowest priority first.
    pub fn iter(&self) -> impl Iterator<Item = (i64, V)> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{PriorityQueue, QueueError};

    #[test]
    fn equal_priorities_pop_in_insertion_order() {
        let mut q = PriorityQueue::with_capacity(4);
        q.add(i64::MAX, 'x').unwrap();
        q.add(0, 's').unwrap();
        q.add(i64::MAX, 'y').unwrap();
        q.add(i64::MAX, 'z').unwrap();
        let order: String = std::iter::from_fn(|| q.pop_minimal_value().ok()).collect();
        assert_eq!(order, "sxyz");
    }

    #[test]
    fn lower_priority_finds_value_among_ties() {
        let mut q = PriorityQueue::with_capacity(4);
        for v in ['a', 'b', 'c', 'd'] {
            q.add(7, v).unwrap();
        }
        q.lower_priority('c', 7, 3).unwrap();
        assert_eq!(q.value_at(0), Some('c'));
        assert_eq!(q.priority_at(0), Some(3));
        let rest: String = q.iter().skip(1).map(|(_, v)| v).collect();
        assert_eq!(rest, "abd");
    }

    #[test]
    fn lower_priority_to_an_existing_priority_goes_after_it() {
        let mut q = PriorityQueue::with_capacity(3);
        q.add(1, 'a').unwrap();
        q.add(5, 'b').unwrap();
        q.add(9, 'c').unwrap();
        q.lower_priority('c', 9, 5).unwrap();
        let order: String = q.iter().map(|(_, v)| v).collect();
        assert_eq!(order, "abc");
    }

    #[test]
    fn add_beyond_capacity_fails() {
        let mut q = PriorityQueue::with_capacity(1);
        q.add(1, 1u32).unwrap();
        assert_eq!(q.add(2, 2u32), Err(QueueError::Full { capacity: 1 }));
        assert_eq!(q.len(), 1);
        assert_eq!(q.capacity(), 1);
    }
}
