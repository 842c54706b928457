use crate::error::HeapError;
use crate::grid::Point;

// the backing arrays are 1-based, slot 0 is never read
const ROOT_INDEX: usize = 1;

/// A binary min-heap of grid positions ordered by priority, with a capacity fixed at
/// construction. Rows, columns and priorities live in three parallel arrays.
///
/// There is no decrease-key: a caller that finds a better priority for a position pushes it
/// again and skips the stale copy when it is popped later.
#[derive(Clone, Debug)]
pub struct MinQueue {
    capacity: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    priorities: Vec<usize>,
    len: usize,
}

impl MinQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rows: vec![0; capacity + ROOT_INDEX],
            cols: vec![0; capacity + ROOT_INDEX],
            priorities: vec![0; capacity + ROOT_INDEX],
            len: 0,
        }
    }

    /// Creates a heap pre-seeded with `entries`, heapified in linear time.
    pub fn with_entries(capacity: usize, entries: &[(Point, usize)]) -> Result<Self, HeapError> {
        if capacity < entries.len() {
            return Err(HeapError::CapacityError {
                capacity,
                provided: entries.len(),
            });
        }

        let mut heap = Self::new(capacity);
        for (i, (point, priority)) in entries.iter().enumerate() {
            heap.write(i + ROOT_INDEX, point.row, point.col, *priority);
        }
        heap.len = entries.len();
        for index in (ROOT_INDEX..=(heap.len >> 1)).rev() {
            heap.bubble_down(index);
        }

        Ok(heap)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, point: Point, priority: usize) -> Result<(), HeapError> {
        if self.len == self.capacity {
            return Err(HeapError::HeapFull(self.capacity));
        }

        self.len += 1;
        let index = self.len - 1 + ROOT_INDEX;
        self.write(index, point.row, point.col, priority);
        self.bubble_up(index);

        Ok(())
    }

    /// Removes and returns the position with the smallest priority
    pub fn pop(&mut self) -> Option<Point> {
        self.pop_entry().map(|(point, _)| point)
    }

    pub fn pop_entry(&mut self) -> Option<(Point, usize)> {
        if self.len == 0 {
            return None;
        }

        let top = (self.point_at(ROOT_INDEX), self.priorities[ROOT_INDEX]);

        let last = self.len - 1 + ROOT_INDEX;
        self.len -= 1;
        if self.len > 0 {
            self.write(
                ROOT_INDEX,
                self.rows[last],
                self.cols[last],
                self.priorities[last],
            );
            self.bubble_down(ROOT_INDEX);
        }

        Some(top)
    }

    pub fn peek(&self) -> Option<Point> {
        (!self.is_empty()).then(|| self.point_at(ROOT_INDEX))
    }

    pub fn peek_priority(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.priorities[ROOT_INDEX])
    }

    /// Priorities in backing-array order, for debugging
    pub fn priorities(&self) -> &[usize] {
        &self.priorities[ROOT_INDEX..self.len + ROOT_INDEX]
    }

    fn point_at(&self, index: usize) -> Point {
        Point {
            row: self.rows[index],
            col: self.cols[index],
        }
    }

    fn write(&mut self, index: usize, row: usize, col: usize, priority: usize) {
        self.rows[index] = row;
        self.cols[index] = col;
        self.priorities[index] = priority;
    }

    /// Moves the entry at `index` towards the root until its parent is not larger
    fn bubble_up(&mut self, mut index: usize) {
        let (row, col, priority) = (self.rows[index], self.cols[index], self.priorities[index]);

        while index > ROOT_INDEX {
            let parent = index >> 1;
            if self.priorities[parent] <= priority {
                break;
            }
            self.write(
                index,
                self.rows[parent],
                self.cols[parent],
                self.priorities[parent],
            );
            index = parent;
        }

        self.write(index, row, col, priority);
    }

    /// Moves the entry at `index` towards the leaves until no child is smaller
    fn bubble_down(&mut self, mut index: usize) {
        let (row, col, priority) = (self.rows[index], self.cols[index], self.priorities[index]);
        // nodes from here on have no children
        let half = ROOT_INDEX + (self.len >> 1);
        let end = self.len + ROOT_INDEX;

        while index < half {
            let left = index << 1;
            let right = left + 1;
            let child = if right < end && self.priorities[right] < self.priorities[left] {
                right
            } else {
                left
            };

            if self.priorities[child] >= priority {
                break;
            }
            self.write(
                index,
                self.rows[child],
                self.cols[child],
                self.priorities[child],
            );
            index = child;
        }

        self.write(index, row, col, priority);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Deterministic pseudo random sequence so the tests do not need an rng crate
    fn lcg(seed: &mut u64) -> usize {
        *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (*seed >> 33) as usize
    }

    fn drain(heap: &mut MinQueue) -> Vec<usize> {
        let mut out = Vec::new();
        while let Some(priority) = heap.peek_priority() {
            let (_, popped) = heap.pop_entry().unwrap();
            assert_eq!(priority, popped);
            out.push(popped);
        }
        out
    }

    #[test]
    fn test_pop_order() {
        let mut heap = MinQueue::new(8);
        heap.push(Point::new(0, 0), 5).unwrap();
        heap.push(Point::new(1, 2), 1).unwrap();
        heap.push(Point::new(3, 4), 3).unwrap();

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(), Some(Point::new(1, 2)));
        assert_eq!(heap.peek_priority(), Some(1));
        assert_eq!(heap.pop(), Some(Point::new(1, 2)));
        assert_eq!(heap.pop(), Some(Point::new(3, 4)));
        assert_eq!(heap.pop(), Some(Point::new(0, 0)));
        assert_eq!(heap.pop(), None);
        assert_eq!(heap.peek(), None);
        assert_eq!(heap.peek_priority(), None);
    }

    #[test]
    fn test_duplicate_keys() {
        let mut heap = MinQueue::new(4);
        let p = Point::new(2, 2);
        heap.push(p, 10).unwrap();
        heap.push(p, 4).unwrap();

        assert_eq!(heap.pop_entry(), Some((p, 4)));
        // the stale copy is still there
        assert_eq!(heap.pop_entry(), Some((p, 10)));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_heap_property_mixed_operations() {
        let mut seed = 7;
        let mut heap = MinQueue::new(256);
        let mut popped = Vec::new();

        for round in 0..200 {
            let priority = lcg(&mut seed) % 50;
            heap.push(Point::new(round, priority), priority).unwrap();
            if round % 3 == 0 {
                let min = heap.peek_priority().unwrap();
                let (_, got) = heap.pop_entry().unwrap();
                assert_eq!(min, got);
                // nothing left in the heap may be smaller than what was just popped
                assert!(heap.priorities().iter().all(|p| *p >= got));
                popped.push(got);
            }
        }

        let rest = drain(&mut heap);
        assert!(rest.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(popped.len() + rest.len(), 200);
    }

    #[test]
    fn test_capacity() {
        let mut heap = MinQueue::new(2);
        assert_eq!(heap.capacity(), 2);
        heap.push(Point::new(0, 0), 1).unwrap();
        heap.push(Point::new(0, 1), 2).unwrap();
        assert_eq!(
            heap.push(Point::new(0, 2), 3),
            Err(HeapError::HeapFull(2))
        );

        // popping makes room again
        heap.pop();
        assert!(heap.push(Point::new(0, 2), 3).is_ok());
    }

    #[test]
    fn test_with_entries() {
        let entries: Vec<(Point, usize)> = [9, 4, 7, 1, 8, 2, 6]
            .into_iter()
            .map(|p| (Point::new(p, p), p))
            .collect();

        assert_eq!(
            MinQueue::with_entries(3, &entries).unwrap_err(),
            HeapError::CapacityError {
                capacity: 3,
                provided: 7
            }
        );

        let mut heap = MinQueue::with_entries(10, &entries).unwrap();
        assert_eq!(heap.len(), 7);
        assert_eq!(heap.peek(), Some(Point::new(1, 1)));
        assert_eq!(drain(&mut heap), vec![1, 2, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn test_clear() {
        let mut heap = MinQueue::with_entries(4, &[(Point::new(0, 0), 3)]).unwrap();
        heap.clear();
        assert!(heap.is_empty());
        assert!(heap.priorities().is_empty());
        heap.push(Point::new(1, 1), 0).unwrap();
        assert_eq!(heap.pop(), Some(Point::new(1, 1)));
    }
}
