/// Binary min-heap over 0-indexed storage.
///
/// Ordering is entirely up to `T`; callers that need stable ties put an
/// insertion counter in their `Ord` impl.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

impl<T: Ord> MinHeap<T> {
    pub fn build(source: Vec<T>) -> Self {
        let mut heap = MinHeap { elements: source };
        let n = heap.heap_size();
        for i in (0..n / 2).rev() {
            heap.min_heapify(i);
        }
        heap
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }

    fn min_heapify(&mut self, mut i: usize) {
        let n = self.heap_size();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < n && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < n && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        let mut i = self.heap_size() - 1;
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i] >= self.elements[p] {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
        debug_assert!(self.valid_min_heap());
    }

    /// Removes the smallest element, or `None` when the heap is empty.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.heap_size() - 1;
        self.elements.swap(0, last);
        let result = self.elements.pop();
        self.min_heapify(0);
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_build_then_drain_is_sorted() {
        let mut heap = MinHeap::build(vec![9, 3, 7, 1, 8, 2, 2, 6]);
        assert!(heap.valid_min_heap());
        let mut drained = Vec::new();
        while let Some(x) = heap.extract_min() {
            drained.push(x);
        }
        assert_eq!(drained, vec![1, 2, 2, 3, 6, 7, 8, 9]);
    }

    #[test]
    fn test_insert_keeps_heap_shape() {
        let mut heap = MinHeap::build(vec![]);
        for x in [5, 4, 3, 2, 1, 0] {
            heap.insert(x);
            assert!(heap.valid_min_heap());
        }
        assert_eq!(heap.heap_size(), 6);
        assert_eq!(heap.extract_min(), Some(0));
    }

    #[test]
    fn test_empty_heap() {
        let mut heap: MinHeap<u32> = MinHeap::build(vec![]);
        assert_eq!(heap.heap_size(), 0);
        assert_eq!(heap.extract_min(), None);
        let mut single = MinHeap::build(vec![42]);
        assert_eq!(single.extract_min(), Some(42));
        assert_eq!(single.heap_size(), 0);
    }
}
