/// Sliding window over the last `N` values. Once full, every push drops the
/// oldest entry.
pub struct RingBuffer<T, const N: usize> {
    slots: [T; N],
    next: usize,
    len: usize,
}

impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    pub fn new() -> Self {
        Self {
            slots: [T::default(); N],
            next: 0,
            len: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.len
    }

    pub fn push_cyclic(&mut self, val: T) {
        if N == 0 {
            return;
        }
        self.slots[self.next] = val;
        self.next = (self.next + 1) % N;
        self.len = (self.len + 1).min(N);
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        // oldest slot is `len` steps behind the write position
        let start = (self.next + N - self.len) % N.max(1);
        (0..self.len).map(move |i| self.slots[(start + i) % N])
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_then_slides() {
        let mut window: RingBuffer<i32, 3> = RingBuffer::new();
        assert_eq!(window.iter().count(), 0);

        window.push_cyclic(7);
        window.push_cyclic(8);
        assert_eq!(window.count(), 2);
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![7, 8]);

        for v in 9..=12 {
            window.push_cyclic(v);
        }
        assert_eq!(window.count(), 3);
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![10, 11, 12]);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut window: RingBuffer<u8, 0> = RingBuffer::new();
        window.push_cyclic(1);
        assert_eq!(window.count(), 0);
        assert_eq!(window.iter().next(), None);
    }
}
