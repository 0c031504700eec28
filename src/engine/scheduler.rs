use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

/// A task waiting for the audio clock to reach `due`.
struct Entry<T> {
    due: f64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Timed task queue on the audio clock.
///
/// Tasks come out in due-time order; ties keep insertion order. The queue
/// never runs anything itself: the owner pops due tasks and decides whether
/// each one still applies, which is where cancellation lives.
pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: f64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { due, seq, task }));
    }

    /// Pop the earliest task if it is due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<T> {
        if self.queue.peek()?.0.due > now {
            return None;
        }
        self.queue.pop().map(|Reverse(entry)| entry.task)
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<f64> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    /// Drop every pending task matching `pred`. Returns how many were dropped.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|Reverse(entry)| !pred(&entry.task));
        before - self.queue.len()
    }

    pub fn pending_where(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.queue.iter().filter(|Reverse(entry)| pred(&entry.task)).count()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2.0, "late");
        scheduler.schedule(0.5, "early");
        scheduler.schedule(1.0, "middle");

        assert_eq!(scheduler.pop_due(0.4), None);
        assert_eq!(scheduler.pop_due(5.0), Some("early"));
        assert_eq!(scheduler.pop_due(5.0), Some("middle"));
        assert_eq!(scheduler.pop_due(1.5), None);
        assert_eq!(scheduler.pop_due(2.0), Some("late"));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut scheduler = Scheduler::new();
        for i in 0..5 {
            scheduler.schedule(1.0, i);
        }
        let order: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(1.0)).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn cancel_where_drops_matching_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, ("rain", 1));
        scheduler.schedule(2.0, ("cafe", 1));
        scheduler.schedule(3.0, ("rain", 2));

        assert_eq!(scheduler.cancel_where(|(name, _)| *name == "rain"), 2);
        assert_eq!(scheduler.pending_where(|(name, _)| *name == "rain"), 0);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(2.0));
    }
}
