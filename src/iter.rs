use std::iter::FusedIterator;

use crate::arena::Arena;
use crate::skiplist::{Link, Node};

/// Borrowing iterator over the keys of one lane, front to back.
///
/// Created by [`SkipList::iter`](crate::SkipList::iter) for lane 0 and by
/// [`SkipList::lane`](crate::SkipList::lane) for any other lane.
pub struct Iter<'a, T> {
    nodes: &'a Arena<Node<T>>,
    next: Link,
    lane: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(nodes: &'a Arena<Node<T>>, first: Link, lane: usize) -> Self {
        Self {
            nodes,
            next: first,
            lane,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.next?)?;
        self.next = node.forward.get(self.lane).copied().flatten();
        Some(&node.key)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            next: self.next,
            lane: self.lane,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{SkipList, SkipListConfig};

    #[test]
    fn test_iter() {
        let mut list = SkipList::with_seed(SkipListConfig::default(), 3).unwrap();
        for i in (0..=10).rev() {
            list.insert(i);
        }
        let keys: Vec<i32> = list.iter().copied().collect();
        assert_eq!(keys, (0..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_iter_is_restartable() {
        let list: SkipList<u32> = [4, 2, 8].into_iter().collect();
        let first: Vec<_> = list.iter().collect();
        let second: Vec<_> = (&list).into_iter().collect();
        assert_eq!(first, second);

        let mut iter = list.iter();
        iter.next();
        let rest = iter.clone();
        assert_eq!(iter.count(), 2);
        assert_eq!(rest.copied().collect::<Vec<_>>(), vec![4, 8]);
    }

    #[test]
    fn test_iter_empty() {
        let list: SkipList<u32> = SkipList::new();
        assert_eq!(list.iter().next(), None);
        assert_eq!(list.lane(7).next(), None);
    }

    #[test]
    fn test_upper_lanes_are_subsequences() {
        let list: SkipList<u32> = (0..500).collect();
        for lane in 1..=list.max_level() {
            let lower: Vec<_> = list.lane(lane - 1).collect();
            let mut lower = lower.into_iter();
            for key in list.lane(lane) {
                assert!(lower.any(|k| k == key), "lane {lane} key {key}");
            }
        }
    }
}
