use std::fmt;

use tracing::{debug, trace};

use crate::Numeric;
use crate::arena::{Arena, NodeId};
use crate::config::SkipListConfig;
use crate::error::{Error, Result};
use crate::iter::Iter;
use crate::level::{GeometricLevel, LevelGenerator};

pub(crate) type Link = Option<NodeId>;

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) key: T,
    pub(crate) forward: Vec<Link>,
}

impl<T> Node<T> {
    fn new(key: T, height: usize) -> Self {
        Self {
            key,
            forward: vec![None; height + 1],
        }
    }

    fn try_new(key: T, height: usize) -> Result<Self> {
        let mut forward = Vec::new();
        forward.try_reserve_exact(height + 1)?;
        forward.resize(height + 1, None);
        Ok(Self { key, forward })
    }

    pub(crate) fn height(&self) -> usize {
        self.forward.len() - 1
    }
}

/// A position during a descent: either the head or a stored node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(NodeId),
}

/// An ordered set backed by a skip list.
///
/// Lane 0 links every key in ascending order; each higher lane links a random
/// subset of the lane below it. The head owns one link per active lane, so
/// `max_level()` is always the index of the topmost lane, and that lane is
/// non-empty unless it is lane 0.
///
/// Keys are unique: inserting a key that is already present leaves the list
/// untouched.
#[derive(Clone)]
pub struct SkipList<T, G = GeometricLevel> {
    head: Vec<Link>,
    nodes: Arena<Node<T>>,
    config: SkipListConfig,
    level: G,
}

impl<T: Ord> SkipList<T> {
    /// Default configuration, heights drawn from an OS-seeded generator.
    pub fn new() -> Self {
        Self::from_parts(SkipListConfig::default(), GeometricLevel::default())
    }

    pub fn with_config(config: SkipListConfig) -> Result<Self> {
        config.validate()?;
        let level = GeometricLevel::new(config.promotion_probability)?;
        Ok(Self::from_parts(config, level))
    }

    /// Reproducible lane layout for a given seed.
    pub fn with_seed(config: SkipListConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let level = GeometricLevel::seeded(config.promotion_probability, seed)?;
        Ok(Self::from_parts(config, level))
    }
}

impl<T: Ord> Default for SkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, G> SkipList<T, G> {
    fn from_parts(config: SkipListConfig, level: G) -> Self {
        debug!(
            max_level_hint = config.max_level_hint,
            promotion_probability = config.promotion_probability,
            "creating skip list"
        );
        Self {
            head: vec![None],
            nodes: Arena::new(),
            config,
            level,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head[0].is_none()
    }

    /// Index of the topmost active lane.
    pub fn max_level(&self) -> usize {
        self.head.len() - 1
    }

    pub fn config(&self) -> &SkipListConfig {
        &self.config
    }

    /// Keys in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.head[0], 0)
    }

    /// Keys linked into `lane`, in ascending order. Lanes above
    /// [`max_level`](Self::max_level) are empty.
    pub fn lane(&self, lane: usize) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.head.get(lane).copied().flatten(), lane)
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Frees every node and drops back to a single lane.
    pub fn clear(&mut self) {
        debug!(len = self.len(), max_level = self.max_level(), "clearing skip list");
        self.nodes.clear();
        self.head.clear();
        self.head.push(None);
    }

    fn next(&self, at: Cursor, lane: usize) -> Link {
        match at {
            Cursor::Head => self.head[lane],
            Cursor::Node(id) => self.nodes[id].forward[lane],
        }
    }

    fn set_next(&mut self, at: Cursor, lane: usize, link: Link) {
        match at {
            Cursor::Head => self.head[lane] = link,
            Cursor::Node(id) => self.nodes[id].forward[lane] = link,
        }
    }

    /// Descends from the top lane to lane 0, moving right while `advance`
    /// accepts the next key. Records the last position of every lane in
    /// `update` and returns the final lane-0 position.
    fn walk<F>(&self, mut advance: F, mut update: Option<&mut [Cursor]>) -> Cursor
    where
        F: FnMut(&T) -> bool,
    {
        let mut current = Cursor::Head;
        for lane in (0..=self.max_level()).rev() {
            while let Some(next) = self.next(current, lane) {
                if !advance(&self.nodes[next].key) {
                    break;
                }
                current = Cursor::Node(next);
            }
            if let Some(update) = update.as_deref_mut() {
                update[lane] = current;
            }
        }
        current
    }

    /// Splices `node` in after `update[i]` on each of its lanes, opening new
    /// lanes on the head first if the node is taller than the list.
    fn link(&mut self, node: Node<T>, mut update: Vec<Cursor>) -> NodeId {
        let height = node.height();
        if height > self.max_level() {
            debug!(from = self.max_level(), to = height, "growing lanes");
            self.head.resize(height + 1, None);
            update.resize(height + 1, Cursor::Head);
        }

        let id = self.nodes.insert(node);
        for (lane, &prev) in update.iter().enumerate().take(height + 1) {
            let next = self.next(prev, lane);
            self.nodes[id].forward[lane] = next;
            self.set_next(prev, lane, Some(id));
        }
        id
    }

    /// Drops empty lanes off the top, never below lane 0.
    fn shrink(&mut self) {
        let before = self.max_level();
        while self.head.len() > 1 && self.head.last() == Some(&None) {
            self.head.pop();
        }
        if self.max_level() != before {
            debug!(from = before, to = self.max_level(), "shrinking lanes");
        }
    }
}

impl<T: Ord, G: LevelGenerator> SkipList<T, G> {
    /// Uses a caller-supplied height source, e.g. a fixed script in tests.
    pub fn with_generator(config: SkipListConfig, level: G) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, level))
    }

    fn next_height(&mut self) -> usize {
        // the hint only gives way one lane at a time, once the top lane is used
        let cap = self.config.max_level_hint.max(self.max_level() + 1);
        self.level.choose_height(cap).min(cap)
    }

    fn path_to(&self, key: &T) -> (Cursor, Vec<Cursor>) {
        let mut update = vec![Cursor::Head; self.max_level() + 1];
        let pred = self.walk(|k| k < key, Some(&mut update[..]));
        (pred, update)
    }

    fn successor_is(&self, pred: Cursor, key: &T) -> bool {
        self.next(pred, 0)
            .is_some_and(|id| self.nodes[id].key == *key)
    }

    /// Adds `key` unless an equal key is already stored. Returns whether the
    /// list changed.
    pub fn insert(&mut self, key: T) -> bool {
        let (pred, update) = self.path_to(&key);
        if self.successor_is(pred, &key) {
            trace!("key already present");
            return false;
        }

        let height = self.next_height();
        self.link(Node::new(key, height), update);
        trace!(height, len = self.len(), "inserted");
        true
    }

    /// Like [`insert`](Self::insert), but reports allocation failure instead
    /// of aborting. Everything the new node needs is reserved before any lane
    /// is relinked, so on error the list is unchanged.
    pub fn try_insert(&mut self, key: T) -> Result<bool> {
        let mut update = Vec::new();
        update.try_reserve_exact(self.max_level() + 1)?;
        update.resize(self.max_level() + 1, Cursor::Head);
        let pred = self.walk(|k| k < &key, Some(&mut update[..]));
        if self.successor_is(pred, &key) {
            return Ok(false);
        }

        let height = self.next_height();
        if height > self.max_level() {
            let extra = height - self.max_level();
            self.head.try_reserve(extra)?;
            update.try_reserve(extra)?;
        }
        let node = Node::try_new(key, height)?;
        self.nodes.try_reserve_one()?;

        self.link(node, update);
        trace!(height, len = self.len(), "inserted");
        Ok(true)
    }

    /// Unlinks every node equal to `key` and returns how many were removed.
    pub fn remove(&mut self, key: &T) -> usize {
        let (pred, update) = self.path_to(key);

        let mut removed = 0;
        let mut current = self.next(pred, 0);
        while let Some(id) = current {
            if self.nodes[id].key != *key {
                break;
            }
            for (lane, &prev) in update.iter().enumerate() {
                if self.next(prev, lane) != Some(id) {
                    break;
                }
                let after = self.nodes[id].forward[lane];
                self.set_next(prev, lane, after);
            }
            current = self.nodes[id].forward[0];
            self.nodes.remove(id);
            removed += 1;
        }

        if removed > 0 {
            trace!(removed, len = self.len(), "removed");
        }
        self.shrink();
        removed
    }

    pub fn search(&self, key: &T) -> bool {
        let pred = self.walk(|k| k < key, None);
        self.successor_is(pred, key)
    }

    pub fn contains(&self, key: &T) -> bool {
        self.search(key)
    }

    /// Number of stored nodes equal to `key`. Stops at the first greater key.
    pub fn count_occurrence(&self, key: &T) -> usize {
        let pred = self.walk(|k| k < key, None);
        let mut count = 0;
        let mut current = self.next(pred, 0);
        while let Some(id) = current {
            let node = &self.nodes[id];
            if node.key > *key {
                break;
            }
            count += 1;
            current = node.forward[0];
        }
        count
    }

    /// Smallest stored key that is not less than `key`.
    pub fn lower_bound(&self, key: &T) -> Option<&T> {
        let pred = self.walk(|k| k < key, None);
        self.next(pred, 0).map(|id| &self.nodes[id].key)
    }

    /// Smallest stored key strictly greater than `key`.
    pub fn upper_bound(&self, key: &T) -> Option<&T> {
        let pred = self.walk(|k| k < key, None);
        let mut current = self.next(pred, 0);
        while let Some(id) = current {
            let node = &self.nodes[id];
            if node.key > *key {
                return Some(&node.key);
            }
            current = node.forward[0];
        }
        None
    }

    /// [`lower_bound`](Self::lower_bound) with `T::default()` standing in for
    /// "no such key". A stored key equal to the default is indistinguishable
    /// from a miss.
    pub fn lower_bound_or_default(&self, key: &T) -> T
    where
        T: Clone + Default,
    {
        self.lower_bound(key).cloned().unwrap_or_default()
    }

    /// [`upper_bound`](Self::upper_bound) with `T::default()` for a miss. Same
    /// ambiguity as [`lower_bound_or_default`](Self::lower_bound_or_default).
    pub fn upper_bound_or_default(&self, key: &T) -> T
    where
        T: Clone + Default,
    {
        self.upper_bound(key).cloned().unwrap_or_default()
    }

    /// Walks every lane and checks ordering, lane membership and the head.
    pub fn check_invariants(&self) -> Result<()> {
        let top = self.max_level();
        if top > 0 && self.head[top].is_none() {
            return Err(Error::invariant(top, "top lane is empty"));
        }

        let mut tall = vec![0usize; top + 1];
        for node in self.lane_nodes(0)? {
            let height = node.height();
            if height > top {
                return Err(Error::invariant(
                    height,
                    format!("node height {height} above max level {top}"),
                ));
            }
            for count in &mut tall[..=height] {
                *count += 1;
            }
        }
        if tall[0] != self.len() {
            return Err(Error::invariant(
                0,
                format!("{} linked nodes, {} allocated", tall[0], self.len()),
            ));
        }

        for (lane, &expected) in tall.iter().enumerate().skip(1) {
            let members = self.lane_nodes(lane)?;
            if let Some(node) = members.iter().find(|node| node.height() < lane) {
                return Err(Error::invariant(
                    lane,
                    format!("node of height {} linked here", node.height()),
                ));
            }
            if members.len() != expected {
                return Err(Error::invariant(
                    lane,
                    format!("{} nodes linked, {expected} reach this lane", members.len()),
                ));
            }
        }
        Ok(())
    }

    /// Nodes of one lane in link order, rejecting cycles and descending keys.
    fn lane_nodes(&self, lane: usize) -> Result<Vec<&Node<T>>> {
        let mut members: Vec<&Node<T>> = Vec::new();
        let mut current = self.head[lane];
        while let Some(id) = current {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| Error::invariant(lane, format!("link to freed slot {id}")))?;
            if members.len() == self.len() {
                return Err(Error::invariant(lane, "lane does not terminate"));
            }
            if let Some(prev) = members.last() {
                if prev.key > node.key {
                    return Err(Error::invariant(lane, "keys out of order"));
                }
            }
            members.push(node);
            current = node.forward.get(lane).copied().flatten();
        }
        Ok(members)
    }
}

impl<T: Numeric, G: LevelGenerator> SkipList<T, G> {
    /// Stored key nearest to `key`; on a tie the smaller key wins.
    pub fn closest_element(&self, key: &T) -> Option<T> {
        let pred = self.walk(|k| k < key, None);
        let below = match pred {
            Cursor::Head => None,
            Cursor::Node(id) => Some(self.nodes[id].key),
        };
        let above = self.next(pred, 0).map(|id| self.nodes[id].key);

        match (below, above) {
            (Some(below), Some(above)) => {
                if above.distance(key) < below.distance(key) {
                    Some(above)
                } else {
                    Some(below)
                }
            }
            (below, above) => below.or(above),
        }
    }

    /// [`closest_element`](Self::closest_element) with `T::MAX_VALUE` for an
    /// empty list. A stored maximum value is indistinguishable from a miss.
    pub fn closest_element_or_max(&self, key: &T) -> T {
        self.closest_element(key).unwrap_or(T::MAX_VALUE)
    }
}

impl<T: Ord, G: LevelGenerator> Extend<T> for SkipList<T, G> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T: Ord> FromIterator<T> for SkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T, G> IntoIterator for &'a SkipList<T, G> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: fmt::Display, G> fmt::Display for SkipList<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lvl 0:")?;
        for key in self.iter() {
            write!(f, " {key}")?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug, G> fmt::Debug for SkipList<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
