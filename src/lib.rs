//! An indexed skiplist: a sorted set of unique values with expected
//! `O(log(n))` search, insertion, deletion and positional access.
//!
//! Every forward link carries a *width*, the number of level-0 steps it
//! skips, so the `k`-th smallest element can be found without walking the
//! whole list. [`SkipList::relevel`] rebuilds the links deterministically,
//! which bounds every lookup by `O(log(n))` until random inserts degrade it.
//!
//! ```
//! use indexed_skiplist::SkipList;
//!
//! let mut sk = SkipList::with_seed(3, 7);
//! for i in [5, 2, 8, 1, 9].iter() {
//!     sk.insert(*i);
//! }
//! assert_eq!(sk.to_vec(), vec![1, 2, 5, 8, 9]);
//! assert_eq!(sk.get_at(2), Some(&5));
//! assert_eq!(sk.index_of(&8), Some(3));
//! ```
use log::{debug, trace};
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

mod error;
mod height;
mod iter;
#[cfg(feature = "serde_support")]
mod serde;

pub use crate::error::{InsertError, InvariantViolation};
pub use crate::height::{HeightGenerator, UniformHeights};
pub use crate::iter::{IntoIter, Iter};

use crate::height::relevel_height;

/// Max height used by [`SkipList::default`].
pub const DEFAULT_MAX_HEIGHT: usize = 3;

type Link<T> = Option<NonNull<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) value: T,
    // Both have length `height + 1`.
    pub(crate) forward: Vec<Link<T>>,
    width: Vec<usize>,
}

impl<T> Node<T> {
    fn alloc(value: T, height: usize) -> NonNull<Node<T>> {
        let node = Box::new(Node {
            value,
            forward: vec![None; height + 1],
            width: vec![1; height + 1],
        });
        unsafe { NonNull::new_unchecked(Box::into_raw(node)) }
    }

    #[inline]
    fn height(&self) -> usize {
        self.forward.len() - 1
    }
}

/// Read-only view of a stored node, as returned by [`SkipList::node_at`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a, T> {
    node: &'a Node<T>,
}

impl<'a, T> NodeRef<'a, T> {
    pub fn value(&self) -> &'a T {
        &self.node.value
    }

    /// Number of levels this node participates in, minus one.
    pub fn height(&self) -> usize {
        self.node.height()
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for NodeRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", &self.node.value)
            .field("height", &self.height())
            .field("width", &self.node.width)
            .finish()
    }
}

/// A sorted set of unique values with rank-based access.
///
/// The head node always holds the smallest value and spans all
/// `max_height + 1` levels. Levels above 0 are non-owning shortcuts over
/// the level-0 chain.
///
/// Not thread safe: concurrent mutation must be serialized by the caller.
pub struct SkipList<T, G = UniformHeights> {
    head: Link<T>,
    max_height: usize,
    len: usize,
    heights: G,
    _marker: PhantomData<Box<Node<T>>>,
}

// The list exclusively owns every node reachable from `head`.
unsafe impl<T: Send, G: Send> Send for SkipList<T, G> {}

impl<T> SkipList<T> {
    /// Make an empty skiplist whose random heights are seeded from entropy.
    pub fn new(max_height: usize) -> Self {
        Self::with_generator(max_height, UniformHeights::from_entropy())
    }

    /// Make an empty skiplist with reproducible random heights.
    pub fn with_seed(max_height: usize, seed: u64) -> Self {
        Self::with_generator(max_height, UniformHeights::from_seed(seed))
    }
}

impl<T> Default for SkipList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEIGHT)
    }
}

impl<T, G> SkipList<T, G> {
    /// Make an empty skiplist drawing random heights from `heights`.
    ///
    /// Generated heights above `max_height` are clamped to it.
    pub fn with_generator(max_height: usize, heights: G) -> Self {
        SkipList {
            head: None,
            max_height,
            len: 0,
            heights,
            _marker: PhantomData,
        }
    }

    /// Number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest level index a node may reach; the head always reaches it.
    #[inline]
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// Iterate over every value in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.head, self.len)
    }

    /// Smallest value, `O(1)`.
    pub fn first(&self) -> Option<&T> {
        self.head.map(|head| unsafe { &(*head.as_ptr()).value })
    }

    /// Largest value, `O(log(n))` expected.
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get_at(last))
    }

    /// Value with rank `index`, i.e. the `index`-th smallest.
    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.node_at(index).map(|node| node.value())
    }

    /// Node with rank `index`; `None` when `index >= len()`.
    pub fn node_at(&self, index: usize) -> Option<NodeRef<'_, T>> {
        if index >= self.len {
            return None;
        }
        let mut curr = self.head?;
        let mut rank = 0;
        unsafe {
            for level in (0..=self.max_height).rev() {
                while let Some(next) = curr.as_ref().forward[level] {
                    let landed = rank + curr.as_ref().width[level];
                    if landed > index {
                        break;
                    }
                    rank = landed;
                    curr = next;
                }
                if rank == index {
                    return Some(NodeRef {
                        node: &*curr.as_ptr(),
                    });
                }
            }
        }
        debug_assert!(false, "widths do not cover index {}", index);
        None
    }

    /// Rebuild every level so node heights depend only on position.
    ///
    /// The node at rank `i > 0` gets one level per trailing factor of two
    /// in `i`, capped at `max_height`. Afterwards search and `get_at` are
    /// `O(log(n))` in the worst case. Calling it twice is the same as
    /// calling it once.
    pub fn relevel(&mut self) {
        let max_height = self.max_height;
        unsafe { self.relink(|position, _| relevel_height(position, max_height)) };
        trace!(
            "relevelled {} nodes with max height {}",
            self.len,
            max_height
        );
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        let mut curr = self.head.take();
        while let Some(node) = curr {
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            curr = node.forward[0];
        }
        self.len = 0;
    }

    /// Rebuild the links above level 0 from scratch.
    ///
    /// `height_at(position, current_height)` picks the new height of each
    /// non-head node; results are capped at `max_height`. The head keeps
    /// `max_height`.
    unsafe fn relink<F>(&mut self, mut height_at: F)
    where
        F: FnMut(usize, usize) -> usize,
    {
        let head = match self.head {
            Some(head) => head,
            None => return,
        };
        let max_height = self.max_height;
        {
            let head = &mut *head.as_ptr();
            for link in head.forward.iter_mut().skip(1) {
                *link = None;
            }
            for width in head.width.iter_mut() {
                *width = 1;
            }
        }
        // Last node placed on each level.
        let mut tails = vec![head; max_height + 1];
        let mut curr = head.as_ref().forward[0];
        let mut position = 1;
        while let Some(node_ptr) = curr {
            let height = {
                let node = &mut *node_ptr.as_ptr();
                let height = height_at(position, node.height()).min(max_height);
                node.forward.truncate(1);
                node.forward.resize(height + 1, None);
                node.width.clear();
                node.width.resize(height + 1, 1);
                curr = node.forward[0];
                height
            };
            for (level, tail) in tails.iter_mut().enumerate().skip(1) {
                let tail_node = &mut *tail.as_ptr();
                if level <= height {
                    tail_node.forward[level] = Some(node_ptr);
                    *tail = node_ptr;
                } else {
                    tail_node.width[level] += 1;
                }
            }
            position += 1;
        }
    }

    #[inline]
    fn clamp_height(&self, height: usize) -> usize {
        height.min(self.max_height)
    }
}

impl<T: Ord, G> SkipList<T, G> {
    /// Look up `value`, expected `O(log(n))`.
    pub fn find(&self, value: &T) -> Option<&T> {
        let head = self.head?;
        unsafe {
            match head.as_ref().value.cmp(value) {
                Ordering::Equal => return Some(&(*head.as_ptr()).value),
                Ordering::Greater => return None,
                Ordering::Less => {}
            }
            let mut curr = head;
            for level in (0..=self.max_height).rev() {
                while let Some(next) = curr.as_ref().forward[level] {
                    match next.as_ref().value.cmp(value) {
                        Ordering::Less => curr = next,
                        Ordering::Equal => return Some(&(*next.as_ptr()).value),
                        Ordering::Greater => break,
                    }
                }
            }
        }
        None
    }

    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Rank of `value`, the inverse of [`SkipList::get_at`].
    pub fn index_of(&self, value: &T) -> Option<usize> {
        let head = self.head?;
        unsafe {
            match head.as_ref().value.cmp(value) {
                Ordering::Equal => return Some(0),
                Ordering::Greater => return None,
                Ordering::Less => {}
            }
            let mut curr = head;
            let mut rank = 0;
            for level in (0..=self.max_height).rev() {
                while let Some(next) = curr.as_ref().forward[level] {
                    match next.as_ref().value.cmp(value) {
                        Ordering::Less => {
                            rank += curr.as_ref().width[level];
                            curr = next;
                        }
                        Ordering::Equal => return Some(rank + curr.as_ref().width[level]),
                        Ordering::Greater => break,
                    }
                }
            }
        }
        None
    }

    /// Insert `value` at the given height.
    ///
    /// Rejects values already present and heights above `max_height`;
    /// in both cases the list is left untouched and the value is returned
    /// inside the error. A new minimum becomes the head and always spans
    /// every level, so `height` is ignored on that path.
    pub fn insert_with_height(&mut self, value: T, height: usize) -> Result<(), InsertError<T>> {
        if height > self.max_height {
            debug!(
                "rejected insert at height {} (max height {})",
                height, self.max_height
            );
            return Err(InsertError::HeightOutOfRange {
                height,
                max_height: self.max_height,
                value,
            });
        }
        self.insert_at_height(value, height)
    }

    /// Remove `value`, returning whether it was present.
    ///
    /// Removing an absent value leaves the list untouched.
    pub fn remove(&mut self, value: &T) -> bool {
        let head = match self.head {
            Some(head) => head,
            None => return false,
        };
        unsafe {
            match head.as_ref().value.cmp(value) {
                Ordering::Greater => return false,
                Ordering::Equal => {
                    self.pop_head(head);
                    return true;
                }
                Ordering::Less => {}
            }
            let (preds, _) = self.predecessors(head, value);
            let target = match preds[0].as_ref().forward[0] {
                Some(next) if next.as_ref().value == *value => next,
                _ => return false,
            };
            for (level, pred) in preds.iter().enumerate() {
                let pred = &mut *pred.as_ptr();
                if pred.forward[level] == Some(target) {
                    let target = target.as_ref();
                    pred.forward[level] = target.forward[level];
                    pred.width[level] = pred.width[level] + target.width[level] - 1;
                } else {
                    pred.width[level] -= 1;
                }
            }
            drop(Box::from_raw(target.as_ptr()));
        }
        self.len -= 1;
        true
    }

    fn insert_at_height(&mut self, value: T, height: usize) -> Result<(), InsertError<T>> {
        let head = match self.head {
            Some(head) => head,
            None => {
                self.head = Some(Node::alloc(value, self.max_height));
                self.len = 1;
                return Ok(());
            }
        };
        unsafe {
            match value.cmp(&head.as_ref().value) {
                Ordering::Equal => return Err(self.duplicate(value)),
                Ordering::Less => {
                    self.push_front(head, value);
                    return Ok(());
                }
                Ordering::Greater => {}
            }
            let (preds, ranks) = self.predecessors(head, &value);
            if let Some(next) = preds[0].as_ref().forward[0] {
                if next.as_ref().value == value {
                    return Err(self.duplicate(value));
                }
            }
            let rank = ranks[0] + 1;
            let new = Node::alloc(value, height);
            for (level, (pred, pred_rank)) in preds.iter().zip(ranks.iter()).enumerate() {
                let pred = &mut *pred.as_ptr();
                if level <= height {
                    let new_node = &mut *new.as_ptr();
                    new_node.forward[level] = pred.forward[level];
                    new_node.width[level] = pred.width[level] + 1 - (rank - pred_rank);
                    pred.forward[level] = Some(new);
                    pred.width[level] = rank - pred_rank;
                } else {
                    pred.width[level] += 1;
                }
            }
        }
        self.len += 1;
        Ok(())
    }

    fn duplicate(&self, value: T) -> InsertError<T> {
        debug!("rejected duplicate insert (len {})", self.len);
        InsertError::Duplicate(value)
    }

    /// For every level, the last node strictly less than `value` and its
    /// rank. The head must be less than `value`.
    unsafe fn predecessors(
        &self,
        head: NonNull<Node<T>>,
        value: &T,
    ) -> (Vec<NonNull<Node<T>>>, Vec<usize>) {
        let levels = self.max_height + 1;
        let mut preds = vec![head; levels];
        let mut ranks = vec![0; levels];
        let mut curr = head;
        let mut rank = 0;
        for level in (0..levels).rev() {
            while let Some(next) = curr.as_ref().forward[level] {
                if next.as_ref().value < *value {
                    rank += curr.as_ref().width[level];
                    curr = next;
                } else {
                    break;
                }
            }
            preds[level] = curr;
            ranks[level] = rank;
        }
        (preds, ranks)
    }

    /// Make `value` the new head. The old head keeps its full height and
    /// sits one step after the new head on every level.
    unsafe fn push_front(&mut self, old_head: NonNull<Node<T>>, value: T) {
        let new = Node::alloc(value, self.max_height);
        {
            let new_head = &mut *new.as_ptr();
            for (link, width) in new_head.forward.iter_mut().zip(new_head.width.iter_mut()) {
                *link = Some(old_head);
                *width = 1;
            }
        }
        self.head = Some(new);
        self.len += 1;
        trace!("new head pushed in front of a full-height old head");
    }

    /// Unlink and free the head, promoting its successor to full height.
    unsafe fn pop_head(&mut self, head: NonNull<Node<T>>) {
        let old = Box::from_raw(head.as_ptr());
        self.head = old.forward[0].map(|succ| {
            let new_head = &mut *succ.as_ptr();
            let promoted_from = new_head.height();
            for level in (promoted_from + 1)..=self.max_height {
                new_head.forward.push(old.forward[level]);
                new_head.width.push(old.width[level] - 1);
            }
            trace!("promoted successor from height {}", promoted_from);
            succ
        });
        self.len -= 1;
    }

    /// Check every structural invariant by walking level 0.
    ///
    /// `O(n * max_height)`; meant for tests and debugging.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut nodes: Vec<&Node<T>> = Vec::with_capacity(self.len);
        let mut curr = self.head;
        while let Some(node) = curr {
            let node = unsafe { &*node.as_ptr() };
            nodes.push(node);
            curr = node.forward[0];
        }
        if nodes.len() != self.len {
            return Err(InvariantViolation::Count {
                count: self.len,
                reachable: nodes.len(),
            });
        }
        if let Some(head) = nodes.first() {
            if head.height() != self.max_height {
                return Err(InvariantViolation::HeadHeight {
                    height: head.height(),
                    max_height: self.max_height,
                });
            }
        }
        for (position, pair) in nodes.windows(2).enumerate() {
            if pair[0].value >= pair[1].value {
                return Err(InvariantViolation::OutOfOrder {
                    position: position + 1,
                });
            }
        }
        for (position, node) in nodes.iter().enumerate() {
            if node.height() > self.max_height || node.width.len() != node.forward.len() {
                return Err(InvariantViolation::NodeTooTall {
                    position,
                    height: node.height(),
                    max_height: self.max_height,
                });
            }
        }
        for level in 0..=self.max_height {
            let mut on_level = nodes
                .iter()
                .enumerate()
                .filter(|(_, node)| node.height() >= level)
                .peekable();
            while let Some((position, node)) = on_level.next() {
                let (expected_link, expected_width) = match on_level.peek() {
                    Some((next_position, next)) => (
                        Some(**next as *const Node<T>),
                        next_position - position,
                    ),
                    None => (None, self.len - position),
                };
                let link = node.forward[level].map(|n| n.as_ptr() as *const Node<T>);
                if link != expected_link {
                    return Err(InvariantViolation::SkippedLink { position, level });
                }
                if node.width[level] != expected_width {
                    return Err(InvariantViolation::Width {
                        position,
                        level,
                        found: node.width[level],
                        expected: expected_width,
                    });
                }
            }
        }
        Ok(())
    }
}

impl<T: Ord, G: HeightGenerator> SkipList<T, G> {
    /// Insert `value` at a randomly drawn height.
    ///
    /// Returns `false` if `value` was already present, in which case the
    /// list is unchanged and `value` is dropped.
    pub fn insert(&mut self, value: T) -> bool {
        let height = self.heights.height(self.max_height);
        let height = self.clamp_height(height);
        self.insert_at_height(value, height).is_ok()
    }
}

impl<T: Clone, G> SkipList<T, G> {
    /// Every value in ascending order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T, G> Drop for SkipList<T, G> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone, G: Clone> Clone for SkipList<T, G> {
    /// Copies values and per-node heights.
    fn clone(&self) -> Self {
        let mut sk = SkipList::with_generator(self.max_height, self.heights.clone());
        let mut source = self.iter_nodes();
        let first = match source.next() {
            Some(node) => node,
            None => return sk,
        };
        let head = Node::alloc(first.value.clone(), self.max_height);
        let mut tail = head;
        let mut heights = vec![self.max_height];
        for node in source {
            let next = Node::alloc(node.value.clone(), node.height());
            let tail_node = unsafe { &mut *tail.as_ptr() };
            tail_node.forward[0] = Some(next);
            tail = next;
            heights.push(node.height());
        }
        sk.head = Some(head);
        sk.len = heights.len();
        unsafe { sk.relink(|position, _| heights[position]) };
        sk
    }
}

impl<T, G> SkipList<T, G> {
    fn iter_nodes(&self) -> impl Iterator<Item = &Node<T>> {
        let mut curr = self.head;
        std::iter::from_fn(move || {
            curr.map(|node| {
                let node = unsafe { &*node.as_ptr() };
                curr = node.forward[0];
                node
            })
        })
    }
}

impl<T: PartialEq, G> PartialEq for SkipList<T, G> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: fmt::Debug, G> fmt::Debug for SkipList<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SkipList(max_height: {}, len: {}), and table:",
            self.max_height, self.len
        )?;
        for level in (0..=self.max_height).rev() {
            write!(f, "L{}:", level)?;
            for node in self.iter_nodes().filter(|node| node.height() >= level) {
                write!(f, " {:?} -{}->", node.value, node.width[level])?;
            }
            writeln!(f, " end")?;
        }
        Ok(())
    }
}

impl<T: fmt::Display, G> fmt::Display for SkipList<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl<T: Ord, G: HeightGenerator> Extend<T> for SkipList<T, G> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for SkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sk = SkipList::default();
        sk.extend(iter);
        sk
    }
}

impl<T: Ord> From<Vec<T>> for SkipList<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T, G> IntoIterator for &'a SkipList<T, G> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, G> IntoIterator for SkipList<T, G> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let len = std::mem::replace(&mut self.len, 0);
        IntoIter::new(self.head.take(), len)
    }
}
