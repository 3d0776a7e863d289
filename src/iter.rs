use crate::Node;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Ascending iterator over borrowed values, walking level 0.
pub struct Iter<'a, T> {
    curr_node: Option<NonNull<Node<T>>>,
    remaining: usize,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(head: Option<NonNull<Node<T>>>, len: usize) -> Self {
        Self {
            curr_node: head,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        self.curr_node.map(|node| {
            let node: &'a Node<T> = unsafe { &*node.as_ptr() };
            self.curr_node = node.forward[0];
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Owning ascending iterator; frees nodes as it goes.
pub struct IntoIter<T> {
    curr_node: Option<NonNull<Node<T>>>,
    remaining: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(head: Option<NonNull<Node<T>>>, len: usize) -> Self {
        Self {
            curr_node: head,
            remaining: len,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        self.curr_node.map(|node| {
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            self.curr_node = node.forward[0];
            self.remaining -= 1;
            node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        for _ in self {}
    }
}
