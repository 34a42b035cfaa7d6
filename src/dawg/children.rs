use super::trie::NodeId;

/// A compact representation of the children of a [`TrieNode`](super::trie::TrieNode) that
/// doesn't allocate until there are at least three children.
///
/// Children are always kept in ascending letter order with unique letters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Children {
    /// No children.
    #[default]
    None,
    /// Exactly one child (letter, node).
    One((u8, NodeId)),
    /// Exactly two children (letter1, node1, letter2, node2), `letter1 < letter2`.
    Two((u8, NodeId, u8, NodeId)),
    /// Three or more children stored in a vector.
    Many(Vec<(u8, NodeId)>),
}

impl Children {
    /// Gets the child at the specified position.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get_at(&self, index: usize) -> Option<(u8, NodeId)> {
        match self {
            Children::None => None,
            Children::One(child) => match index {
                0 => Some(*child),
                _ => None,
            },
            Children::Two((c1, n1, c2, n2)) => match index {
                0 => Some((*c1, *n1)),
                1 => Some((*c2, *n2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    /// Returns the child reached by `letter`, if any.
    #[inline]
    pub fn get(&self, letter: u8) -> Option<NodeId> {
        match self {
            Children::None => None,
            Children::One((ch, node)) => (*ch == letter).then_some(*node),
            Children::Two((c1, n1, c2, n2)) => {
                if letter == *c1 {
                    Some(*n1)
                } else if letter == *c2 {
                    Some(*n2)
                } else {
                    None
                }
            }
            Children::Many(children) => children
                .binary_search_by_key(&letter, |&(c, _)| c)
                .ok()
                .map(|pos| children[pos].1),
        }
    }

    /// Inserts an edge in sorted position.
    ///
    /// Panics if `letter` already exists.
    pub fn insert(&mut self, letter: u8, child: NodeId) {
        let current = std::mem::take(self);
        *self = match current {
            Children::None => Children::One((letter, child)),
            Children::One((c1, n1)) => {
                assert!(c1 != letter, "insert: letter already exists");
                if letter < c1 {
                    Children::Two((letter, child, c1, n1))
                } else {
                    Children::Two((c1, n1, letter, child))
                }
            }
            Children::Two((c1, n1, c2, n2)) => {
                assert!(
                    c1 != letter && c2 != letter,
                    "insert: letter already exists"
                );
                let mut v = vec![(c1, n1), (c2, n2), (letter, child)];
                v.sort_unstable_by_key(|&(c, _)| c);
                Children::Many(v)
            }
            Children::Many(mut children) => {
                let pos = children.partition_point(|&(c, _)| c < letter);
                assert!(
                    children.get(pos).map_or(true, |&(c, _)| c != letter),
                    "insert: letter already exists"
                );
                children.insert(pos, (letter, child));
                Children::Many(children)
            }
        };
    }

    /// Points the edge labeled `letter` at `new_child`.
    ///
    /// Panics if `letter` is not present.
    pub fn redirect(&mut self, letter: u8, new_child: NodeId) {
        let slot = match self {
            Children::None => None,
            Children::One((c, n)) => (*c == letter).then_some(n),
            Children::Two((c1, n1, c2, n2)) => {
                if *c1 == letter {
                    Some(n1)
                } else if *c2 == letter {
                    Some(n2)
                } else {
                    None
                }
            }
            Children::Many(children) => children
                .iter_mut()
                .find(|(c, _)| *c == letter)
                .map(|(_, n)| n),
        };
        *slot.expect("redirect: letter not found") = new_child;
    }

    /// Returns the number of children.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }

    /// Returns true if there are no children.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Children::None)
    }

    /// Returns an iterator over `(letter, node)` pairs in ascending letter order.
    #[inline]
    pub fn iter(&self) -> ChildIter<'_> {
        ChildIter {
            children: self,
            front: 0,
            back: self.len(),
        }
    }
}

/// An iterator over the children of a trie node.
#[derive(Clone)]
pub struct ChildIter<'a> {
    children: &'a Children,
    front: usize,
    back: usize,
}

impl Iterator for ChildIter<'_> {
    type Item = (u8, NodeId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let next_child = self.children.get_at(self.front)?;
        self.front += 1;
        Some(next_child)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for ChildIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.children.get_at(self.back)
    }
}

impl ExactSizeIterator for ChildIter<'_> {}

#[cfg(test)]
mod test {
    use super::*;

    fn id(n: u32) -> NodeId {
        NodeId(n)
    }

    #[test]
    fn no_children() {
        let c = Children::None;
        assert_eq!(c.iter().next(), None);
        assert_eq!(c.len(), 0);
        assert!(c.is_empty());
    }

    #[test]
    fn inserts_stay_sorted() {
        let mut c = Children::None;
        c.insert(b'M', id(1));
        c.insert(b'C', id(2));
        assert!(matches!(c, Children::Two(_)));
        c.insert(b'Z', id(3));
        c.insert(b'A', id(4));
        let letters: Vec<u8> = c.iter().map(|(l, _)| l).collect();
        assert_eq!(letters, b"ACMZ");
        assert_eq!(c.len(), 4);
        assert_eq!(c.iter().len(), 4);
        let reversed: Vec<u8> = c.iter().rev().map(|(l, _)| l).collect();
        assert_eq!(reversed, b"ZMCA");
    }

    #[test]
    fn get_finds_every_letter() {
        let mut c = Children::None;
        for (i, letter) in (b'A'..=b'Z').rev().enumerate() {
            c.insert(letter, id(i as u32));
        }
        for (i, letter) in (b'A'..=b'Z').rev().enumerate() {
            assert_eq!(c.get(letter), Some(id(i as u32)));
        }
        assert_eq!(c.get(b'*'), None);
    }

    #[test]
    fn redirect_replaces_only_that_edge() {
        let mut c = Children::None;
        c.insert(b'A', id(1));
        c.insert(b'B', id(2));
        c.insert(b'C', id(3));
        c.redirect(b'B', id(9));
        let all: Vec<_> = c.iter().collect();
        assert_eq!(all, vec![(b'A', id(1)), (b'B', id(9)), (b'C', id(3))]);
    }

    #[test]
    #[should_panic(expected = "letter already exists")]
    fn duplicate_insert_panics() {
        let mut c = Children::None;
        c.insert(b'A', id(1));
        c.insert(b'A', id(2));
    }

    #[test]
    #[should_panic(expected = "letter not found")]
    fn redirect_missing_letter_panics() {
        let mut c = Children::None;
        c.insert(b'A', id(1));
        c.redirect(b'B', id(2));
    }
}
