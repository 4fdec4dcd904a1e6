//! A disjoint-set forest over half-edge indices.
//!
//! The representative of every class is its lowest member — the induced-knot
//! relabeling keys off that order, so the rooting rule is lowest-index-wins
//! rather than union-by-rank. Parent slots live in `Cell`s so `find` can
//! compress paths behind a shared reference, and root chasing is a loop, not
//! recursion.

use std::cell::Cell;

#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    parents: Vec<Cell<usize>>,
}

impl UnionFind {
    /// One singleton class per index in `0..len`.
    pub fn new(len: usize) -> Self {
        UnionFind {
            parents: (0..len).map(Cell::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Representative of the class containing `x`: its lowest member.
    pub fn find(&self, x: usize) -> usize {
        let mut root = x;
        loop {
            let up = self.parents[root].get();
            if up == root {
                break;
            }
            root = up;
        }
        // second pass: point everything on the walk straight at the root
        let mut cursor = x;
        while cursor != root {
            let up = self.parents[cursor].get();
            self.parents[cursor].set(root);
            cursor = up;
        }
        root
    }

    /// Joins the classes of `a` and `b`; the lower root wins.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return root_a;
        }
        let (lo, hi) = if root_a < root_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parents[hi].set(lo);
        lo
    }

    /// All class representatives, ascending.
    pub fn roots(&self) -> Vec<usize> {
        (0..self.len()).filter(|&x| self.find(x) == x).collect()
    }
}
