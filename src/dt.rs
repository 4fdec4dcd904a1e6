//! Dowker–Thistlethwaite sequences.
//!
//! A DT sequence pairs the `2N` positions of a closed walk through an
//! `N`-node 4-valent graph into `N` (even, odd) pairs; it is the chord
//! diagram of the walk. Everything downstream — realizability, PD codes,
//! circuit enumeration — consumes these sequences.

use ahash::AHashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DtError {
    #[error("sequence has no pairs")]
    Empty,
    #[error("pair ({even}, {odd}) must list an even label before an odd label")]
    Parity { even: usize, odd: usize },
    #[error("label {label} out of range for {pairs} pairs")]
    Range { label: usize, pairs: usize },
    #[error("label {0} appears more than once")]
    Duplicate(usize),
}

/// One node of a DT sequence: the two walk positions at which the strand
/// passes through the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DtPair {
    even: usize,
    odd: usize,
}

impl DtPair {
    pub fn new(even: usize, odd: usize) -> Result<Self, DtError> {
        if even % 2 != 0 || odd % 2 != 1 {
            return Err(DtError::Parity { even, odd });
        }
        Ok(DtPair { even, odd })
    }

    pub fn even(&self) -> usize {
        self.even
    }

    pub fn odd(&self) -> usize {
        self.odd
    }

    pub fn min_label(&self) -> usize {
        self.even.min(self.odd)
    }
}

/// A validated DT sequence: `N` pairs whose labels are a bijection on
/// `{0, …, 2N - 1}` with one even and one odd member per pair.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DtSequence {
    pairs: Vec<DtPair>,
}

impl DtSequence {
    pub fn new(pairs: Vec<DtPair>) -> Result<Self, DtError> {
        if pairs.is_empty() {
            return Err(DtError::Empty);
        }
        let modulus = 2 * pairs.len();
        let mut seen = AHashSet::with_capacity(modulus);
        for pair in &pairs {
            for label in [pair.even, pair.odd] {
                if label >= modulus {
                    return Err(DtError::Range {
                        label,
                        pairs: pairs.len(),
                    });
                }
                if !seen.insert(label) {
                    return Err(DtError::Duplicate(label));
                }
            }
        }
        Ok(DtSequence { pairs })
    }

    pub fn from_labels(pairs: &[(usize, usize)]) -> Result<Self, DtError> {
        Self::new(
            pairs
                .iter()
                .map(|&(even, odd)| DtPair::new(even, odd))
                .collect::<Result<_, _>>()?,
        )
    }

    /// Number of pairs (nodes).
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of labels, `2N`; the modulus for all label arithmetic.
    pub fn modulus(&self) -> usize {
        2 * self.pairs.len()
    }

    pub fn pairs(&self) -> &[DtPair] {
        &self.pairs
    }

    /// Partner table of the label involution `a`: `table[x]` is the label
    /// sharing a node with `x`.
    pub fn involution(&self) -> Vec<usize> {
        let mut table = vec![0; self.modulus()];
        for pair in &self.pairs {
            table[pair.even] = pair.odd;
            table[pair.odd] = pair.even;
        }
        table
    }

    /// Relabels every label as `(x + b) mod 2N` and re-sorts the pairs by
    /// even label. An odd shift lands even labels on odd ones, so the two
    /// members of every pair swap roles.
    pub fn rotate(&self, b: usize) -> DtSequence {
        let m = self.modulus();
        let b = b % m;
        self.relabeled(|x| (x + b) % m, b % 2 == 1)
    }

    /// Relabels every label as `(b - x) mod 2N`, the reflection of the walk,
    /// and re-sorts the pairs by even label. An odd `b` swaps the members of
    /// every pair.
    pub fn reflect(&self, b: usize) -> DtSequence {
        let m = self.modulus();
        let b = b % m;
        self.relabeled(|x| (b + m - x) % m, b % 2 == 1)
    }

    fn relabeled(&self, map: impl Fn(usize) -> usize, swap: bool) -> DtSequence {
        let mut pairs: Vec<DtPair> = self
            .pairs
            .iter()
            .map(|pair| {
                let (a, b) = (map(pair.even), map(pair.odd));
                if swap {
                    DtPair { even: b, odd: a }
                } else {
                    DtPair { even: a, odd: b }
                }
            })
            .collect();
        pairs.sort_by_key(|pair| pair.even);
        DtSequence { pairs }
    }
}
