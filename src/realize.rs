//! Realizability of DT sequences.
//!
//! A DT sequence is realizable when its chord diagram embeds in the plane
//! with consistent strand orientations. The test propagates a sign function
//! `f` outward from the lowest label: for each active node `i` it builds a
//! local sign walk φ over all labels — flipping wherever a partner label
//! falls inside the interval `[i, a(i)]` — and uses φ products to orient the
//! chords that straddle the interval. A forced sign disagreement means the
//! sequence is not realizable; that outcome is a result, not an error.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::diagram::SignOrZero;
use crate::dt::DtSequence;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RealizeError {
    #[error("sign product {0} outside {{+1, -1}} during propagation")]
    SignPropagation(i8),
}

/// The orientation function `f` over labels. Labels the propagation never
/// visited stay at [`SignOrZero::Zero`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientations {
    values: Vec<i8>,
}

impl Orientations {
    pub fn get(&self, label: usize) -> SignOrZero {
        match self.values.get(label) {
            Some(1) => SignOrZero::Plus,
            Some(-1) => SignOrZero::Minus,
            _ => SignOrZero::Zero,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every label received a sign.
    pub fn fully_resolved(&self) -> bool {
        self.values.iter().all(|value| *value != 0)
    }
}

/// Whether the sequence is realizable as a planar diagram.
pub fn is_realizable(seq: &DtSequence) -> Result<bool, RealizeError> {
    Ok(orientations(seq)?.is_some())
}

/// Runs the realizability propagation; `None` means not realizable.
pub fn orientations(seq: &DtSequence) -> Result<Option<Orientations>, RealizeError> {
    let m = seq.modulus();
    let partner = seq.involution();

    let seed = seq.pairs()[0].min_label();
    let mut f = vec![0i8; m];
    f[seed] = 1;
    f[partner[seed]] = -1;
    let mut active = vec![seed];

    while let Some(&i) = active.iter().min() {
        // active labels are always the lesser of their pair, so the
        // interval [i, a(i)] never wraps
        let ai = partner[i];
        debug_assert!(i < ai);
        let inside = |x: usize| x >= i && x <= ai;

        let mut phi = vec![0i8; m];
        phi[i] = 1;
        let mut y = (i + 1) % m;
        while y != i {
            let prev = phi[(y + m - 1) % m];
            phi[y] = if inside(partner[y]) { -prev } else { prev };
            y = (y + 1) % m;
        }

        let mut pending: BTreeSet<usize> = (0..m).filter(|&x| !inside(x)).collect();
        while let Some(&x) = pending.iter().next() {
            pending.remove(&x);
            let ax = partner[x];
            if x < i {
                if inside(ax) {
                    let product = phi[x] * phi[ax] * f[i];
                    if f[x] == 0 {
                        f[x] = product;
                        f[ax] = -product;
                        if starts_new_run(&partner, m, x) {
                            active.push(x.min(ax));
                        }
                    } else if product == -f[x] {
                        return Ok(None);
                    }
                } else {
                    // chord entirely below the interval: its ends must
                    // already agree
                    match phi[x] * phi[ax] {
                        1 => {
                            pending.remove(&ax);
                        }
                        -1 => return Ok(None),
                        product => return Err(RealizeError::SignPropagation(product)),
                    }
                }
            } else if inside(ax) {
                // above the interval the sign is only ever set, never
                // re-checked
                if f[x] == 0 {
                    let product = phi[x] * phi[ax] * f[i];
                    f[x] = product;
                    f[ax] = -product;
                    if starts_new_run(&partner, m, x) {
                        active.push(x.min(ax));
                    }
                }
            } else {
                pending.remove(&ax);
            }
        }

        if let Some(slot) = active.iter().position(|&label| label == i) {
            active.remove(slot);
        }
    }

    Ok(Some(Orientations { values: f }))
}

/// A freshly oriented chord reopens propagation unless it merely continues
/// the run of its neighbor, i.e. unless `a(x - 1)` immediately follows
/// `a(x)`.
fn starts_new_run(partner: &[usize], m: usize, x: usize) -> bool {
    (partner[(x + m - 1) % m] + m - partner[x]) % m != 1
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::diagram::SignOrZero;
    use crate::dt::DtSequence;

    fn signs(orientations: &Orientations) -> Vec<i8> {
        (0..orientations.len())
            .map(|label| match orientations.get(label) {
                SignOrZero::Plus => 1,
                SignOrZero::Minus => -1,
                SignOrZero::Zero => 0,
            })
            .collect()
    }

    #[test]
    fn trefoil_is_realizable() {
        let seq = DtSequence::from_labels(&[(0, 3), (2, 5), (4, 1)]).unwrap();
        let f = orientations(&seq).unwrap().unwrap();
        assert_eq!(signs(&f), vec![1, -1, 1, -1, 1, -1]);
        assert!(f.fully_resolved());
    }

    #[test]
    fn five_node_torus_sequence_is_realizable() {
        let seq =
            DtSequence::from_labels(&[(0, 5), (2, 7), (4, 9), (6, 1), (8, 3)]).unwrap();
        let f = orientations(&seq).unwrap().unwrap();
        assert_eq!(signs(&f), vec![1, -1, 1, -1, 1, -1, 1, -1, 1, -1]);
    }

    #[test]
    fn four_node_sequences_resolve() {
        let seq =
            DtSequence::from_labels(&[(0, 5), (2, 7), (4, 1), (6, 3)]).unwrap();
        let f = orientations(&seq).unwrap().unwrap();
        assert_eq!(signs(&f), vec![1, -1, -1, 1, 1, -1, -1, 1]);

        let seq =
            DtSequence::from_labels(&[(0, 3), (2, 7), (4, 1), (6, 5)]).unwrap();
        let f = orientations(&seq).unwrap().unwrap();
        assert_eq!(signs(&f), vec![1, -1, 1, -1, 1, 0, 0, -1]);
        assert!(!f.fully_resolved());
    }

    #[test]
    fn five_node_sequence_is_not_realizable() {
        let seq =
            DtSequence::from_labels(&[(0, 5), (2, 9), (4, 7), (6, 3), (8, 1)]).unwrap();
        assert_eq!(orientations(&seq).unwrap(), None);
        assert!(!is_realizable(&seq).unwrap());
    }

    #[test]
    fn nested_chords_leave_inner_node_unresolved() {
        let seq = DtSequence::from_labels(&[(0, 3), (2, 1)]).unwrap();
        let f = orientations(&seq).unwrap().unwrap();
        assert_eq!(signs(&f), vec![1, 0, 0, -1]);
    }

    #[test]
    fn realizability_is_relabeling_invariant_for_fixed_cases() {
        let realizable =
            DtSequence::from_labels(&[(0, 5), (2, 7), (4, 9), (6, 1), (8, 3)]).unwrap();
        let unrealizable =
            DtSequence::from_labels(&[(0, 5), (2, 9), (4, 7), (6, 3), (8, 1)]).unwrap();
        for b in 0..realizable.modulus() {
            assert!(is_realizable(&realizable.rotate(b)).unwrap());
            assert!(is_realizable(&realizable.reflect(b)).unwrap());
            assert!(!is_realizable(&unrealizable.rotate(b)).unwrap());
            assert!(!is_realizable(&unrealizable.reflect(b)).unwrap());
        }
    }
}
