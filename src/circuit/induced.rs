//! Reduction of an Eulerian circuit to its induced knot diagram.
//!
//! Walking the circuit, consecutive darts fall into three cases: the two
//! halves of an edge between nodes (labels adjacent, different nodes), a
//! straight pass through a node (labels adjacent, same node), or a turn
//! taken at a vertex (labels not adjacent). Straight-passed nodes survive as
//! crossings of the induced knot; turned vertices disappear, their incident
//! edges merging into one strand. A union-find over the darts tracks which
//! of them end up on a common edge of the knot, and the surviving rows are
//! relabeled through the sorted class representatives.

use ahash::AHashMap;

use super::{Circuit, CircuitError};
use crate::diagram::{Dart, NodeIndex, PdCode, Sign};
use crate::union_find::UnionFind;

/// The PD code of an induced knot diagram, written over edge-class labels,
/// with the per-crossing orientation signs rederived from the circuit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InducedKnot {
    pub rows: Vec<[usize; 4]>,
    pub orientations: Vec<Sign>,
}

impl InducedKnot {
    /// Number of crossings surviving the reduction.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reduces one finished circuit to its induced knot diagram.
pub fn induced_knot(circuit: &Circuit) -> Result<InducedKnot, CircuitError> {
    let num_nodes = circuit.rows().len();
    let num_darts = 4 * num_nodes;
    if circuit.epath().len() != num_darts {
        return Err(CircuitError::IncompleteCircuit {
            found: circuit.epath().len(),
            expected: num_darts,
        });
    }

    let mut dart_node = vec![NodeIndex(0); num_darts];
    for (node, row) in circuit.rows().iter().enumerate() {
        for dart in row {
            dart_node[dart.0] = NodeIndex(node);
        }
    }
    let mut position = vec![0usize; num_darts];
    for (index, dart) in circuit.epath().iter().enumerate() {
        position[dart.0] = index;
    }

    let mut classes = UnionFind::new(num_darts);
    let mut pending: AHashMap<usize, [Dart; 4]> = circuit
        .rows()
        .iter()
        .enumerate()
        .map(|(node, row)| (node, *row))
        .collect();
    let mut rows: Vec<[Dart; 4]> = Vec::new();
    let mut orientations: Vec<Sign> = Vec::new();

    for index in 0..num_darts {
        let current = circuit.epath()[index];
        let next = circuit.epath()[(index + 1) % num_darts];
        let gap = (current.0 + num_darts - next.0) % num_darts;
        if gap == 1 || gap == num_darts - 1 {
            if dart_node[current.0] != dart_node[next.0] {
                // the two halves of an edge between nodes
                classes.union(current.0, next.0);
            } else if let Some([d0, d1, d2, d3]) = pending.remove(&dart_node[current.0].0)
            {
                // a straight pass through a still-pending node: it survives
                // as a crossing, read forward or backward according to how
                // the circuit traverses its under strand
                let node = dart_node[current.0];
                let wrap = num_darts as isize - 1;
                let under = position[d2.0] as isize - position[d0.0] as isize;
                let row = if under == 1 || under == -wrap {
                    [d0, d1, d2, d3]
                } else if under == -1 || under == wrap {
                    [d2, d3, d0, d1]
                } else {
                    return Err(CircuitError::SplitUnderStrand { node });
                };
                rows.push(row);

                // the sense of the over strand relative to the under strand
                // gives the crossing its new orientation sign
                let along = under * (position[d3.0] as isize - position[d1.0] as isize);
                orientations.push(if along == 1 || along == -wrap {
                    Sign::Plus
                } else {
                    Sign::Minus
                });

                // the over strand passes through: its darts share an edge
                classes.union(d1.0, d3.0);
            }
        } else {
            // a turn at a vertex: incoming and outgoing edges merge
            classes.union(current.0, next.0);
        }
    }

    let roots = classes.roots();
    let mut edge_label = vec![None; num_darts];
    for (label, root) in roots.iter().enumerate() {
        edge_label[*root] = Some(label);
    }

    let rows = rows
        .iter()
        .map(|row| {
            let mut out = [0usize; 4];
            for (slot, dart) in out.iter_mut().zip(row) {
                *slot = edge_label[classes.find(dart.0)]
                    .ok_or(CircuitError::DartNotInCircuit(*dart))?;
            }
            Ok(out)
        })
        .collect::<Result<_, CircuitError>>()?;

    Ok(InducedKnot { rows, orientations })
}

/// Enumerates the circuits of `pd` and reduces each to its induced knot.
pub fn induced_knots(pd: &PdCode) -> Result<Vec<InducedKnot>, CircuitError> {
    super::enumerate_circuits(pd)?
        .iter()
        .map(induced_knot)
        .collect()
}
