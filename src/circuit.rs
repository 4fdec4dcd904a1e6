//! Eulerian circuits of a knotted 4-valent graph.
//!
//! Every Eulerian circuit through the graph resolves each vertex one of two
//! ways — passing straight through or turning — and thereby induces a knot
//! diagram. The enumerator walks the graph depth-first over an explicit
//! stack of walker states (one independently owned copy per branch, so the
//! search depth is bounded by the diagram, not the call stack), closes
//! finished edges back into the circuit while backtracking, and keeps one
//! representative per circuit up to rotation and reversal, always paired
//! with its edge-reversed twin.

use bitvec::vec::BitVec;
use thiserror::Error;

use crate::diagram::{Dart, NodeIndex, NodeType, PdCode};

pub mod induced;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error("dart {dart} is not incident to node {node}")]
    DartNotIncident { dart: Dart, node: NodeIndex },
    #[error("walk underflow while backtracking")]
    WalkUnderflow,
    #[error("circuit covers {found} darts, expected {expected}")]
    IncompleteCircuit { found: usize, expected: usize },
    #[error("dart {0} does not appear in the circuit")]
    DartNotInCircuit(Dart),
    #[error("under-strand darts of node {node} are not consecutive in the circuit")]
    SplitUnderStrand { node: NodeIndex },
}

/// One finished Eulerian circuit: the closed dart walk plus the PD rows as
/// oriented along that walk.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circuit {
    epath: Vec<Dart>,
    rows: Vec<[Dart; 4]>,
    types: Vec<NodeType>,
}

impl Circuit {
    pub fn epath(&self) -> &[Dart] {
        &self.epath
    }

    pub fn rows(&self) -> &[[Dart; 4]] {
        &self.rows
    }

    pub fn types(&self) -> &[NodeType] {
        &self.types
    }

    /// The same circuit with every edge reversed: the walk runs backwards
    /// from its fixed first dart and each row flips to `(c, d, a, b)`. Node
    /// types keep their signs, since both strands reverse together.
    pub fn reversed(&self) -> Circuit {
        if self.epath.is_empty() {
            return self.clone();
        }
        let mut epath = Vec::with_capacity(self.epath.len());
        epath.push(self.epath[0]);
        epath.extend(self.epath[1..].iter().rev());
        Circuit {
            epath,
            rows: self.rows.iter().map(|row| flip(row)).collect(),
            types: self.types.clone(),
        }
    }
}

fn flip(row: &[Dart; 4]) -> [Dart; 4] {
    [row[2], row[3], row[0], row[1]]
}

fn slot_of(row: &[Dart; 4], dart: Dart, node: NodeIndex) -> Result<usize, CircuitError> {
    row.iter()
        .position(|&d| d == dart)
        .ok_or(CircuitError::DartNotIncident { dart, node })
}

/// The mutable traversal state of one DFS branch.
#[derive(Clone, Debug)]
struct Walker {
    rows: Vec<[Dart; 4]>,
    types: Vec<NodeType>,
    dart_node: Vec<NodeIndex>,
    used: BitVec,
    cpath: Vec<Dart>,
    epath: Vec<Dart>,
    current_node: NodeIndex,
    current_dart: Dart,
    available: Vec<Dart>,
}

impl Walker {
    fn new(pd: &PdCode) -> Result<Self, CircuitError> {
        let rows = pd.rows().to_vec();
        let types = pd.types().to_vec();
        let num_darts = pd.num_darts();

        let mut dart_node = vec![NodeIndex(0); num_darts];
        for (node, row) in rows.iter().enumerate() {
            for dart in row {
                dart_node[dart.0] = NodeIndex(node);
            }
        }

        let start = rows[0].iter().copied().min().unwrap_or(rows[0][0]);
        let mut walker = Walker {
            rows,
            types,
            dart_node,
            used: BitVec::repeat(false, num_darts),
            cpath: Vec::new(),
            epath: Vec::new(),
            current_node: NodeIndex(0),
            current_dart: start,
            available: Vec::new(),
        };
        // the start dart stays unconsumed; its edge closes the circuit
        walker.available = walker.exits_from(NodeIndex(0), start)?;
        Ok(walker)
    }

    /// Darts the walk may leave `node` through after entering along `entry`.
    /// A crossing only offers the dart opposite the entry; a vertex offers
    /// every unconsumed dart.
    fn exits_from(&self, node: NodeIndex, entry: Dart) -> Result<Vec<Dart>, CircuitError> {
        let row = &self.rows[node.0];
        if self.types[node.0].is_crossing() {
            let slot = slot_of(row, entry, node)?;
            let opposite = row[(slot + 2) % 4];
            if self.used[opposite.0] {
                Ok(Vec::new())
            } else {
                Ok(vec![opposite])
            }
        } else {
            Ok(row
                .iter()
                .copied()
                .filter(|dart| *dart != entry && !self.used[dart.0])
                .collect())
        }
    }

    /// The partner dart on the same edge. Whether a dart leaves its node in
    /// the reference orientation decides the ±1 label offset.
    fn partner(&self, dart: Dart) -> Result<Dart, CircuitError> {
        let node = self.dart_node[dart.0];
        let slot = slot_of(&self.rows[node.0], dart, node)?;
        let num_darts = self.dart_node.len();
        let outgoing = self.types[node.0].outgoing_slots().contains(&slot);
        Ok(if outgoing {
            Dart((dart.0 + 1) % num_darts)
        } else {
            Dart((dart.0 + num_darts - 1) % num_darts)
        })
    }

    /// Walks the edge starting at `dart`: both of its darts join the
    /// in-progress walk and the far node becomes current.
    fn choose(&mut self, dart: Dart) -> Result<(), CircuitError> {
        self.cpath.push(dart);
        self.used.set(dart.0, true);
        let partner = self.partner(dart)?;
        self.cpath.push(partner);
        self.used.set(partner.0, true);
        self.current_dart = partner;
        self.current_node = self.dart_node[partner.0];
        self.available = self.exits_from(self.current_node, self.current_dart)?;
        Ok(())
    }

    /// Closes the newest edge of the walk into the finished circuit and
    /// re-exposes the node behind it.
    fn backtrack(&mut self) -> Result<(), CircuitError> {
        let entry = self.cpath.pop().ok_or(CircuitError::WalkUnderflow)?;
        let exit = self.cpath.pop().ok_or(CircuitError::WalkUnderflow)?;
        self.epath.push(entry);
        self.epath.push(exit);
        self.current_dart = exit;
        self.current_node = self.dart_node[exit.0];
        self.available = self.exits_from(self.current_node, self.current_dart)?;
        Ok(())
    }

    /// Canonicalizes the finished walk: dart 0 leads, and each row is
    /// flipped unless its leading dart flows into the rest of the row along
    /// the circuit. Turns taken at vertices can reverse stretches of the
    /// walk, so rows are checked one by one rather than flipped globally.
    fn into_circuit(mut self) -> Result<Circuit, CircuitError> {
        let num_darts = self.dart_node.len();
        if self.epath.len() != num_darts {
            return Err(CircuitError::IncompleteCircuit {
                found: self.epath.len(),
                expected: num_darts,
            });
        }
        let lead = self
            .epath
            .iter()
            .position(|dart| dart.0 == 0)
            .ok_or(CircuitError::DartNotInCircuit(Dart(0)))?;
        self.epath.rotate_left(lead);

        let mut position = vec![0usize; num_darts];
        for (index, dart) in self.epath.iter().enumerate() {
            position[dart.0] = index;
        }
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let next = self.epath[(position[row[0].0] + 1) % num_darts];
                if row[1..].contains(&next) {
                    *row
                } else {
                    flip(row)
                }
            })
            .collect();

        Ok(Circuit {
            epath: self.epath,
            rows,
            types: self.types,
        })
    }
}

/// Whether two closed walks are the same circuit up to rotation and
/// reversal.
fn walks_equivalent(a: &[Dart], b: &[Dart]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let n = a.len();
    if n == 0 {
        return true;
    }
    let rotation_of = |other: &[Dart]| {
        (0..n).any(|shift| (0..n).all(|k| other[(shift + k) % n] == a[k]))
    };
    if rotation_of(b) {
        return true;
    }
    let reversed: Vec<Dart> = b.iter().rev().copied().collect();
    rotation_of(&reversed)
}

/// Enumerates every Eulerian circuit of the graph, one representative per
/// equivalence class under rotation and reversal, each followed by its
/// edge-reversed twin. The DFS is exhaustive over all vertex resolutions;
/// its cost is exponential in the vertex count, and it runs to completion
/// by design.
pub fn enumerate_circuits(pd: &PdCode) -> Result<Vec<Circuit>, CircuitError> {
    if pd.is_empty() {
        return Ok(Vec::new());
    }

    let mut stack = vec![Walker::new(pd)?];
    let mut found: Vec<Circuit> = Vec::new();

    while let Some(mut walker) = stack.pop() {
        if walker.available.is_empty() {
            walker.backtrack()?;
            while !walker.cpath.is_empty() && walker.available.is_empty() {
                walker.backtrack()?;
            }
            if !walker.cpath.is_empty() {
                stack.push(walker);
            } else if !found
                .iter()
                .any(|circuit| walks_equivalent(&circuit.epath, &walker.epath))
            {
                let circuit = walker.into_circuit()?;
                let twin = circuit.reversed();
                found.push(circuit);
                found.push(twin);
            }
        } else {
            for dart in walker.available.clone() {
                let mut branch = walker.clone();
                branch.choose(dart)?;
                stack.push(branch);
            }
        }
    }

    Ok(found)
}
