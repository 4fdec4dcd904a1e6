//! Planar-diagram codes.
//!
//! A PD code lists, per node, the four half-edges ("darts") incident to it,
//! counter-clockwise from the incoming under-strand dart, together with a
//! signed node type. Darts double the DT labels — the node with pair
//! `(e, o)` owns darts `2e, 2e+1, 2o, 2o+1` — so self-loops stay
//! unambiguous. Even darts enter their node and odd darts leave it in the
//! reference orientation of the walk.

use std::fmt::Display;
use std::ops::{Mul, Neg};

use derive_more::{From, Into};
use itertools::Itertools;
use thiserror::Error;

use crate::dt::DtSequence;
use crate::realize::Orientations;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("invalid value for Sign")]
    InvalidValue,
    #[error("zero is not a valid value for Sign")]
    ZeroValue,
}

/// A strand-orientation sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn is_positive(&self) -> bool {
        matches!(self, Sign::Plus)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Sign::Minus)
    }
}

impl Neg for Sign {
    type Output = Sign;
    fn neg(self) -> Sign {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }
}

impl Mul for Sign {
    type Output = Sign;
    fn mul(self, rhs: Sign) -> Sign {
        if self == rhs {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }
}

impl TryFrom<i8> for Sign {
    type Error = SignError;
    fn try_from(value: i8) -> Result<Self, SignError> {
        match value {
            1 => Ok(Sign::Plus),
            -1 => Ok(Sign::Minus),
            0 => Err(SignError::ZeroValue),
            _ => Err(SignError::InvalidValue),
        }
    }
}

impl From<Sign> for i8 {
    fn from(value: Sign) -> i8 {
        match value {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
        }
    }
}

/// A sign that may still be unresolved.
#[repr(i8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignOrZero {
    Zero = 0,
    Plus = 1,
    Minus = -1,
}

impl SignOrZero {
    pub fn is_zero(&self) -> bool {
        matches!(self, SignOrZero::Zero)
    }

    pub fn is_sign(&self) -> bool {
        !self.is_zero()
    }
}

impl From<Sign> for SignOrZero {
    fn from(value: Sign) -> Self {
        match value {
            Sign::Plus => SignOrZero::Plus,
            Sign::Minus => SignOrZero::Minus,
        }
    }
}

impl TryFrom<SignOrZero> for Sign {
    type Error = SignError;
    fn try_from(value: SignOrZero) -> Result<Self, SignError> {
        match value {
            SignOrZero::Plus => Ok(Sign::Plus),
            SignOrZero::Minus => Ok(Sign::Minus),
            SignOrZero::Zero => Err(SignError::ZeroValue),
        }
    }
}

impl Display for SignOrZero {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignOrZero::Zero => write!(f, "."),
            SignOrZero::Plus => write!(f, "+"),
            SignOrZero::Minus => write!(f, "-"),
        }
    }
}

/// A half-edge identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dart(pub usize);

impl Display for Dart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeIndex(pub usize);

impl Display for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Crossing,
    Vertex,
}

/// The signed type of a PD node. On builder input the sign says which label
/// carries the over-strand (upper edge): `Plus` puts it on the even label.
/// On PD-code output the sign is derived from the orientation function
/// instead. The i8 encoding is ±1 for crossings and ±2 for vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeType {
    pub kind: NodeKind,
    pub sign: Sign,
}

impl NodeType {
    pub fn crossing(sign: Sign) -> Self {
        NodeType {
            kind: NodeKind::Crossing,
            sign,
        }
    }

    pub fn vertex(sign: Sign) -> Self {
        NodeType {
            kind: NodeKind::Vertex,
            sign,
        }
    }

    pub fn is_crossing(&self) -> bool {
        matches!(self.kind, NodeKind::Crossing)
    }

    /// Row slots holding outgoing darts, in the reference orientation.
    pub fn outgoing_slots(&self) -> [usize; 2] {
        match self.sign {
            Sign::Plus => [2, 3],
            Sign::Minus => [1, 2],
        }
    }
}

impl TryFrom<i8> for NodeType {
    type Error = SignError;
    fn try_from(value: i8) -> Result<Self, SignError> {
        let kind = match value.abs() {
            1 => NodeKind::Crossing,
            2 => NodeKind::Vertex,
            _ => return Err(SignError::InvalidValue),
        };
        Ok(NodeType {
            kind,
            sign: Sign::try_from(value.signum())?,
        })
    }
}

impl From<NodeType> for i8 {
    fn from(value: NodeType) -> i8 {
        let magnitude = match value.kind {
            NodeKind::Crossing => 1,
            NodeKind::Vertex => 2,
        };
        magnitude * i8::from(value.sign)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("PD code has {rows} rows but {types} node types")]
    Mismatch { rows: usize, types: usize },
    #[error("orientation is unresolved at label {0}")]
    UnsetOrientation(usize),
    #[error("half-edge {dart} does not appear exactly once in {rows} rows")]
    DartCoverage { dart: usize, rows: usize },
}

/// A planar-diagram code: per-node dart rows and the parallel type list.
/// The rows of a valid code partition the darts `0..4N`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PdCode {
    rows: Vec<[Dart; 4]>,
    types: Vec<NodeType>,
}

impl PdCode {
    pub fn new(rows: Vec<[Dart; 4]>, types: Vec<NodeType>) -> Result<Self, DiagramError> {
        if rows.len() != types.len() {
            return Err(DiagramError::Mismatch {
                rows: rows.len(),
                types: types.len(),
            });
        }
        let mut seen = vec![false; 4 * rows.len()];
        for dart in rows.iter().flatten() {
            match seen.get_mut(dart.0) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(DiagramError::DartCoverage {
                        dart: dart.0,
                        rows: rows.len(),
                    })
                }
            }
        }
        Ok(PdCode { rows, types })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_darts(&self) -> usize {
        4 * self.rows.len()
    }

    pub fn rows(&self) -> &[[Dart; 4]] {
        &self.rows
    }

    pub fn types(&self) -> &[NodeType] {
        &self.types
    }
}

/// Builds the PD code of a realized DT sequence.
///
/// `node_types` gives each node's kind and over-strand sign; `orientations`
/// is the completed orientation function from [`crate::realize`]. Each
/// node's row is one of four arrangements of its doubled labels, selected by
/// the over-strand sign and the orientation at the even label; the rows are
/// then sorted by leading dart so equal inputs always produce identical
/// codes.
pub fn planar_diagram(
    seq: &DtSequence,
    node_types: &[NodeType],
    orientations: &Orientations,
) -> Result<PdCode, DiagramError> {
    if seq.len() != node_types.len() {
        return Err(DiagramError::Mismatch {
            rows: seq.len(),
            types: node_types.len(),
        });
    }

    let mut entries: Vec<([Dart; 4], NodeType)> = Vec::with_capacity(seq.len());
    for (pair, ty) in seq.pairs().iter().zip(node_types) {
        let f = Sign::try_from(orientations.get(pair.even()))
            .map_err(|_| DiagramError::UnsetOrientation(pair.even()))?;
        let e = 2 * pair.even();
        let o = 2 * pair.odd();
        let row = match (ty.sign, f) {
            // over-strand on the odd label
            (Sign::Minus, Sign::Plus) => [e, o, e + 1, o + 1],
            (Sign::Minus, Sign::Minus) => [e, o + 1, e + 1, o],
            // over-strand on the even label
            (Sign::Plus, Sign::Plus) => [o, e + 1, o + 1, e],
            (Sign::Plus, Sign::Minus) => [o, e, o + 1, e + 1],
        };
        let sign = match f {
            Sign::Plus => -ty.sign,
            Sign::Minus => ty.sign,
        };
        entries.push((row.map(Dart), NodeType { kind: ty.kind, sign }));
    }

    let (rows, types) = entries
        .into_iter()
        .sorted_by_key(|(row, _)| row[0])
        .unzip();
    PdCode::new(rows, types)
}
