//! # Dowker
//!
//! Dowker is a Rust library for computing topological invariants of knotted
//! 4-valent planar graphs given as Dowker–Thistlethwaite (DT) sequences.
//!
//! Starting from a candidate sequence it can decide planar realizability,
//! build the planar-diagram (PD) code of the realized diagram, enumerate
//! every Eulerian-circuit decomposition of the underlying graph together
//! with the induced knot diagram each circuit produces, and evaluate a
//! Kauffman-bracket-style state sum (writhe plus the multiset of resolved
//! smoothing states) over a diagram's crossings.

pub mod bracket;
pub mod circuit;
pub mod diagram;
pub mod dt;
pub mod realize;
pub mod union_find;
