//! Bracket state sums over a diagram's crossings.
//!
//! The evaluator takes an oriented edge-path — one or more disjoint cyclic
//! dart segments covering the diagram — together with the PD rows of its
//! crossings, and produces the diagram's writhe plus the multiset of states
//! reached by resolving every crossing into its two smoothings. States are
//! recorded with multiplicity: a diagram with `K` crossings always yields
//! exactly `2^K` of them, and duplicates are meaningful. No polynomial is
//! assembled here; the state multiset is the output.

use itertools::Itertools;
use thiserror::Error;

use crate::diagram::Dart;

#[cfg(test)]
mod test;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    #[error("dart {0} does not occur in the edge path")]
    DartNotFound(Dart),
    #[error("crossing {0:?} has no consistent connectivity in the edge path")]
    Unconnected([Dart; 4]),
}

/// A set of disjoint cyclic dart segments — together, the closed walks of a
/// diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgePath {
    pub segments: Vec<Vec<Dart>>,
}

impl EdgePath {
    pub fn new(segments: Vec<Vec<Dart>>) -> Self {
        EdgePath { segments }
    }

    pub fn from_labels(segments: &[&[usize]]) -> Self {
        EdgePath {
            segments: segments
                .iter()
                .map(|segment| segment.iter().copied().map(Dart).collect())
                .collect(),
        }
    }

    /// Number of disjoint closed walks.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn locate(&self, dart: Dart) -> Option<SegmentSlot> {
        self.segments.iter().enumerate().find_map(|(seg, darts)| {
            darts
                .iter()
                .find_position(|&&d| d == dart)
                .map(|(pos, _)| SegmentSlot { seg, pos })
        })
    }
}

/// Where a dart sits in an edge-path: which segment, and at which index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SegmentSlot {
    seg: usize,
    pos: usize,
}

/// How one crossing's darts connect along the edge-path: the slot of each
/// dart (in row order) and the two traversal links between them.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Connectivity {
    slots: [SegmentSlot; 4],
    links: [(Dart, Dart); 2],
}

impl Connectivity {
    fn has_link(&self, from: Dart, to: Dart) -> bool {
        self.links.contains(&(from, to))
    }
}

/// Finds the two connection pairs of a crossing in the edge-path.
///
/// The leading dart pairs with one of its cyclic neighbors; the forward
/// neighbor is tried first, but when the two leftover darts of that pairing
/// are not themselves adjacent the choice is retracted in favor of the
/// backward neighbor. Failing both ways means the path does not actually
/// traverse the crossing.
fn connectivity(path: &EdgePath, row: &[Dart; 4]) -> Result<Connectivity, BracketError> {
    let lead = row[0];
    let lead_slot = path.locate(lead).ok_or(BracketError::DartNotFound(lead))?;
    let segment = &path.segments[lead_slot.seg];
    let len = segment.len();
    let forward_pos = (lead_slot.pos + 1) % len;
    let backward_pos = (lead_slot.pos + len - 1) % len;

    for (neighbor_pos, forward) in [(forward_pos, true), (backward_pos, false)] {
        let neighbor = segment[neighbor_pos];
        let Some(neighbor_row_slot) = row[1..].iter().position(|&d| d == neighbor) else {
            continue;
        };
        let neighbor_row_slot = neighbor_row_slot + 1;

        let mut slots = [lead_slot; 4];
        slots[neighbor_row_slot] = SegmentSlot {
            seg: lead_slot.seg,
            pos: neighbor_pos,
        };
        let first_link = if forward {
            (lead, neighbor)
        } else {
            (neighbor, lead)
        };

        // the two leftover darts must be adjacent as well, in either order
        let mut leftover = (1..4).filter(|&slot| slot != neighbor_row_slot);
        let (Some(first), Some(second)) = (leftover.next(), leftover.next()) else {
            continue;
        };
        let (da, db) = (row[first], row[second]);
        let da_slot = path.locate(da).ok_or(BracketError::DartNotFound(da))?;
        let other = &path.segments[da_slot.seg];
        let other_len = other.len();

        let second_link;
        let db_pos;
        if other[(da_slot.pos + 1) % other_len] == db {
            db_pos = (da_slot.pos + 1) % other_len;
            second_link = (da, db);
        } else if other[(da_slot.pos + other_len - 1) % other_len] == db {
            db_pos = (da_slot.pos + other_len - 1) % other_len;
            second_link = (db, da);
        } else {
            continue;
        }
        slots[first] = da_slot;
        slots[second] = SegmentSlot {
            seg: da_slot.seg,
            pos: db_pos,
        };

        return Ok(Connectivity {
            slots,
            links: [first_link, second_link],
        });
    }

    Err(BracketError::Unconnected(*row))
}

/// One fully resolved smoothing state: how many crossings took each
/// smoothing, and how many disjoint loops remain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateTriple {
    pub a: usize,
    pub b: usize,
    pub loops: usize,
}

/// Writhe plus the multiset of smoothing states.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BracketSum {
    pub writhe: i64,
    pub states: Vec<StateTriple>,
}

/// Signed crossing count of the oriented diagram: an over strand running
/// right-to-left across the under strand counts −1, left-to-right +1.
pub fn writhe(path: &EdgePath, rows: &[[Dart; 4]]) -> Result<i64, BracketError> {
    let mut total = 0i64;
    for row in rows {
        let conn = connectivity(path, row)?;
        if conn.has_link(row[1], row[3]) {
            total -= 1;
        } else if conn.has_link(row[3], row[1]) {
            total += 1;
        }
    }
    Ok(total)
}

struct Branch {
    path: EdgePath,
    rows: Vec<[Dart; 4]>,
    a: usize,
    b: usize,
}

/// Evaluates the full state sum of the diagram.
///
/// An explicit work queue holds partially resolved diagrams, each owning its
/// own edge-path copy; resolving one crossing pushes both smoothings back.
/// The search is exhaustive by construction — every queue entry eventually
/// lands in the state list.
pub fn bracket_sum(path: &EdgePath, rows: &[[Dart; 4]]) -> Result<BracketSum, BracketError> {
    let writhe = writhe(path, rows)?;

    let mut queue = vec![Branch {
        path: path.clone(),
        rows: rows.to_vec(),
        a: 0,
        b: 0,
    }];
    let mut states = Vec::new();

    while let Some(mut branch) = queue.pop() {
        let Some(mut row) = branch.rows.pop() else {
            states.push(StateTriple {
                a: branch.a,
                b: branch.b,
                loops: branch.path.len(),
            });
            continue;
        };

        let mut conn = connectivity(&branch.path, &row)?;
        // a reversed stretch of the walk can present the under strand
        // backwards; renormalize so it reads d0 -> d2
        if conn.has_link(row[2], row[0]) {
            row = [row[2], row[3], row[0], row[1]];
            conn.slots = [conn.slots[2], conn.slots[3], conn.slots[0], conn.slots[1]];
        }

        let (a_path, b_path) = if conn.has_link(row[1], row[3]) {
            resolve(&branch.path, &row, &conn.slots, Handedness::RightToLeft)?
        } else if conn.has_link(row[3], row[1]) {
            resolve(&branch.path, &row, &conn.slots, Handedness::LeftToRight)?
        } else {
            return Err(BracketError::Unconnected(row));
        };

        queue.push(Branch {
            path: a_path,
            rows: branch.rows.clone(),
            a: branch.a + 1,
            b: branch.b,
        });
        queue.push(Branch {
            path: b_path,
            rows: branch.rows,
            a: branch.a,
            b: branch.b + 1,
        });
    }

    Ok(BracketSum { writhe, states })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Handedness {
    RightToLeft,
    LeftToRight,
}

/// Computes the two smoothed edge-paths for one crossing. The two
/// handednesses mirror each other: what the A-smoothing does to one, the
/// B-smoothing does to the other.
fn resolve(
    path: &EdgePath,
    row: &[Dart; 4],
    slots: &[SegmentSlot; 4],
    handedness: Handedness,
) -> Result<(EdgePath, EdgePath), BracketError> {
    let same_segment = slots[0].seg == slots[1].seg;
    match (handedness, same_segment) {
        (Handedness::RightToLeft, true) => Ok((
            reconnect_within(path, slots[3].pos, slots[0].pos, slots[0].seg),
            split_segment(
                path.clone(),
                slots[0].seg,
                slots[2].pos,
                slots[1].pos,
                slots[3].pos,
                slots[0].pos,
            ),
        )),
        (Handedness::RightToLeft, false) => Ok((
            sew_reversed(path, row, slots, slots[3].pos, slots[1].pos)?,
            sew_segments(
                path.clone(),
                slots[0].seg,
                slots[1].seg,
                slots[2].pos,
                slots[0].pos,
                slots[3].pos,
                slots[1].pos,
            ),
        )),
        (Handedness::LeftToRight, true) => Ok((
            split_segment(
                path.clone(),
                slots[0].seg,
                slots[2].pos,
                slots[3].pos,
                slots[1].pos,
                slots[0].pos,
            ),
            reconnect_outside(path, slots[1].pos, slots[0].pos, slots[0].seg),
        )),
        (Handedness::LeftToRight, false) => Ok((
            sew_segments(
                path.clone(),
                slots[0].seg,
                slots[1].seg,
                slots[2].pos,
                slots[0].pos,
                slots[1].pos,
                slots[3].pos,
            ),
            sew_reversed(path, row, slots, slots[1].pos, slots[3].pos)?,
        )),
    }
}

/// The slice of `segment` from `start` to `stop` inclusive, wrapping past
/// the end when `stop` precedes `start`.
fn cyclic_slice(segment: &[Dart], start: usize, stop: usize) -> Vec<Dart> {
    if start < stop {
        segment[start..=stop].to_vec()
    } else {
        [&segment[start..], &segment[..=stop]].concat()
    }
}

/// Splits one segment `… a, b, … c, d …` into `[a..d]` and `[b..c]`.
/// The index arguments are `b`, `c`, `d`, `a` in that order.
fn split_segment(
    mut path: EdgePath,
    seg: usize,
    start_1: usize,
    stop_1: usize,
    start_2: usize,
    stop_2: usize,
) -> EdgePath {
    let segment = path.segments.remove(seg);
    path.segments.push(cyclic_slice(&segment, start_1, stop_1));
    path.segments.push(cyclic_slice(&segment, start_2, stop_2));
    path
}

/// Joins two segments `[a, b …]` and `[c, d …]` into `[a..d-slice, c..b-slice]`.
/// The index arguments are `b`, `a` in the first segment and `d`, `c` in the
/// second.
fn sew_segments(
    mut path: EdgePath,
    seg_1: usize,
    seg_2: usize,
    start_1: usize,
    stop_1: usize,
    start_2: usize,
    stop_2: usize,
) -> EdgePath {
    debug_assert_ne!(seg_1, seg_2);
    let mut joined = cyclic_slice(&path.segments[seg_1], start_1, stop_1);
    joined.extend(cyclic_slice(&path.segments[seg_2], start_2, stop_2));
    let (hi, lo) = if seg_1 > seg_2 {
        (seg_1, seg_2)
    } else {
        (seg_2, seg_1)
    };
    path.segments.remove(hi);
    path.segments.remove(lo);
    path.segments.push(joined);
    path
}

/// Reconnects a crossing whose strands share a segment by reversing the
/// stretch between `from` and `to` and stitching it ahead of the rest.
fn reconnect_within(path: &EdgePath, from: usize, to: usize, seg: usize) -> EdgePath {
    let segment = &path.segments[seg];
    let mut out = path.clone();
    out.segments.remove(seg);

    let mut head;
    let tail;
    if from < to {
        head = segment[from..=to].to_vec();
        head.reverse();
        tail = [&segment[to + 1..], &segment[..from]].concat();
    } else {
        head = [&segment[from..], &segment[..=to]].concat();
        head.reverse();
        tail = segment[to + 1..from].to_vec();
    }
    head.extend(tail);
    out.segments.push(head);
    out
}

/// The mirror reconnection: the stretch between `from` and `to` reverses in
/// place, the rest of the segment staying where it was.
fn reconnect_outside(path: &EdgePath, from: usize, to: usize, seg: usize) -> EdgePath {
    let segment = &path.segments[seg];
    let mut out = path.clone();
    out.segments.remove(seg);

    let rebuilt;
    if from < to {
        let mut middle = segment[from..=to].to_vec();
        middle.reverse();
        rebuilt = [&segment[..from], &middle[..], &segment[to + 1..]].concat();
    } else {
        let mut wrapped = [&segment[from..], &segment[..=to]].concat();
        wrapped.reverse();
        rebuilt = [&segment[to + 1..from], &wrapped[..]].concat();
    }
    out.segments.push(rebuilt);
    out
}

/// Smooths a crossing whose strands lie on different segments by reversing
/// the under-strand segment (rotated to start at `d2`) and sewing it onto
/// the over-strand segment.
fn sew_reversed(
    path: &EdgePath,
    row: &[Dart; 4],
    slots: &[SegmentSlot; 4],
    start_1: usize,
    stop_1: usize,
) -> Result<EdgePath, BracketError> {
    let segment = &path.segments[slots[0].seg];
    let mut out = path.clone();
    out.segments.remove(slots[0].seg);

    let mut reversed = [&segment[slots[2].pos..], &segment[..slots[2].pos]].concat();
    reversed.reverse();
    let d0_pos = reversed
        .iter()
        .position(|&d| d == row[0])
        .ok_or(BracketError::DartNotFound(row[0]))?;
    let d2_pos = reversed
        .iter()
        .position(|&d| d == row[2])
        .ok_or(BracketError::DartNotFound(row[2]))?;
    out.segments.push(reversed);

    let over_seg = out
        .segments
        .iter()
        .position(|segment| segment.contains(&row[1]))
        .ok_or(BracketError::DartNotFound(row[1]))?;
    let last = out.segments.len() - 1;
    Ok(sew_segments(out, over_seg, last, start_1, stop_1, d0_pos, d2_pos))
}
