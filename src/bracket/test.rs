use super::*;

fn slot(seg: usize, pos: usize) -> SegmentSlot {
    SegmentSlot { seg, pos }
}

fn link(from: usize, to: usize) -> (Dart, Dart) {
    (Dart(from), Dart(to))
}

fn lookup(epath: &[&[usize]], row: [usize; 4]) -> Connectivity {
    connectivity(&EdgePath::from_labels(epath), &row.map(Dart)).unwrap()
}

fn run(epath: &[&[usize]], rows: &[[usize; 4]]) -> (i64, Vec<StateTriple>) {
    let path = EdgePath::from_labels(epath);
    let rows: Vec<[Dart; 4]> = rows.iter().map(|row| row.map(Dart)).collect();
    let sum = bracket_sum(&path, &rows).unwrap();

    // state-count conservation: 2^K states, each resolving all K crossings
    assert_eq!(sum.states.len(), 1 << rows.len());
    for state in &sum.states {
        assert_eq!(state.a + state.b, rows.len());
    }

    let mut states = sum.states;
    states.sort();
    (sum.writhe, states)
}

fn triples(expected: &[(usize, usize, usize)]) -> Vec<StateTriple> {
    let mut out: Vec<StateTriple> = expected
        .iter()
        .map(|&(a, b, loops)| StateTriple { a, b, loops })
        .collect();
    out.sort();
    out
}

//---------------------------------------------------------------------------//
// connectivity lookup

#[test]
fn lookup_forward_forward() {
    // d0 -> d1 and d2 -> d3, both adjacent in the walk
    let conn = lookup(&[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]], [0, 1, 2, 3]);
    assert_eq!(
        conn.slots,
        [slot(0, 0), slot(0, 1), slot(0, 2), slot(0, 3)]
    );
    assert_eq!(conn.links, [link(0, 1), link(2, 3)]);
}

#[test]
fn lookup_lead_pair_wraps() {
    let conn = lookup(&[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]], [11, 0, 1, 2]);
    assert_eq!(
        conn.slots,
        [slot(0, 11), slot(0, 0), slot(0, 1), slot(0, 2)]
    );
    assert_eq!(conn.links, [link(11, 0), link(1, 2)]);
}

#[test]
fn lookup_other_pair_wraps() {
    let conn = lookup(&[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]], [9, 10, 11, 0]);
    assert_eq!(
        conn.slots,
        [slot(0, 9), slot(0, 10), slot(0, 11), slot(0, 0)]
    );
    assert_eq!(conn.links, [link(9, 10), link(11, 0)]);
}

#[test]
fn lookup_backward_second_pair() {
    // d0 -> d1 but d3 -> d2
    let conn = lookup(&[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]], [0, 1, 3, 2]);
    assert_eq!(
        conn.slots,
        [slot(0, 0), slot(0, 1), slot(0, 3), slot(0, 2)]
    );
    assert_eq!(conn.links, [link(0, 1), link(2, 3)]);
}

#[test]
fn lookup_backward_second_pair_wrapped() {
    let conn = lookup(&[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]], [11, 0, 2, 1]);
    assert_eq!(
        conn.slots,
        [slot(0, 11), slot(0, 0), slot(0, 2), slot(0, 1)]
    );
    assert_eq!(conn.links, [link(11, 0), link(1, 2)]);
}

#[test]
fn lookup_under_strand_splits_row() {
    // d0 -> d2 and d1 -> d3
    let conn = lookup(&[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]], [0, 2, 1, 3]);
    assert_eq!(
        conn.slots,
        [slot(0, 0), slot(0, 2), slot(0, 1), slot(0, 3)]
    );
    assert_eq!(conn.links, [link(0, 1), link(2, 3)]);
}

#[test]
fn lookup_over_strand_reversed() {
    // d0 -> d2 and d3 -> d1
    let conn = lookup(&[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]], [0, 3, 1, 2]);
    assert_eq!(
        conn.slots,
        [slot(0, 0), slot(0, 3), slot(0, 1), slot(0, 2)]
    );
    assert_eq!(conn.links, [link(0, 1), link(2, 3)]);
}

#[test]
fn lookup_retracts_ambiguous_forward_pairing() {
    // d1 follows d0 in the walk, but pairing them would leave d2 and d3
    // non-adjacent; the lookup must fall back to the backward neighbor
    let conn = lookup(&[&[7, 8, 6, 5, 4, 3, 2, 1, 0, 11, 10, 9]], [2, 1, 3, 0]);
    assert_eq!(
        conn.slots,
        [slot(0, 6), slot(0, 7), slot(0, 5), slot(0, 8)]
    );
    assert_eq!(conn.links, [link(3, 2), link(1, 0)]);
}

#[test]
fn lookup_rejects_missing_dart() {
    let path = EdgePath::from_labels(&[&[0, 1, 2, 3]]);
    assert_eq!(
        connectivity(&path, &[0, 1, 2, 7].map(Dart)),
        Err(BracketError::DartNotFound(Dart(7)))
    );
}

//---------------------------------------------------------------------------//
// state sums

#[test]
fn single_crossing_unknot() {
    let (writhe, states) = run(&[&[0, 1, 2, 3]], &[[0, 3, 1, 2]]);
    assert_eq!(writhe, 1);
    assert_eq!(states, triples(&[(0, 1, 1), (1, 0, 2)]));
}

#[test]
fn single_crossing_unknot_relabeled() {
    let (writhe, states) = run(&[&[0, 1, 2, 3]], &[[1, 0, 2, 3]]);
    assert_eq!(writhe, 1);
    assert_eq!(states, triples(&[(0, 1, 1), (1, 0, 2)]));
}

#[test]
fn two_crossings_of_opposite_handedness() {
    let (writhe, states) = run(
        &[&[0, 1, 2, 3, 4, 5, 6, 7]],
        &[[0, 6, 1, 7], [2, 5, 3, 4]],
    );
    assert_eq!(writhe, 0);
    assert_eq!(
        states,
        triples(&[(1, 1, 1), (0, 2, 2), (2, 0, 2), (1, 1, 3)])
    );
}

#[test]
fn two_crossings_of_like_handedness() {
    let (writhe, states) = run(
        &[&[0, 1, 2, 3, 4, 5, 6, 7]],
        &[[0, 6, 1, 7], [4, 2, 5, 3]],
    );
    assert_eq!(writhe, -2);
    assert_eq!(
        states,
        triples(&[(2, 0, 1), (1, 1, 2), (1, 1, 2), (0, 2, 3)])
    );
}

#[test]
fn left_trefoil() {
    let (writhe, states) = run(
        &[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]],
        &[[0, 6, 1, 7], [4, 10, 5, 11], [8, 2, 9, 3]],
    );
    assert_eq!(writhe, -3);
    assert_eq!(
        states,
        triples(&[
            (0, 3, 2),
            (1, 2, 1),
            (1, 2, 1),
            (1, 2, 1),
            (2, 1, 2),
            (2, 1, 2),
            (2, 1, 2),
            (3, 0, 3),
        ])
    );
}

#[test]
fn right_trefoil() {
    let (writhe, states) = run(
        &[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]],
        &[[2, 9, 3, 8], [6, 1, 7, 0], [10, 5, 11, 4]],
    );
    assert_eq!(writhe, 3);
    assert_eq!(
        states,
        triples(&[
            (0, 3, 3),
            (1, 2, 2),
            (1, 2, 2),
            (1, 2, 2),
            (2, 1, 1),
            (2, 1, 1),
            (2, 1, 1),
            (3, 0, 2),
        ])
    );
}

#[test]
fn two_component_link() {
    let (writhe, states) = run(
        &[&[0, 1, 6, 7], &[2, 3, 4, 5]],
        &[[0, 2, 1, 3], [4, 6, 5, 7]],
    );
    assert_eq!(writhe, -2);
    assert_eq!(
        states,
        triples(&[(0, 2, 2), (1, 1, 1), (1, 1, 1), (2, 0, 2)])
    );
}

//---------------------------------------------------------------------------//
// symmetries

/// Swapping the strand roles at every crossing — each row rotated one slot —
/// mirrors the diagram: the writhe negates and the two smoothings trade
/// places while the loop counts stay put.
#[test]
fn mirror_negates_writhe_and_swaps_smoothings() {
    let diagrams: [(&[&[usize]], &[[usize; 4]]); 4] = [
        (
            &[&[0, 1, 2, 3, 4, 5, 6, 7]],
            &[[0, 6, 1, 7], [2, 5, 3, 4]],
        ),
        (
            &[&[0, 1, 2, 3, 4, 5, 6, 7]],
            &[[0, 6, 1, 7], [4, 2, 5, 3]],
        ),
        (
            &[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]],
            &[[0, 6, 1, 7], [4, 10, 5, 11], [8, 2, 9, 3]],
        ),
        (&[&[0, 1, 6, 7], &[2, 3, 4, 5]], &[[0, 2, 1, 3], [4, 6, 5, 7]]),
    ];

    for (epath, rows) in diagrams {
        let mirrored: Vec<[usize; 4]> = rows
            .iter()
            .map(|row| [row[1], row[2], row[3], row[0]])
            .collect();
        let (writhe, states) = run(epath, rows);
        let (mirror_writhe, mirror_states) = run(epath, &mirrored);

        assert_eq!(mirror_writhe, -writhe);
        let swapped = triples(
            &states
                .iter()
                .map(|s| (s.b, s.a, s.loops))
                .collect::<Vec<_>>(),
        );
        assert_eq!(mirror_states, swapped);

        let mut loops: Vec<usize> = states.iter().map(|s| s.loops).collect();
        let mut mirror_loops: Vec<usize> = mirror_states.iter().map(|s| s.loops).collect();
        loops.sort();
        mirror_loops.sort();
        assert_eq!(loops, mirror_loops);
    }
}

/// Reversing every edge — each segment walked backwards, each row flipped to
/// `(c, d, a, b)` — changes neither the writhe nor the state multiset.
#[test]
fn edge_reversal_preserves_the_bracket() {
    let diagrams: [(&[&[usize]], &[[usize; 4]]); 2] = [
        (
            &[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]],
            &[[0, 6, 1, 7], [4, 10, 5, 11], [8, 2, 9, 3]],
        ),
        (
            &[&[0, 1, 2, 3, 4, 5, 6, 7]],
            &[[0, 6, 1, 7], [2, 5, 3, 4]],
        ),
    ];

    for (epath, rows) in diagrams {
        let reversed_path: Vec<Vec<usize>> = epath
            .iter()
            .map(|segment| {
                let mut out = vec![segment[0]];
                out.extend(segment[1..].iter().rev());
                out
            })
            .collect();
        let reversed_refs: Vec<&[usize]> =
            reversed_path.iter().map(Vec::as_slice).collect();
        let flipped: Vec<[usize; 4]> = rows
            .iter()
            .map(|row| [row[2], row[3], row[0], row[1]])
            .collect();

        let (writhe, states) = run(epath, rows);
        let (reversed_writhe, reversed_states) = run(&reversed_refs, &flipped);
        assert_eq!(reversed_writhe, writhe);
        assert_eq!(reversed_states, states);
    }
}
