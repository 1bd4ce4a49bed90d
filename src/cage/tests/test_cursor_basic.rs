use super::straight_cage;
use crate::cage::{BoundingCage, CageError};
use crate::geom::Point2;

fn split_cage() -> BoundingCage {
    let mut cage = straight_cage(3);
    cage.split(1.0).unwrap();
    cage.split(1.5).unwrap();
    cage
}

#[test]
fn cell_cursor_walks_leaves_to_the_end() {
    let cage = split_cage();
    let mut cursor = cage.cells_begin();
    let mut ranges = Vec::new();
    while cursor != cage.cells_end() {
        let cell = cursor.get(&cage).unwrap();
        ranges.push((cell.min_index(), cell.max_index()));
        cursor.next(&cage).unwrap();
    }
    assert_eq!(ranges, vec![(0.0, 1.0), (1.0, 1.5), (1.5, 2.0)]);
    assert!(cursor.is_end());
    assert!(!cursor.valid(&cage));
    assert_eq!(cursor.get(&cage).unwrap_err(), CageError::EndCursor);
    assert_eq!(cursor.next(&cage).unwrap_err(), CageError::EndCursor);
}

#[test]
fn cell_cursor_walks_backwards_from_the_last_leaf() {
    let cage = split_cage();
    let mut cursor = cage.cells_last();
    let mut mins = Vec::new();
    while !cursor.is_end() {
        mins.push(cursor.get(&cage).unwrap().min_index());
        cursor.prev(&cage).unwrap();
    }
    assert_eq!(mins, vec![1.5, 1.0, 0.0]);
}

#[test]
fn keyframe_cursor_visits_indices_in_order() {
    let cage = split_cage();
    let mut cursor = cage.keyframes_begin();
    let mut forward = Vec::new();
    while !cursor.is_end() {
        forward.push(cursor.get(&cage).unwrap().index());
        cursor.next(&cage).unwrap();
    }
    assert_eq!(forward, vec![0.0, 1.0, 1.5, 2.0]);
    assert_eq!(cursor, cage.keyframes_end());

    let mut cursor = cage.keyframes_last();
    let mut backward = Vec::new();
    while !cursor.is_end() {
        backward.push(cursor.get(&cage).unwrap().index());
        cursor.prev(&cage).unwrap();
    }
    assert_eq!(backward, vec![2.0, 1.5, 1.0, 0.0]);
}

#[test]
fn iterators_match_cursors() {
    let cage = split_cage();
    let forward: Vec<f64> = cage.keyframes().map(|(_, kf)| kf.index()).collect();
    assert_eq!(forward, vec![0.0, 1.0, 1.5, 2.0]);
    assert_eq!(cage.keyframes().len(), 4);

    let reversed: Vec<f64> = cage.cells().rev().map(|(_, cell)| cell.min_index()).collect();
    assert_eq!(reversed, vec![1.5, 1.0, 0.0]);
    assert_eq!(cage.cells().len(), cage.cell_count());

    let (id, _) = cage.cells().nth(1).unwrap();
    let cursor = cage.cell_cursor(id).unwrap();
    assert_eq!(cursor.get(&cage).unwrap().min_index(), 1.0);

    let root = cage.root().unwrap();
    assert!(cage.cell_cursor(root).is_none());

    let (kf_id, _) = cage.keyframes().last().unwrap();
    let cursor = cage.keyframe_cursor(kf_id).unwrap();
    assert_eq!(cursor.get(&cage).unwrap().index(), 2.0);
}

#[test]
fn structural_changes_invalidate_cursors() {
    let mut cage = split_cage();
    let mut cells = cage.cells_begin();
    let keyframes = cage.keyframes_begin();
    let first = cage.first_keyframe().unwrap();

    cage.move_point_2d(first, 0, Point2::new(-0.6, -0.6), true, true)
        .unwrap();
    assert!(cells.valid(&cage));
    assert!(keyframes.get(&cage).is_ok());

    cage.split(0.5).unwrap();
    assert!(!cells.valid(&cage));
    assert_eq!(cells.get(&cage).unwrap_err(), CageError::StaleCursor);
    assert_eq!(cells.next(&cage).unwrap_err(), CageError::StaleCursor);
    assert_eq!(keyframes.get(&cage).unwrap_err(), CageError::StaleCursor);

    let fresh = cage.cells_begin();
    assert_eq!(fresh.get(&cage).unwrap().max_index(), 0.5);

    cage.clear();
    assert_eq!(fresh.get(&cage).unwrap_err(), CageError::StaleCursor);
    assert!(cage.cells_begin().is_end());
    assert!(cage.keyframes_begin().is_end());
}
