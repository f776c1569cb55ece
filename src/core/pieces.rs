//! Pieces module - tetromino rotation states.
//!
//! Each kind carries an ordered, precomputed list of 0/1 shape matrices, one
//! per discrete rotation state. Rotation advances cyclically through the list;
//! the matrices themselves are immutable. I, S and Z distinguish only two
//! orientations, O only one.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, BOARD_WIDTH};

/// One rotation state: rows of 0/1 cells. All rows of a shape share a width.
pub type Shape = &'static [&'static [u8]];

static I_STATES: &[Shape] = &[&[&[1, 1, 1, 1]], &[&[1], &[1], &[1], &[1]]];

static O_STATES: &[Shape] = &[&[&[1, 1], &[1, 1]]];

static T_STATES: &[Shape] = &[
    &[&[0, 1, 0], &[1, 1, 1]],
    &[&[1, 0], &[1, 1], &[1, 0]],
    &[&[1, 1, 1], &[0, 1, 0]],
    &[&[0, 1], &[1, 1], &[0, 1]],
];

static S_STATES: &[Shape] = &[
    &[&[0, 1, 1], &[1, 1, 0]],
    &[&[1, 0], &[1, 1], &[0, 1]],
];

static Z_STATES: &[Shape] = &[
    &[&[1, 1, 0], &[0, 1, 1]],
    &[&[0, 1], &[1, 1], &[1, 0]],
];

static J_STATES: &[Shape] = &[
    &[&[1, 0, 0], &[1, 1, 1]],
    &[&[1, 1], &[1, 0], &[1, 0]],
    &[&[1, 1, 1], &[0, 0, 1]],
    &[&[0, 1], &[0, 1], &[1, 1]],
];

static L_STATES: &[Shape] = &[
    &[&[0, 0, 1], &[1, 1, 1]],
    &[&[1, 0], &[1, 0], &[1, 1]],
    &[&[1, 1, 1], &[1, 0, 0]],
    &[&[1, 1], &[0, 1], &[0, 1]],
];

/// Get the ordered rotation states for a piece kind.
pub fn rotation_states(kind: PieceKind) -> &'static [Shape] {
    match kind {
        PieceKind::I => I_STATES,
        PieceKind::O => O_STATES,
        PieceKind::T => T_STATES,
        PieceKind::S => S_STATES,
        PieceKind::Z => Z_STATES,
        PieceKind::J => J_STATES,
        PieceKind::L => L_STATES,
    }
}

/// Offsets of the occupied cells of a shape, relative to the piece anchor.
/// Every tetromino shape occupies exactly four cells.
pub fn occupied_cells(shape: Shape) -> ArrayVec<(i8, i8), 4> {
    let mut cells = ArrayVec::new();
    for (dy, row) in shape.iter().enumerate() {
        for (dx, &cell) in row.iter().enumerate() {
            if cell != 0 {
                cells.push((dx as i8, dy as i8));
            }
        }
    }
    cells
}

/// Column count of a shape.
pub fn shape_cols(shape: Shape) -> i8 {
    shape[0].len() as i8
}

/// Spawn column for a fresh piece: horizontally floor-centered using the
/// first rotation state's column count.
pub fn spawn_x(kind: PieceKind) -> i8 {
    let cols = shape_cols(rotation_states(kind)[0]);
    (BOARD_WIDTH as i8) / 2 - cols / 2
}
