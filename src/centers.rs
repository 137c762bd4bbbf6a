//! Logical face roles of the six center cubies.
//!
//! Slice turns (and the wide and whole-cube turns that include the middle
//! slice) move the center cubies without moving the outer faces, so "which
//! cubie is currently the up center" has to be tracked symbolically.

use crate::cube::GridIndex;

/// Face a center cubie currently represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FaceRole {
    Left,
    Right,
    Up,
    Down,
    Front,
    Back,
}

impl FaceRole {
    pub(crate) const ALL: [FaceRole; 6] = [
        FaceRole::Left,
        FaceRole::Right,
        FaceRole::Up,
        FaceRole::Down,
        FaceRole::Front,
        FaceRole::Back,
    ];

    fn slot(self) -> usize {
        match self {
            FaceRole::Left => 0,
            FaceRole::Right => 1,
            FaceRole::Up => 2,
            FaceRole::Down => 3,
            FaceRole::Front => 4,
            FaceRole::Back => 5,
        }
    }
}

/// Middle slice of one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Slice {
    /// Between left and right, turns like L
    M,
    /// Between up and down, turns like D
    E,
    /// Between front and back, turns like F
    S,
}

/// Grid index of the core cubie.
pub(crate) const CORE: GridIndex = [1, 1, 1];

/// Which cubie currently plays each face role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CenterMap {
    roles: [GridIndex; 6],
}

impl Default for CenterMap {
    fn default() -> Self {
        let mut roles = [CORE; 6];
        roles[FaceRole::Left.slot()] = [1, 1, 2];
        roles[FaceRole::Right.slot()] = [1, 1, 0];
        roles[FaceRole::Up.slot()] = [1, 0, 1];
        roles[FaceRole::Down.slot()] = [1, 2, 1];
        roles[FaceRole::Front.slot()] = [0, 1, 1];
        roles[FaceRole::Back.slot()] = [2, 1, 1];
        Self { roles }
    }
}

impl CenterMap {
    pub(crate) fn get(&self, role: FaceRole) -> GridIndex {
        self.roles[role.slot()]
    }

    pub(crate) fn core(&self) -> GridIndex {
        CORE
    }

    /// Relabels the centers after one quarter turn of `slice`.
    pub(crate) fn relabel(&mut self, slice: Slice, inverse: bool) {
        let old = *self;
        for role in FaceRole::ALL {
            self.roles[role.slot()] = old.get(relabel_source(slice, inverse, role));
        }
    }
}

/// The role whose cubie moves into `role` when `slice` is turned.
fn relabel_source(slice: Slice, inverse: bool, role: FaceRole) -> FaceRole {
    use FaceRole::*;

    match (slice, inverse, role) {
        (Slice::M, false, Up) => Back,
        (Slice::M, false, Down) => Front,
        (Slice::M, false, Front) => Up,
        (Slice::M, false, Back) => Down,
        (Slice::M, true, Up) => Front,
        (Slice::M, true, Down) => Back,
        (Slice::M, true, Front) => Down,
        (Slice::M, true, Back) => Up,

        (Slice::E, false, Left) => Back,
        (Slice::E, false, Right) => Front,
        (Slice::E, false, Front) => Left,
        (Slice::E, false, Back) => Right,
        (Slice::E, true, Left) => Front,
        (Slice::E, true, Right) => Back,
        (Slice::E, true, Front) => Right,
        (Slice::E, true, Back) => Left,

        (Slice::S, false, Left) => Down,
        (Slice::S, false, Right) => Up,
        (Slice::S, false, Up) => Left,
        (Slice::S, false, Down) => Right,
        (Slice::S, true, Left) => Up,
        (Slice::S, true, Right) => Down,
        (Slice::S, true, Up) => Right,
        (Slice::S, true, Down) => Left,

        // roles on the slice's own axis stay put
        (_, _, role) => role,
    }
}
