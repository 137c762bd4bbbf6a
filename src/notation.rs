//! Standard cube notation: faces, moves and algorithms.
//!
//! Parsing is best-effort: characters outside the token alphabet are dropped
//! and a missing count defaults to a single turn, so any input string yields
//! some (possibly empty) algorithm.

use std::fmt;

/// Turnable layer named by a notation letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Face {
    L,
    R,
    U,
    D,
    F,
    B,
    M,
    E,
    S,
    /// Wide turns: face layer plus the adjacent slice
    WideL,
    WideR,
    WideU,
    WideD,
    WideF,
    WideB,
    /// Whole-cube rotations
    X,
    Y,
    Z,
}

impl Face {
    /// The six outer faces, in scramble order.
    pub(crate) const OUTER: [Face; 6] = [Face::R, Face::L, Face::U, Face::D, Face::F, Face::B];

    pub(crate) const ALL: [Face; 18] = [
        Face::L,
        Face::R,
        Face::U,
        Face::D,
        Face::F,
        Face::B,
        Face::M,
        Face::E,
        Face::S,
        Face::WideL,
        Face::WideR,
        Face::WideU,
        Face::WideD,
        Face::WideF,
        Face::WideB,
        Face::X,
        Face::Y,
        Face::Z,
    ];

    /// Case-sensitive letter lookup. Lowercase `s` names the S slice.
    pub(crate) fn from_letter(letter: char) -> Option<Self> {
        Some(match letter {
            'L' => Face::L,
            'R' => Face::R,
            'U' => Face::U,
            'D' => Face::D,
            'F' => Face::F,
            'B' => Face::B,
            'M' => Face::M,
            'E' => Face::E,
            'S' | 's' => Face::S,
            'l' => Face::WideL,
            'r' => Face::WideR,
            'u' => Face::WideU,
            'd' => Face::WideD,
            'f' => Face::WideF,
            'b' => Face::WideB,
            'x' => Face::X,
            'y' => Face::Y,
            'z' => Face::Z,
            _ => return None,
        })
    }

    pub(crate) fn letter(self) -> char {
        match self {
            Face::L => 'L',
            Face::R => 'R',
            Face::U => 'U',
            Face::D => 'D',
            Face::F => 'F',
            Face::B => 'B',
            Face::M => 'M',
            Face::E => 'E',
            Face::S => 'S',
            Face::WideL => 'l',
            Face::WideR => 'r',
            Face::WideU => 'u',
            Face::WideD => 'd',
            Face::WideF => 'f',
            Face::WideB => 'b',
            Face::X => 'x',
            Face::Y => 'y',
            Face::Z => 'z',
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A single turn of one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Move {
    pub(crate) face: Face,
    pub(crate) inverse: bool,
    /// 1 for a quarter turn, 2 for a half turn
    pub(crate) count: u8,
}

impl Move {
    pub(crate) fn new(face: Face, inverse: bool, count: u8) -> Self {
        Self {
            face,
            inverse,
            count: count.clamp(1, 2),
        }
    }

    pub(crate) fn is_double(&self) -> bool {
        self.count == 2
    }

    /// Same layer, opposite direction.
    pub(crate) fn inverted(self) -> Self {
        Self {
            inverse: !self.inverse,
            ..self
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.face)?;
        if self.is_double() {
            write!(f, "2")?;
        }
        if self.inverse {
            write!(f, "'")?;
        }
        Ok(())
    }
}

/// Ordered sequence of moves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Algorithm(pub(crate) Vec<Move>);

impl Algorithm {
    /// Parses cube notation such as `"R U R' U'"` or `"x2 M-U2"`.
    pub(crate) fn parse(text: &str) -> Self {
        let mut moves: Vec<Move> = Vec::new();
        let mut current: Option<Move> = None;

        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            if let Some(face) = Face::from_letter(ch) {
                moves.extend(current.take());
                current = Some(Move::new(face, false, 1));
                continue;
            }
            let Some(token) = current.as_mut() else {
                continue;
            };
            match ch {
                '\'' | '-' | '3' => token.inverse = true,
                '2' => token.count = 2,
                '1' => token.count = 1,
                _ => {}
            }
        }
        moves.extend(current);

        Self(moves)
    }

    /// Reverses the order and flips every move's direction.
    pub(crate) fn inverse(&self) -> Self {
        Self(self.0.iter().rev().map(|m| m.inverted()).collect())
    }

    pub(crate) fn moves(&self) -> &[Move] {
        &self.0
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

impl From<&str> for Algorithm {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<Vec<Move>> for Algorithm {
    fn from(moves: Vec<Move>) -> Self {
        Self(moves)
    }
}

impl IntoIterator for Algorithm {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_sexy_move() {
        let alg = Algorithm::parse("R U R' U'");
        assert_eq!(
            alg.moves(),
            &[
                Move::new(Face::R, false, 1),
                Move::new(Face::U, false, 1),
                Move::new(Face::R, true, 1),
                Move::new(Face::U, true, 1),
            ]
        );
    }

    #[test]
    fn dash_and_three_mean_inverse() {
        let alg = Algorithm::parse("R-U3F'");
        assert!(alg.moves().iter().all(|m| m.inverse && m.count == 1));
        assert_eq!(alg.len(), 3);
    }

    #[test]
    fn double_turns_and_wide_letters() {
        let alg = Algorithm::parse("r2 x2' M2");
        assert_eq!(
            alg.moves(),
            &[
                Move::new(Face::WideR, false, 2),
                Move::new(Face::X, true, 2),
                Move::new(Face::M, false, 2),
            ]
        );
    }

    #[test]
    fn junk_is_discarded() {
        let alg = Algorithm::parse("  (R  U)* ! Q  9 ");
        assert_eq!(alg.to_string(), "R U");
        assert_eq!(Algorithm::parse("hello?").to_string(), "l l");
        assert!(Algorithm::parse("").is_empty());
        assert!(Algorithm::parse("'2'").is_empty());
    }

    #[test]
    fn face_letters_are_case_sensitive() {
        assert_eq!(Algorithm::parse("X").len(), 0);
        assert_eq!(Algorithm::parse("x").moves()[0].face, Face::X);
        assert_eq!(Algorithm::parse("r").moves()[0].face, Face::WideR);
    }

    #[test]
    fn prints_canonical_form() {
        let alg = Algorithm::parse("R2U-f");
        assert_eq!(alg.to_string(), "R2 U' f");
    }

    #[test]
    fn inverse_reverses_and_flips() {
        let alg = Algorithm::parse("R U2 F'");
        assert_eq!(alg.inverse().to_string(), "F U2' R'");
        assert_eq!(alg.inverse().inverse(), alg);
    }

    fn any_move() -> impl Strategy<Value = Move> {
        (0..Face::ALL.len(), any::<bool>(), 1u8..=2)
            .prop_map(|(face, inverse, count)| Move::new(Face::ALL[face], inverse, count))
    }

    proptest! {
        #[test]
        fn canonical_form_parses_back(moves in prop::collection::vec(any_move(), 0..40)) {
            let alg = Algorithm(moves);
            prop_assert_eq!(Algorithm::parse(&alg.to_string()), alg);
        }

        #[test]
        fn double_inverse_is_identity(moves in prop::collection::vec(any_move(), 0..40)) {
            let alg = Algorithm(moves);
            prop_assert_eq!(alg.inverse().inverse(), alg);
        }

        #[test]
        fn parsing_never_panics(text in ".*") {
            let _ = Algorithm::parse(&text);
        }
    }
}
