//! Random scramble generation.

use rand::Rng;

use crate::notation::{Algorithm, Face, Move};

/// Generates `count` random outer-face turns.
///
/// Consecutive moves never share an axis pair (R/L, U/D, F/B), so no move is
/// immediately cancelled or merged by the next one. Half turns are never
/// inverted.
pub(crate) fn scramble<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Algorithm {
    let mut moves = Vec::with_capacity(count);
    let mut previous: Option<usize> = None;

    for _ in 0..count {
        let index = loop {
            let candidate = rng.gen_range(0..Face::OUTER.len());
            if previous.is_none_or(|p| p / 2 != candidate / 2) {
                break candidate;
            }
        };
        previous = Some(index);

        let turns = rng.gen_range(1..=2);
        let inverse = turns == 1 && rng.gen_bool(0.5);
        moves.push(Move::new(Face::OUTER[index], inverse, turns));
    }

    Algorithm(moves)
}

/// Default scramble length when none is configured: 10 to 19 moves.
pub(crate) fn default_length<R: Rng + ?Sized>(rng: &mut R) -> usize {
    rng.gen_range(10..20)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn axis_pair(face: Face) -> usize {
        Face::OUTER.iter().position(|&f| f == face).unwrap() / 2
    }

    #[test]
    fn scramble_has_requested_length() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(scramble(&mut rng, 25).len(), 25);
        assert!(scramble(&mut rng, 0).is_empty());
    }

    #[test]
    fn default_length_is_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!((10..20).contains(&default_length(&mut rng)));
        }
    }

    proptest! {
        #[test]
        fn consecutive_moves_use_different_axes(seed in any::<u64>(), count in 2usize..60) {
            let mut rng = StdRng::seed_from_u64(seed);
            let alg = scramble(&mut rng, count);
            for pair in alg.moves().windows(2) {
                prop_assert_ne!(axis_pair(pair[0].face), axis_pair(pair[1].face));
            }
            for m in alg.moves() {
                prop_assert!(!(m.inverse && m.is_double()));
            }
        }
    }
}
