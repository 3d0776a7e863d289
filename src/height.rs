use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of node heights for randomly-leveled inserts.
///
/// Implementations must return a value in `[0, max_height]`; the skiplist
/// clamps anything larger.
pub trait HeightGenerator {
    fn height(&mut self, max_height: usize) -> usize;
}

/// Draws heights uniformly from `[0, max_height]`.
#[derive(Debug, Clone)]
pub struct UniformHeights {
    rng: StdRng,
}

impl UniformHeights {
    /// Seeded from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of heights for a given `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl HeightGenerator for UniformHeights {
    #[inline]
    fn height(&mut self, max_height: usize) -> usize {
        self.rng.gen_range(0, max_height + 1)
    }
}

/// Height of the node at `position` in a perfectly leveled list.
///
/// The head (position 0) always spans every level; everything else gets
/// one level per trailing factor of two, capped at `max_height`.
#[inline]
pub(crate) fn relevel_height(position: usize, max_height: usize) -> usize {
    if position == 0 {
        return max_height;
    }
    (position.trailing_zeros() as usize).min(max_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_heights_stay_in_range() {
        let mut gen = UniformHeights::from_seed(7);
        for max in 0..6 {
            for _ in 0..200 {
                assert!(gen.height(max) <= max);
            }
        }
    }

    #[test]
    fn seeded_heights_repeat() {
        let mut a = UniformHeights::from_seed(42);
        let mut b = UniformHeights::from_seed(42);
        let xs: Vec<_> = (0..50).map(|_| a.height(8)).collect();
        let ys: Vec<_> = (0..50).map(|_| b.height(8)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn relevel_heights_follow_powers_of_two() {
        let heights: Vec<_> = (0..=16).map(|i| relevel_height(i, 3)).collect();
        assert_eq!(
            heights,
            vec![3, 0, 1, 0, 2, 0, 1, 0, 3, 0, 1, 0, 2, 0, 1, 0, 3]
        );
        assert_eq!(relevel_height(0, 0), 0);
        assert_eq!(relevel_height(8, 0), 0);
    }
}
