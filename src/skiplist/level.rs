use crate::skiplist::{Error, Result};
use rand::Rng;
use rand::XorShiftRng;

/// A generator of geometrically distributed node heights.
///
/// The generator is constructed from a target capacity and a promotion
/// probability `p`. The capacity is the expected maximum number of entries
/// the list should handle with logarithmic operation cost; from it the
/// generator derives a maximum height of `ceil(log_{1/p}(capacity))`, clamped
/// to at least one. The maximum height is a hard ceiling: exceeding the
/// target capacity degrades expected performance gracefully instead of
/// failing.
///
/// Heights are drawn by slicing the full `u32` range into geometrically
/// shrinking intervals, one per level. A single uniform draw is compared
/// against the per-level thresholds, so `P(height > h) = p^h` for every
/// `h < max_height`, independently per draw.
pub struct LevelGenerator<R = XorShiftRng> {
    thresholds: Vec<u32>,
    rng: R,
}

impl LevelGenerator {
    /// Constructs a `LevelGenerator` that draws from the default random
    /// number generator.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero or if `probability` is not
    /// strictly between 0 and 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_map::skiplist::LevelGenerator;
    ///
    /// let levels = LevelGenerator::new(65536, 0.5).unwrap();
    /// assert_eq!(levels.max_height(), 16);
    ///
    /// assert!(LevelGenerator::new(0, 0.5).is_err());
    /// assert!(LevelGenerator::new(65536, 1.0).is_err());
    /// ```
    pub fn new(capacity: usize, probability: f64) -> Result<Self> {
        Self::with_rng(capacity, probability, XorShiftRng::new_unseeded())
    }
}

impl<R> LevelGenerator<R>
where R: Rng
{
    /// Constructs a `LevelGenerator` that draws from a caller-supplied random
    /// number generator. Supplying a deterministic generator makes the
    /// heights, and therefore the shape of the list, reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero or if `probability` is not
    /// strictly between 0 and 1.
    pub fn with_rng(capacity: usize, probability: f64, rng: R) -> Result<Self> {
        if capacity < 1 {
            return Err(Error::InvalidCapacity(capacity));
        }
        if probability <= 0.0 || probability >= 1.0 {
            return Err(Error::InvalidProbability(probability));
        }
        Ok(Self::from_valid(capacity, probability, rng))
    }

    pub(crate) fn from_valid(capacity: usize, probability: f64, rng: R) -> Self {
        // smallest height with (1/p)^height >= capacity, i.e.
        // ceil(log_{1/p}(capacity)) clamped to at least 1
        let mut max_height = 1;
        let mut reach = 1.0 / probability;
        while reach < capacity as f64 {
            max_height += 1;
            reach /= probability;
        }
        let mut thresholds = Vec::with_capacity(max_height);
        let mut fraction = 1.0;
        for _ in 0..max_height {
            thresholds.push((fraction * f64::from(u32::MAX)) as u32);
            fraction *= probability;
        }
        LevelGenerator { thresholds, rng }
    }

    /// Returns the maximum height a drawn tower can reach. Heights are in
    /// `[1, max_height]`.
    pub fn max_height(&self) -> usize {
        self.thresholds.len()
    }

    /// Draws a random height. Level 0 accepts every draw, and each further
    /// level accepts a `probability` fraction of the draws the previous level
    /// accepted.
    pub fn gen_height(&mut self) -> usize {
        let draw = self.rng.next_u32();
        let mut height = 1;
        while height < self.thresholds.len() && draw <= self.thresholds[height] {
            height += 1;
        }
        height
    }
}
