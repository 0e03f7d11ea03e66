use super::BvhError;
use crate::math::Real;

/// Tuning parameters of a [`Bvh`](super::Bvh).
///
/// The default values are the ones the insertion and rotation heuristics were tuned with.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvhConfig {
    /// Maximum number of objects stored by a single leaf.
    ///
    /// Leaves exceeding this count are split. [`Bvh::optimize`](super::Bvh::optimize) requires
    /// this to be 1; larger values are only meant for static scenes.
    pub leaf_capacity: usize,
    /// Insertion creates a new interior node above the current children ("pushdown") only if
    /// the pushdown cost is smaller than the best descent cost multiplied by this factor.
    pub merge_discount: Real,
    /// Minimal relative decrease of the children's surface area a rotation must achieve to be
    /// applied.
    pub min_rotation_improvement: Real,
    /// Probability of queuing the parent of a node for which no rotation was beneficial.
    pub parent_requeue_probability: f32,
    /// Seed of the pseudo-random generator driving the parent re-queuing.
    pub seed: u64,
}

impl BvhConfig {
    /// The default [`BvhConfig::merge_discount`].
    pub const DEFAULT_MERGE_DISCOUNT: Real = 0.3;
    /// The default [`BvhConfig::min_rotation_improvement`].
    pub const DEFAULT_MIN_ROTATION_IMPROVEMENT: Real = 0.3;
    /// The default [`BvhConfig::parent_requeue_probability`].
    pub const DEFAULT_PARENT_REQUEUE_PROBABILITY: f32 = 0.02;
    /// The default [`BvhConfig::seed`].
    pub const DEFAULT_SEED: u64 = 0x0dd5_eed5;

    /// Sets the maximum number of objects per leaf.
    pub fn with_leaf_capacity(mut self, leaf_capacity: usize) -> Self {
        self.leaf_capacity = leaf_capacity;
        self
    }

    /// Sets the pushdown discount factor.
    pub fn with_merge_discount(mut self, merge_discount: Real) -> Self {
        self.merge_discount = merge_discount;
        self
    }

    /// Sets the minimal relative improvement of an applied rotation.
    pub fn with_min_rotation_improvement(mut self, min_rotation_improvement: Real) -> Self {
        self.min_rotation_improvement = min_rotation_improvement;
        self
    }

    /// Sets the probability of re-queuing the parent of a node that was not rotated.
    pub fn with_parent_requeue_probability(mut self, probability: f32) -> Self {
        self.parent_requeue_probability = probability;
        self
    }

    /// Sets the seed of the pseudo-random generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that this configuration can be used to build a tree.
    pub fn validate(&self) -> Result<(), BvhError> {
        if self.leaf_capacity == 0 {
            return Err(BvhError::InvalidLeafCapacity(self.leaf_capacity));
        }

        Ok(())
    }
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            leaf_capacity: 1,
            merge_discount: Self::DEFAULT_MERGE_DISCOUNT,
            min_rotation_improvement: Self::DEFAULT_MIN_ROTATION_IMPROVEMENT,
            parent_requeue_probability: Self::DEFAULT_PARENT_REQUEUE_PROBABILITY,
            seed: Self::DEFAULT_SEED,
        }
    }
}
