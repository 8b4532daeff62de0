pub mod crossover;
pub mod forward;
pub mod mutation;
pub mod scaling;
pub mod topology;

use crate::config::{EvolutionConfig, NeuralConfig};
pub use bugsim_data::{Activation, LayerSpec, NeuralEncoding};
use rand::Rng;

pub use scaling::ScalingOutcome;
pub use topology::{create_encoding_random_with_rng, resize_matrix};

/// Trait defining the inference and structural-evolution interface of a
/// decision network.
pub trait NeuralLogic: Sized {
    fn new_random() -> Self;
    fn new_random_with_rng<R: Rng>(rng: &mut R) -> Self;

    /// Feed-forward pass. Always yields exactly [`ACTION_OUTPUTS`] values.
    #[must_use]
    fn infer(&self, inputs: &[f32; SENSORY_INPUTS]) -> [f32; ACTION_OUTPUTS];

    /// True when layers, tensors and the sensory/action contract agree.
    fn is_consistent(&self) -> bool;

    /// Per-tick energy upkeep of the network.
    fn energetic_cost(&self, config: &NeuralConfig) -> f64;

    fn grow_layer_with_rng<R: Rng>(&self, rng: &mut R) -> Option<Self>;
    fn shrink_layer_with_rng<R: Rng>(&self, rng: &mut R) -> Option<Self>;
    fn resize_layer_with_rng<R: Rng>(&self, layer: usize, neurons: usize, rng: &mut R)
        -> Option<Self>;
    fn swap_activation(&self, layer: usize, activation: Activation) -> Option<Self>;

    #[must_use]
    fn mutate_with_rng<R: Rng>(&self, config: &EvolutionConfig, rng: &mut R) -> Self;
    #[must_use]
    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self;
    #[must_use]
    fn crossover(&self, other: &Self) -> Self;
}

pub const SENSORY_LABELS: [&str; 24] = [
    "Energy",
    "Age",
    "TerrainKind",
    "TerrainSpeed",
    "TerrainVision",
    "TerrainCost",
    "FoodDX",
    "FoodDY",
    "FoodDist",
    "PreyDX",
    "PreyDY",
    "PreyDist",
    "PredatorDX",
    "PredatorDY",
    "PredatorDist",
    "MateDX",
    "MateDY",
    "MateDist",
    "SeasonDrain",
    "WeatherSpeed",
    "DisasterDamage",
    "TerritoryOccupancy",
    "TerritoryOwned",
    "Alarm",
];

pub const ACTION_LABELS: [&str; 8] = [
    "MoveX", "MoveY", "Flee", "Mate", "Hunt", "Signal", "Share", "Build",
];

pub const SENSORY_INPUTS: usize = SENSORY_LABELS.len();
pub const ACTION_OUTPUTS: usize = ACTION_LABELS.len();

pub const OUT_MOVE_X: usize = 0;
pub const OUT_MOVE_Y: usize = 1;
pub const OUT_FLEE: usize = 2;
pub const OUT_MATE: usize = 3;
pub const OUT_HUNT: usize = 4;
pub const OUT_SIGNAL: usize = 5;
pub const OUT_SHARE: usize = 6;
pub const OUT_BUILD: usize = 7;

pub const MIN_LAYERS: usize = 3;
pub const MAX_LAYERS: usize = 10;
pub const MIN_HIDDEN_NEURONS: usize = 2;
pub const MAX_HIDDEN_NEURONS: usize = 32;
pub const WEIGHT_LIMIT: f32 = 5.0;

impl NeuralLogic for NeuralEncoding {
    fn new_random() -> Self {
        let mut rng = rand::thread_rng();
        Self::new_random_with_rng(&mut rng)
    }

    fn new_random_with_rng<R: Rng>(rng: &mut R) -> Self {
        topology::create_encoding_random_with_rng(rng)
    }

    fn infer(&self, inputs: &[f32; SENSORY_INPUTS]) -> [f32; ACTION_OUTPUTS] {
        forward::infer(self, inputs)
    }

    fn is_consistent(&self) -> bool {
        topology::is_consistent(self)
    }

    fn energetic_cost(&self, config: &NeuralConfig) -> f64 {
        scaling::energetic_cost(self, config)
    }

    fn grow_layer_with_rng<R: Rng>(&self, rng: &mut R) -> Option<Self> {
        topology::grow_layer_with_rng(self, rng)
    }

    fn shrink_layer_with_rng<R: Rng>(&self, rng: &mut R) -> Option<Self> {
        topology::shrink_layer_with_rng(self, rng)
    }

    fn resize_layer_with_rng<R: Rng>(
        &self,
        layer: usize,
        neurons: usize,
        rng: &mut R,
    ) -> Option<Self> {
        topology::resize_layer_with_rng(self, layer, neurons, rng)
    }

    fn swap_activation(&self, layer: usize, activation: Activation) -> Option<Self> {
        topology::swap_activation(self, layer, activation)
    }

    fn mutate_with_rng<R: Rng>(&self, config: &EvolutionConfig, rng: &mut R) -> Self {
        mutation::mutate_with_rng(self, config, rng)
    }

    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        crossover::crossover_with_rng(self, other, rng)
    }

    fn crossover(&self, other: &Self) -> Self {
        let mut rng = rand::thread_rng();
        self.crossover_with_rng(other, &mut rng)
    }
}
