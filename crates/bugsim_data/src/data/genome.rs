use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed interval a scalar gene must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitRange {
    pub min: f32,
    pub max: f32,
}

impl TraitRange {
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Linear position of `value` inside the range, in [0, 1].
    #[must_use]
    pub fn normalize(&self, value: f32) -> f32 {
        if self.span() <= f32::EPSILON {
            return 0.0;
        }
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }
}

/// Activation function applied by a neural layer.
///
/// The set is fixed: `Identity` is only used by the sensory layer and the
/// action layer is always `Tanh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activation {
    /// Pass-through (sensory layer).
    Identity,
    /// Hyperbolic tangent, range (-1, 1).
    Tanh,
    /// Logistic sigmoid, range (0, 1).
    Sigmoid,
    /// Rectified linear unit.
    Relu,
    /// Leaky rectifier with slope 0.01 below zero.
    LeakyRelu,
}

impl Activation {
    /// Activations a hidden layer may carry.
    pub const HIDDEN: [Activation; 4] = [
        Activation::Tanh,
        Activation::Sigmoid,
        Activation::Relu,
        Activation::LeakyRelu,
    ];

    #[inline]
    #[must_use]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Identity => x,
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Relu => x.max(0.0),
            Activation::LeakyRelu => {
                if x >= 0.0 {
                    x
                } else {
                    0.01 * x
                }
            }
        }
    }
}

/// One layer of the decision network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Number of neurons in the layer.
    pub neurons: usize,
    /// Activation applied to the layer's pre-activations.
    pub activation: Activation,
}

/// Heritable topology and weights of an agent's decision network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralEncoding {
    /// Ordered layers, sensory layer first and action layer last.
    pub layers: Vec<LayerSpec>,
    /// `weights[i]` connects `layers[i]` to `layers[i + 1]`, row-major
    /// with `layers[i + 1].neurons` rows of `layers[i].neurons` columns.
    pub weights: Vec<Vec<f32>>,
    /// `biases[i]` belongs to `layers[i + 1]`.
    pub biases: Vec<Vec<f32>>,
    /// Likelihood of structural growth (0.0-1.0).
    pub plasticity: f32,
    /// Likelihood of pruning under energy scarcity (0.0-1.0).
    pub pruning_tendency: f32,
}

impl NeuralEncoding {
    /// Neurons in hidden layers only.
    #[must_use]
    pub fn hidden_neurons(&self) -> usize {
        if self.layers.len() < 3 {
            return 0;
        }
        self.layers[1..self.layers.len() - 1]
            .iter()
            .map(|l| l.neurons)
            .sum()
    }

    /// Total weighted connections between adjacent layers.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.layers
            .windows(2)
            .map(|pair| pair[0].neurons * pair[1].neurons)
            .sum()
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.neurons)
    }

    #[must_use]
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.neurons)
    }
}

/// Dietary strategy of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeciesKind {
    Herbivore,
    Carnivore,
    Omnivore,
    Scavenger,
}

impl SpeciesKind {
    pub const ALL: [SpeciesKind; 4] = [
        SpeciesKind::Herbivore,
        SpeciesKind::Carnivore,
        SpeciesKind::Omnivore,
        SpeciesKind::Scavenger,
    ];

    #[must_use]
    pub fn can_hunt(self) -> bool {
        matches!(self, SpeciesKind::Carnivore | SpeciesKind::Omnivore)
    }

    /// Whether a hunter of this kind and size treats `other` as prey.
    #[must_use]
    pub fn preys_on(self, own_size: f32, other: SpeciesKind, other_size: f32) -> bool {
        match self {
            SpeciesKind::Carnivore => other != SpeciesKind::Carnivore,
            SpeciesKind::Omnivore => {
                matches!(other, SpeciesKind::Herbivore | SpeciesKind::Scavenger)
                    && own_size >= other_size
            }
            SpeciesKind::Herbivore | SpeciesKind::Scavenger => false,
        }
    }

    /// Stable ordinal used for sensing and statistics.
    #[must_use]
    pub fn ordinal(self) -> usize {
        match self {
            SpeciesKind::Herbivore => 0,
            SpeciesKind::Carnivore => 1,
            SpeciesKind::Omnivore => 2,
            SpeciesKind::Scavenger => 3,
        }
    }
}

/// Species tag with its hunting and defensive parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesTraits {
    pub kind: SpeciesKind,
    /// Skill multiplier on hunting success (0.0-1.0).
    pub hunting_prowess: f32,
    /// Resistance to being hunted (0.0-1.0).
    pub defense: f32,
    /// Energy a successful hunt tries to take from the prey.
    pub hunt_energy_gain: f32,
    /// Multiplier on base metabolic loss.
    pub metabolic_rate: f32,
}

/// Social signalling genes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommunicationEncoding {
    /// Emitted signal strength (0.1-1.0).
    pub signal_strength: f32,
    /// Ability to pick up signals (0.0-1.0).
    pub sensitivity: f32,
    /// Chance to actually emit when allowed (0.0-1.0).
    pub frequency: f32,
    /// Chance to believe a received signal (0.0-1.0).
    pub trust: f32,
    /// Responsiveness to group behaviour (0.0-1.0).
    pub social_response: f32,
    /// Seconds a received signal is remembered.
    pub memory_duration: f32,
}

/// Construction and resource gathering aptitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolEncoding {
    pub construction_skill: f32,
    pub gathering_skill: f32,
}

/// Complete heritable trait bundle of an agent.
///
/// Never mutated in place once an agent carries it; evolution produces new
/// values through the genetic operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub speed: f32,
    pub vision_radius: f32,
    pub energy_efficiency: f32,
    pub size: f32,
    pub strength: f32,
    pub memory: f32,
    pub stickiness: f32,
    pub camouflage: f32,
    pub aggression: f32,
    pub curiosity: f32,
    pub neural: NeuralEncoding,
    pub species: SpeciesTraits,
    pub communication: CommunicationEncoding,
    pub tools: ToolEncoding,
    /// Lineage identifier.
    pub lineage_id: Uuid,
    /// RGB body colour.
    pub color: (u8, u8, u8),
}

/// Addressable scalar gene.
///
/// Every bounded scalar of a [`Genome`] and its sub-encodings has exactly one
/// variant here, so operators can visit all of them uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gene {
    Speed,
    VisionRadius,
    EnergyEfficiency,
    Size,
    Strength,
    Memory,
    Stickiness,
    Camouflage,
    Aggression,
    Curiosity,
    Plasticity,
    PruningTendency,
    HuntingProwess,
    Defense,
    HuntEnergyGain,
    MetabolicRate,
    SignalStrength,
    Sensitivity,
    SignalFrequency,
    Trust,
    SocialResponse,
    MemoryDuration,
    ConstructionSkill,
    GatheringSkill,
}

impl Gene {
    pub const ALL: [Gene; 24] = [
        Gene::Speed,
        Gene::VisionRadius,
        Gene::EnergyEfficiency,
        Gene::Size,
        Gene::Strength,
        Gene::Memory,
        Gene::Stickiness,
        Gene::Camouflage,
        Gene::Aggression,
        Gene::Curiosity,
        Gene::Plasticity,
        Gene::PruningTendency,
        Gene::HuntingProwess,
        Gene::Defense,
        Gene::HuntEnergyGain,
        Gene::MetabolicRate,
        Gene::SignalStrength,
        Gene::Sensitivity,
        Gene::SignalFrequency,
        Gene::Trust,
        Gene::SocialResponse,
        Gene::MemoryDuration,
        Gene::ConstructionSkill,
        Gene::GatheringSkill,
    ];

    /// Declared bounds of the gene.
    #[must_use]
    pub const fn range(self) -> TraitRange {
        match self {
            Gene::Speed => TraitRange::new(0.5, 3.0),
            Gene::VisionRadius => TraitRange::new(10.0, 80.0),
            Gene::EnergyEfficiency => TraitRange::new(0.5, 1.5),
            Gene::Size => TraitRange::new(0.5, 2.0),
            Gene::Strength => TraitRange::new(0.2, 2.0),
            Gene::HuntEnergyGain => TraitRange::new(10.0, 80.0),
            Gene::MetabolicRate => TraitRange::new(0.5, 1.5),
            Gene::SignalStrength => TraitRange::new(0.1, 1.0),
            Gene::MemoryDuration => TraitRange::new(1.0, 20.0),
            Gene::Memory
            | Gene::Stickiness
            | Gene::Camouflage
            | Gene::Aggression
            | Gene::Curiosity
            | Gene::Plasticity
            | Gene::PruningTendency
            | Gene::HuntingProwess
            | Gene::Defense
            | Gene::Sensitivity
            | Gene::SignalFrequency
            | Gene::Trust
            | Gene::SocialResponse
            | Gene::ConstructionSkill
            | Gene::GatheringSkill => TraitRange::new(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn get(self, genome: &Genome) -> f32 {
        match self {
            Gene::Speed => genome.speed,
            Gene::VisionRadius => genome.vision_radius,
            Gene::EnergyEfficiency => genome.energy_efficiency,
            Gene::Size => genome.size,
            Gene::Strength => genome.strength,
            Gene::Memory => genome.memory,
            Gene::Stickiness => genome.stickiness,
            Gene::Camouflage => genome.camouflage,
            Gene::Aggression => genome.aggression,
            Gene::Curiosity => genome.curiosity,
            Gene::Plasticity => genome.neural.plasticity,
            Gene::PruningTendency => genome.neural.pruning_tendency,
            Gene::HuntingProwess => genome.species.hunting_prowess,
            Gene::Defense => genome.species.defense,
            Gene::HuntEnergyGain => genome.species.hunt_energy_gain,
            Gene::MetabolicRate => genome.species.metabolic_rate,
            Gene::SignalStrength => genome.communication.signal_strength,
            Gene::Sensitivity => genome.communication.sensitivity,
            Gene::SignalFrequency => genome.communication.frequency,
            Gene::Trust => genome.communication.trust,
            Gene::SocialResponse => genome.communication.social_response,
            Gene::MemoryDuration => genome.communication.memory_duration,
            Gene::ConstructionSkill => genome.tools.construction_skill,
            Gene::GatheringSkill => genome.tools.gathering_skill,
        }
    }

    /// Writes `value` clamped to the gene's range.
    pub fn set(self, genome: &mut Genome, value: f32) {
        let value = self.range().clamp(value);
        let slot = match self {
            Gene::Speed => &mut genome.speed,
            Gene::VisionRadius => &mut genome.vision_radius,
            Gene::EnergyEfficiency => &mut genome.energy_efficiency,
            Gene::Size => &mut genome.size,
            Gene::Strength => &mut genome.strength,
            Gene::Memory => &mut genome.memory,
            Gene::Stickiness => &mut genome.stickiness,
            Gene::Camouflage => &mut genome.camouflage,
            Gene::Aggression => &mut genome.aggression,
            Gene::Curiosity => &mut genome.curiosity,
            Gene::Plasticity => &mut genome.neural.plasticity,
            Gene::PruningTendency => &mut genome.neural.pruning_tendency,
            Gene::HuntingProwess => &mut genome.species.hunting_prowess,
            Gene::Defense => &mut genome.species.defense,
            Gene::HuntEnergyGain => &mut genome.species.hunt_energy_gain,
            Gene::MetabolicRate => &mut genome.species.metabolic_rate,
            Gene::SignalStrength => &mut genome.communication.signal_strength,
            Gene::Sensitivity => &mut genome.communication.sensitivity,
            Gene::SignalFrequency => &mut genome.communication.frequency,
            Gene::Trust => &mut genome.communication.trust,
            Gene::SocialResponse => &mut genome.communication.social_response,
            Gene::MemoryDuration => &mut genome.communication.memory_duration,
            Gene::ConstructionSkill => &mut genome.tools.construction_skill,
            Gene::GatheringSkill => &mut genome.tools.gathering_skill,
        };
        *slot = value;
    }
}

impl Genome {
    /// True when every scalar gene lies inside its declared range.
    #[must_use]
    pub fn genes_in_range(&self) -> bool {
        Gene::ALL.iter().all(|g| g.range().contains(g.get(self)))
    }

    /// Serialize genome to hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(bytes)
    }

    /// Deserialize genome from hex string.
    pub fn from_hex(hex_str: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(hex_str)?;
        anyhow::ensure!(!bytes.is_empty(), "Empty hex string");
        let genome: Genome = serde_json::from_slice(&bytes)?;
        anyhow::ensure!(genome.genes_in_range(), "Genome has out-of-range genes");
        Ok(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_range_clamp_handles_nan() {
        let range = TraitRange::new(0.5, 3.0);
        assert_eq!(range.clamp(f32::NAN), 0.5);
        assert_eq!(range.clamp(10.0), 3.0);
        assert_eq!(range.clamp(-1.0), 0.5);
    }

    #[test]
    fn test_gene_ranges_are_well_formed() {
        for gene in Gene::ALL {
            let r = gene.range();
            assert!(r.min < r.max, "{gene:?} has an empty range");
        }
    }

    #[test]
    fn test_activation_values() {
        assert_eq!(Activation::Relu.apply(-2.0), 0.0);
        assert_eq!(Activation::Identity.apply(-2.0), -2.0);
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-6);
        assert!((Activation::LeakyRelu.apply(-1.0) + 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_predation_relation() {
        assert!(SpeciesKind::Carnivore.preys_on(1.0, SpeciesKind::Herbivore, 2.0));
        assert!(!SpeciesKind::Carnivore.preys_on(1.0, SpeciesKind::Carnivore, 0.5));
        assert!(SpeciesKind::Omnivore.preys_on(1.5, SpeciesKind::Scavenger, 1.0));
        assert!(!SpeciesKind::Omnivore.preys_on(0.8, SpeciesKind::Herbivore, 1.0));
        assert!(!SpeciesKind::Herbivore.preys_on(2.0, SpeciesKind::Scavenger, 0.5));
    }
}
