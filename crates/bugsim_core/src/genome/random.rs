use crate::neural::NeuralLogic;
use bugsim_data::{
    CommunicationEncoding, Gene, Genome, NeuralEncoding, SpeciesKind, SpeciesTraits, ToolEncoding,
};
use rand::Rng;
use uuid::Uuid;

/// Draws every gene uniformly from its declared range.
pub fn create_genome_random_with_rng<R: Rng>(rng: &mut R) -> Genome {
    let kind = SpeciesKind::ALL[rng.gen_range(0..SpeciesKind::ALL.len())];
    let mut genome = Genome {
        speed: 0.0,
        vision_radius: 0.0,
        energy_efficiency: 0.0,
        size: 0.0,
        strength: 0.0,
        memory: 0.0,
        stickiness: 0.0,
        camouflage: 0.0,
        aggression: 0.0,
        curiosity: 0.0,
        neural: NeuralEncoding::new_random_with_rng(rng),
        species: SpeciesTraits {
            kind,
            hunting_prowess: 0.0,
            defense: 0.0,
            hunt_energy_gain: 0.0,
            metabolic_rate: 0.0,
        },
        communication: CommunicationEncoding {
            signal_strength: 0.0,
            sensitivity: 0.0,
            frequency: 0.0,
            trust: 0.0,
            social_response: 0.0,
            memory_duration: 0.0,
        },
        tools: ToolEncoding {
            construction_skill: 0.0,
            gathering_skill: 0.0,
        },
        lineage_id: Uuid::from_u128(rng.gen::<u128>()),
        color: (rng.gen(), rng.gen(), rng.gen()),
    };
    for gene in Gene::ALL {
        let range = gene.range();
        gene.set(&mut genome, rng.gen_range(range.min..=range.max));
    }
    genome
}
