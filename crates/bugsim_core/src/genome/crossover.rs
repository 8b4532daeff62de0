use crate::neural::NeuralLogic;
use bugsim_data::{Gene, Genome};
use rand::Rng;

/// Uniform crossover: every gene comes from either parent with equal odds.
///
/// The neural encoding is reconciled structurally; species kind, lineage
/// and each colour channel are inherited by the same 50/50 rule.
pub fn crossover_with_rng<R: Rng>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
    let mut child = a.clone();
    child.neural = a.neural.crossover_with_rng(&b.neural, rng);

    for gene in Gene::ALL {
        if rng.gen_bool(0.5) {
            gene.set(&mut child, gene.get(b));
        }
    }

    if rng.gen_bool(0.5) {
        child.species.kind = b.species.kind;
    }
    if rng.gen_bool(0.5) {
        child.lineage_id = b.lineage_id;
    }
    let picks: [bool; 3] = rng.gen();
    let pick = |from_a: bool, x: u8, y: u8| if from_a { x } else { y };
    child.color = (
        pick(picks[0], a.color.0, b.color.0),
        pick(picks[1], a.color.1, b.color.1),
        pick(picks[2], a.color.2, b.color.2),
    );
    child
}
