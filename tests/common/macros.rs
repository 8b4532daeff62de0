/// Asserts that an agent with the given ID has at least the specified amount of energy.
#[macro_export]
macro_rules! assert_energy_above {
    ($world:expr, $id:expr, $min_energy:expr) => {
        let agent = $world
            .population
            .get(&$id)
            .expect("Agent not found in world");
        assert!(
            agent.physiology.energy > $min_energy,
            "Agent {} energy {} is not above {}",
            $id,
            agent.physiology.energy,
            $min_energy
        );
    };
}

/// Asserts that an agent with the given ID is NOT present in the world (dead/removed).
#[macro_export]
macro_rules! assert_agent_dead {
    ($world:expr, $id:expr) => {{
        assert!(
            !$world.population.contains(&$id),
            "Agent {} should be dead but was found alive",
            $id
        );
    }};
}

/// Asserts that the total population count matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!($world.population.len(), $count, "Population count mismatch");
    };
}
