//! Tests for the simulation clock

use preemption_sim_core::{Clock, Environment, EnvironmentConfig, PolicyConfig};

#[test]
fn test_clock_starts_at_zero() {
    let clock = Clock::new();
    assert_eq!(clock.current_tick(), 0);
}

#[test]
fn test_clock_strictly_increases_by_one() {
    let mut clock = Clock::new();
    let mut previous = clock.current_tick();

    for _ in 0..50 {
        let now = clock.advance_tick();
        assert_eq!(now, previous + 1);
        previous = now;
    }
}

#[test]
fn test_environment_clock_matches_tick_results() {
    let config = EnvironmentConfig::new(PolicyConfig::Random)
        .with_region("r1", 0.2)
        .with_job("job0");
    let mut env = Environment::new(config).unwrap();
    assert_eq!(env.current_tick(), 0);

    for expected in 1..=10 {
        let result = env.tick().unwrap();
        assert_eq!(result.tick, expected);
        assert_eq!(env.current_tick(), expected);
    }
}
