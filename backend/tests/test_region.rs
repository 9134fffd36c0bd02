//! Tests for Region eviction behavior

use preemption_sim_core::{
    EvictionRecord, Job, JobId, Region, RegionError, RegionId, RngManager, ScriptedRng,
    SimulationState, StateError,
};

fn state_with(p: f64, jobs: usize) -> SimulationState {
    let mut state = SimulationState::new(vec![Region::new("r1", p).unwrap()]);
    for i in 0..jobs {
        let id = state.add_job(Job::new(format!("job{}", i)));
        state.place(id, RegionId(0)).unwrap();
    }
    state
}

#[test]
fn test_zero_probability_never_evicts() {
    let mut state = state_with(0.0, 5);
    let mut rng = RngManager::new(31337);

    for t in 1..=1000 {
        state.tick_jobs(t);
        assert!(state.tick_region(RegionId(0), t, &mut rng).unwrap().is_empty());
    }

    assert_eq!(state.region(RegionId(0)).unwrap().num_jobs(), 5);
    assert!(state.region(RegionId(0)).unwrap().history().is_empty());
    assert!(state.jobs().iter().all(|j| j.num_preemptions() == 0));
}

#[test]
fn test_certain_probability_evicts_everyone() {
    let mut state = state_with(1.0, 4);
    let mut rng = RngManager::new(5);

    state.tick_jobs(1);
    let evictions = state.tick_region(RegionId(0), 1, &mut rng).unwrap();

    assert_eq!(evictions.len(), 4);
    let region = state.region(RegionId(0)).unwrap();
    assert_eq!(region.num_jobs(), 0);
    assert_eq!(
        region.history(),
        &[EvictionRecord {
            tick: 1,
            evicted: (0..4).map(|i| format!("job{}", i)).collect(),
            remaining: vec![],
        }]
    );
}

#[test]
fn test_one_history_entry_per_evicting_tick() {
    let mut state = state_with(0.5, 3);
    // Tick 1: evict job0 and job1; tick 2: nothing; tick 3: evict job2
    let mut rng = ScriptedRng::new(0.9).with_samples([0.1, 0.2, 0.9, 0.9, 0.4]);

    for t in 1..=3 {
        state.tick_jobs(t);
        state.tick_region(RegionId(0), t, &mut rng).unwrap();
    }

    let history = state.region(RegionId(0)).unwrap().history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].tick, 1);
    assert_eq!(history[0].remaining, vec!["job2".to_string()]);
    assert_eq!(history[1].tick, 3);
    assert_eq!(history[1].evicted, vec!["job2".to_string()]);
    assert!(history[1].remaining.is_empty());
}

#[test]
fn test_evicting_absent_job_is_precondition_violation() {
    let mut state = SimulationState::new(vec![Region::new("r1", 0.1).unwrap()]);
    let id = state.add_job(Job::new("job0"));

    let err = state.evict(RegionId(0), id).unwrap_err();
    assert_eq!(
        err,
        StateError::Region(RegionError::JobNotInRegion {
            region: "r1".to_string(),
            job: JobId(0),
        })
    );
    assert_eq!(state.job(id).unwrap().num_preemptions(), 0);
}

#[test]
fn test_regions_draw_independently() {
    let mut state = SimulationState::new(vec![
        Region::new("r1", 0.5).unwrap(),
        Region::new("r2", 0.5).unwrap(),
    ]);
    let a = state.add_job(Job::new("a"));
    let b = state.add_job(Job::new("b"));
    state.place(a, RegionId(0)).unwrap();
    state.place(b, RegionId(1)).unwrap();

    // r1 draws 0.7 (keeps a), r2 draws 0.3 (evicts b)
    let mut rng = ScriptedRng::new(0.9).with_samples([0.7, 0.3]);
    state.tick_region(RegionId(0), 1, &mut rng).unwrap();
    state.tick_region(RegionId(1), 1, &mut rng).unwrap();

    assert!(state.job(a).unwrap().is_assigned());
    assert!(!state.job(b).unwrap().is_assigned());
    assert_eq!(rng.samples_drawn(), 2);
}
