//! Preemption Simulator demo driver
//!
//! Runs the reference scenario: two regions with a 10% per-tick preemption
//! probability, ten jobs and the random policy, for 100 ticks. Set
//! `RUST_LOG=preemption_sim_core=debug` to see every placement and eviction.

use preemption_sim_core::{Environment, EnvironmentConfig, PolicyConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const NUM_JOBS: usize = 10;
const NUM_TICKS: usize = 100;
const RNG_SEED: u64 = 12345;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "preemption_sim=info,preemption_sim_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EnvironmentConfig::new(PolicyConfig::from_name("random")?)
        .with_seed(RNG_SEED)
        .with_region("r1", 0.1)
        .with_region("r2", 0.1)
        .with_jobs((0..NUM_JOBS).map(|i| format!("job{}", i)));

    let mut env = Environment::new(config)?;
    let results = env.run(NUM_TICKS)?;

    let preemptions: usize = results.iter().map(|r| r.num_preemptions).sum();
    info!(ticks = env.current_tick(), preemptions, "simulation complete");

    println!("{:<10} {:>10} {:>12} {:>10}", "Job", "Uptime", "Preemptions", "Region");
    println!("{}", "-".repeat(45));
    for job in env.jobs() {
        let region = job
            .region()
            .and_then(|id| env.state().region(id))
            .map(|r| r.name())
            .unwrap_or("-");
        println!(
            "{:<10} {:>10} {:>12} {:>10}",
            job.name(),
            job.total_running_time(),
            job.num_preemptions(),
            region
        );
    }

    println!("\n{}", env.summary().to_json_pretty()?);

    Ok(())
}
