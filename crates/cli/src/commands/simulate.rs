//! Headless scenario run.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use action_content::{ActionFactory, ContentFactory};
use action_core::{ActionEvent, ActionKind, ActorId, Animator, ExecEnv, PauseState, ScriptValue};
use action_runtime::{ActionRuntime, LinearMovement, ScriptRegistry, Topic};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Run a scenario for a number of ticks
///
/// Scripts are stubbed: start scripts report success, action scripts
/// complete on their first call.
#[derive(Parser)]
pub struct Simulate {
    /// Data directory holding `config.toml`, `actions/` and `worlds/`
    #[arg(short, long, value_name = "DIR", env = "ACTION_DATA_DIR")]
    data_dir: PathBuf,

    /// Scenario name, read from `worlds/<NAME>.ron`
    #[arg(short, long, value_name = "NAME")]
    world: String,

    /// Number of ticks to run
    #[arg(short, long, default_value = "10")]
    ticks: u32,

    /// Seconds of simulated time per tick
    #[arg(long, default_value = "0.5")]
    dt: f32,

    /// Movement speed in units per second
    #[arg(long, default_value = "1.0")]
    speed: f32,

    /// Restore queues and ledgers from a save file before running
    #[arg(long, value_name = "FILE")]
    restore: Option<PathBuf>,

    /// Write a save file after the run
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
}

/// Animator that only logs.
struct TraceAnimator;

impl Animator for TraceAnimator {
    fn set_animation(&mut self, actor: ActorId, animation: &str) {
        tracing::debug!(actor = %actor, animation, "animation");
    }
}

fn stub_scripts(factory: &ActionFactory) -> ScriptRegistry {
    let mut scripts = ScriptRegistry::new();
    for prototype in factory.prototypes() {
        if let Some(name) = prototype.script_on_start() {
            scripts.register_init(name, |_| 1);
        }
        if let Some(name) = prototype.script_on_end() {
            scripts.register(name, |_| Ok(ScriptValue::Unit));
        }
        if prototype.action_type().kind == ActionKind::RunScript {
            scripts.register_bool(prototype.name(), |_| true);
        }
    }
    scripts
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let content = ContentFactory::new(&self.data_dir);
        let config = content.load_config()?;
        let factory = content.load_actions()?;
        let scenario = content.load_world(&self.world)?;
        let mut scripts = stub_scripts(&factory);

        let mut runtime = ActionRuntime::builder()
            .config(config)
            .world(scenario.world)
            .factory(factory)
            .build();
        let mut receivers = runtime.events().subscribe_multiple(&Topic::ALL);

        match &self.restore {
            Some(path) => {
                let restored = runtime
                    .restore_from(path)
                    .with_context(|| format!("restoring {}", path.display()))?;
                tracing::info!(actions = restored, "save restored");
            }
            None => {
                let queued = runtime.enqueue_initial(&scenario.initial_actions)?;
                tracing::info!(actions = queued, world = %self.world, "scenario loaded");
            }
        }

        let mut movement = LinearMovement::new(self.speed);
        let mut animator = TraceAnimator;
        let mut env = ExecEnv::empty()
            .with_scripts(&mut scripts)
            .with_movement(&mut movement)
            .with_animator(&mut animator);
        let mut published = drain(&mut receivers);
        for tick in 0..self.ticks {
            let visited = runtime.tick(&mut env, self.dt, PauseState::Running);
            tracing::debug!(tick, visited, "tick");
            published += drain(&mut receivers);
        }
        drop(env);

        print_summary(&runtime, self.ticks, published);

        if let Some(path) = &self.save {
            runtime
                .save_to(path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        Ok(())
    }
}

/// Counts the events waiting on every topic.
fn drain(receivers: &mut HashMap<Topic, broadcast::Receiver<ActionEvent>>) -> usize {
    let mut count = 0;
    for receiver in receivers.values_mut() {
        loop {
            match receiver.try_recv() {
                Ok(_) => count += 1,
                Err(TryRecvError::Lagged(missed)) => count += usize::try_from(missed).unwrap_or(usize::MAX),
                Err(_) => break,
            }
        }
    }
    count
}

fn print_summary(runtime: &ActionRuntime, ticks: u32, events: usize) {
    println!(
        "{} {ticks} ticks, {events} events",
        style("=== Simulation Summary ===").bold().green()
    );
    for actor in runtime.world().actors() {
        println!();
        println!(
            "{} {} at {}",
            style(&actor.name).bold().yellow(),
            actor.id,
            actor.position
        );
        if let Some(queue) = &actor.action_queue {
            if queue.is_empty() {
                println!("  queue: empty");
            }
            for action in queue.iter() {
                let name = action
                    .prototype()
                    .map_or_else(|| action.script_name().to_owned(), |p| p.name().to_owned());
                println!("  queued: {} [{}]", name, action.action_type());
            }
        }
        if let Some(ledger) = &actor.object_owner {
            for (object, holding) in ledger.iter() {
                println!(
                    "  owns:   {object} current={} planned={}",
                    holding.current, holding.planned
                );
            }
        }
    }
}
