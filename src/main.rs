use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use cgmath::point2;
use structopt::StructOpt;

use platformer_motion::{
    controller::Spawn,
    input::{Button, InputState},
    logging,
    physics::PhysicsTable,
    simulation::Simulation,
};

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scenario {
    Walk,
    Run,
    Skid,
    Jump,
    RunningJump,
    RunRelease,
}

impl Scenario {
    /// Buttons held down on `tick` of a `ticks` long run.
    fn held_buttons(&self, tick: u32, ticks: u32) -> Vec<Button> {
        let first_half = tick < ticks / 2;
        match self {
            Scenario::Walk => vec![Button::Right],
            Scenario::Run => vec![Button::Right, Button::Run],
            Scenario::Skid => {
                if first_half {
                    vec![Button::Right]
                } else {
                    vec![Button::Left]
                }
            }
            Scenario::Jump => {
                if (10..40).contains(&tick) {
                    vec![Button::Jump]
                } else {
                    vec![]
                }
            }
            Scenario::RunningJump => {
                let mut buttons = vec![Button::Right, Button::Run];
                if (60..90).contains(&tick) {
                    buttons.push(Button::Jump);
                }
                buttons
            }
            Scenario::RunRelease => {
                if first_half {
                    vec![Button::Right, Button::Run]
                } else {
                    vec![Button::Right]
                }
            }
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walk" => Ok(Scenario::Walk),
            "run" => Ok(Scenario::Run),
            "skid" => Ok(Scenario::Skid),
            "jump" => Ok(Scenario::Jump),
            "running-jump" => Ok(Scenario::RunningJump),
            "run-release" => Ok(Scenario::RunRelease),
            _ => Err(format!(
                "unknown scenario \"{}\" (expected walk, run, skid, jump, running-jump or run-release)",
                s
            )),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scenario::Walk => "walk",
            Scenario::Run => "run",
            Scenario::Skid => "skid",
            Scenario::Jump => "jump",
            Scenario::RunningJump => "running-jump",
            Scenario::RunRelease => "run-release",
        };
        write!(f, "{}", name)
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(StructOpt, Debug)]
#[structopt(name = "platformer-motion")]
struct Options {
    /// Tile size in pixels the motion constants are scaled to
    #[structopt(short, long, default_value = "32")]
    pixels_per_tile: f32,

    /// Scripted input: walk, run, skid, jump, running-jump or run-release
    #[structopt(short, long, default_value = "walk")]
    scenario: Scenario,

    /// Number of ticks to simulate
    #[structopt(short, long, default_value = "120")]
    ticks: u32,

    /// Ticks per second
    #[structopt(long, default_value = "60")]
    tick_rate: f32,

    /// Log every state transition
    #[structopt(short, long)]
    verbose: bool,

    /// Print the derived physics table and exit
    #[structopt(long)]
    dump_table: bool,
}

// ---------------------------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    let opt = Options::from_args();
    logging::init(opt.verbose);

    let physics = PhysicsTable::new(opt.pixels_per_tile)
        .with_context(|| format!("Unable to build physics table for {:?}", opt))?;

    if opt.dump_table {
        println!("{:#?}", physics);
        return Ok(());
    }

    if !(opt.tick_rate.is_finite() && opt.tick_rate > 0.0) {
        bail!("tick rate must be a positive number (got {})", opt.tick_rate);
    }
    let dt = Duration::from_secs_f32(1.0 / opt.tick_rate);

    log::info!(
        "Running \"{}\" for {} ticks at {} Hz, {} px/tile",
        opt.scenario,
        opt.ticks,
        opt.tick_rate,
        opt.pixels_per_tile
    );

    run(Arc::new(physics), opt.scenario, opt.ticks, dt);
    Ok(())
}

fn run(physics: Arc<PhysicsTable>, scenario: Scenario, ticks: u32, dt: Duration) {
    let mut sim = Simulation::new(physics, point2(0.0, 0.0), 0.0, Spawn::Grounded);
    let mut input = InputState::default();
    let mut last_state = sim.state();

    println!(
        "{:>5} {:>8} {:<22} {:>9} {:>9} {:>9} {:>9} {:<5} {:<5}",
        "tick", "time", "state", "x", "y", "vx", "vy", "cycle", "face"
    );

    for tick in 0..ticks {
        let held = scenario.held_buttons(tick, ticks);
        for button in &Button::ALL {
            input.process_button(*button, held.contains(button));
        }

        sim.step(dt, &input.snapshot());
        input.update();

        let state = sim.state();
        if state != last_state {
            log::info!(
                "tick {}: {} -> {}",
                sim.tick(),
                last_state.map_or("none", |s| s.name()),
                state.map_or("none", |s| s.name())
            );
            last_state = state;
        }

        println!(
            "{:>5} {:>8.3} {:<22} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:<5} {:<5}",
            sim.tick(),
            sim.elapsed().as_secs_f32(),
            state.map_or("none", |s| s.name()),
            sim.body.position.x,
            sim.body.position.y,
            sim.body.velocity.x,
            sim.body.velocity.y,
            sim.presentation.cycle,
            format!("{:?}", sim.presentation.facing)
        );
    }
}
