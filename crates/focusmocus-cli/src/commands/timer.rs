use clap::Subcommand;
use focusmocus_core::clock::format_countdown;
use focusmocus_core::{Database, Phase, PomodoroEngine, Settings, SettingsStore};
use serde::Serialize;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Preview the upcoming phases for the current settings
    Plan {
        /// Number of phases to list
        #[arg(short, long, default_value = "8")]
        phases: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlannedPhase {
    phase: Phase,
    label: String,
    duration_secs: u32,
    starts_after_secs: u64,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Plan { phases, json } => {
            let settings = SettingsStore::open(Database::open()?).settings();
            let plan = plan(&settings, phases);
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                for (i, p) in plan.iter().enumerate() {
                    println!(
                        "{:>2}. {:<12} {:>6}  (+{})",
                        i + 1,
                        p.label,
                        format_countdown(p.duration_secs),
                        format_countdown(u32::try_from(p.starts_after_secs).unwrap_or(u32::MAX)),
                    );
                }
            }
        }
    }
    Ok(())
}

/// Run an engine forward phase by phase, recording each phase as it begins.
fn plan(settings: &Settings, count: usize) -> Vec<PlannedPhase> {
    let mut engine = PomodoroEngine::new(settings);
    let mut elapsed: u64 = 0;
    let mut out = Vec::with_capacity(count);
    engine.start();

    while out.len() < count {
        out.push(PlannedPhase {
            phase: engine.phase(),
            label: engine.phase_label(),
            duration_secs: engine.time_left_secs(),
            starts_after_secs: elapsed,
        });
        elapsed += u64::from(engine.time_left_secs());
        while engine.tick().is_none() {}
    }
    out
}
