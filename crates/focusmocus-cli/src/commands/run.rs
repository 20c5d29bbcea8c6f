//! The screensaver: clock, quote and Pomodoro timer redrawn every second.
//!
//! Timer controls and settings edits are typed as lines on stdin:
//! an empty line toggles the timer, `start`, `pause`, `reset` and `quit` do
//! what they say, `set <key> <value>` changes a setting on the fly.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use clap::Args;
use focusmocus_core::clock::{format_clock, format_countdown};
use focusmocus_core::quotes::ROTATION_PERIOD;
use focusmocus_core::{
    Chime, Command, Database, FocusSession, KvStore, MemoryStore, Phase, QuoteRotator, Settings,
    SettingsPatch, SettingsStore, SilentChime, TerminalBell, TimerSnapshot,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval, interval_at, Instant};

const REFRESH_PERIOD: Duration = Duration::from_secs(1);
const PROGRESS_WIDTH: usize = 20;
const HELP: &str = "[enter] start/pause | reset | set <key> <value> | quit";

#[derive(Args)]
pub struct RunArgs {
    /// Do not ring the terminal bell when a phase ends
    #[arg(long)]
    no_bell: bool,
    /// Keep settings in memory only; nothing is read from or written to disk
    #[arg(long)]
    ephemeral: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    tracing::info!(ephemeral = args.ephemeral, bell = !args.no_bell, "starting screensaver");
    let result = if args.ephemeral {
        runtime.block_on(screensaver(MemoryStore::new(), &args))
    } else {
        let db = Database::open()?;
        runtime.block_on(screensaver(db, &args))
    };
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();
    result
}

/// A line typed while the screensaver runs.
#[derive(Debug, PartialEq)]
enum Input {
    Timer(Command),
    Set(SettingsPatch),
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let input = match words.next() {
        None | Some("toggle") => Input::Timer(Command::Toggle),
        Some("start") => Input::Timer(Command::Start),
        Some("pause") => Input::Timer(Command::Pause),
        Some("reset") => Input::Timer(Command::Reset),
        Some("quit" | "exit" | "q") => Input::Timer(Command::Quit),
        Some("set") => {
            let (Some(key), Some(value), None) = (words.next(), words.next(), words.next()) else {
                return Err("usage: set <key> <value>".to_string());
            };
            let patch = SettingsPatch::from_pair(key, value).map_err(|e| e.to_string())?;
            Input::Set(patch)
        }
        Some(other) => return Err(format!("unknown command: {other}")),
    };
    Ok(input)
}

async fn screensaver<S: KvStore>(
    store: S,
    args: &RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsStore::open(store);
    let chime: Arc<dyn Chime> = if args.no_bell {
        Arc::new(SilentChime)
    } else {
        Arc::new(TerminalBell)
    };

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let (commands, commands_rx) = mpsc::channel(16);
    let session = FocusSession::new(settings.subscribe(), chime, events_tx);
    let mut snapshots = session.snapshots();
    let session_task = tokio::spawn(session.run(commands_rx));

    let (lines_tx, mut lines) = mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            if lines_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mut quotes = QuoteRotator::restore(settings.store());
    quotes.remember(settings.store());
    let mut refresh = interval(REFRESH_PERIOD);
    let mut rotation = interval_at(Instant::now() + ROTATION_PERIOD, ROTATION_PERIOD);
    let mut notice: Option<String> = None;

    loop {
        tokio::select! {
            _ = refresh.tick() => {}
            _ = rotation.tick() => {
                quotes.advance();
                quotes.remember(settings.store());
            }
            Some(event) = events.recv() => {
                if let Some(phase) = event.phase_change() {
                    notice = Some(format!("{} started", phase_title(phase)));
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            line = lines.recv() => match line.as_deref().map(parse_input) {
                None | Some(Ok(Input::Timer(Command::Quit))) => break,
                Some(Ok(Input::Timer(cmd))) => {
                    if commands.send(cmd).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Input::Set(patch))) => {
                    notice = Some(match settings.update(&patch) {
                        Ok(_) => "settings saved".to_string(),
                        Err(e) => e.to_string(),
                    });
                }
                Some(Err(msg)) => notice = Some(msg),
            },
        }

        let timer = *snapshots.borrow();
        let screen = frame(
            &settings.settings(),
            &timer,
            quotes.current(),
            notice.as_deref(),
            &Local::now(),
        );
        // Clear the screen and home the cursor before each frame.
        print!("\x1b[2J\x1b[H{screen}");
    }

    let _ = commands.send(Command::Quit).await;
    session_task.await?;
    Ok(())
}

fn phase_title(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::Work => "Focus",
        Phase::ShortBreak => "Short break",
        Phase::LongBreak => "Long break",
    }
}

fn progress_bar(timer: &TimerSnapshot) -> String {
    let total = timer.total_seconds.max(1) as usize;
    let elapsed = total.saturating_sub(timer.time_left_seconds as usize);
    let filled = (elapsed * PROGRESS_WIDTH / total).min(PROGRESS_WIDTH);
    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(PROGRESS_WIDTH - filled)
    )
}

/// Render one screen. Pure so it can be tested without a terminal.
fn frame(
    settings: &Settings,
    timer: &TimerSnapshot,
    quote: &str,
    notice: Option<&str>,
    now: &DateTime<Local>,
) -> String {
    let mut lines = Vec::new();

    if settings.pomodoro_enabled {
        let mut heading = timer.phase.label(timer.cycle_count).to_uppercase();
        if !timer.is_active && timer.phase != Phase::Idle {
            heading.push_str(" (paused)");
        }
        lines.push(heading);
        lines.push(format!(
            "{}  {}",
            format_countdown(timer.time_left_seconds),
            progress_bar(timer)
        ));
        lines.push(String::new());
    }

    lines.push(format_clock(now, settings.show_seconds));
    lines.push(String::new());
    lines.push(format!("\"{quote}\""));
    lines.push(String::new());
    if let Some(notice) = notice {
        lines.push(notice.to_string());
    }
    lines.push(HELP.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot(phase: Phase, left: u32, total: u32, active: bool, cycles: u32) -> TimerSnapshot {
        TimerSnapshot {
            phase,
            time_left_seconds: left,
            total_seconds: total,
            is_active: active,
            cycle_count: cycles,
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap()
    }

    #[test]
    fn parse_timer_commands() {
        assert_eq!(parse_input(""), Ok(Input::Timer(Command::Toggle)));
        assert_eq!(parse_input("  start "), Ok(Input::Timer(Command::Start)));
        assert_eq!(parse_input("pause"), Ok(Input::Timer(Command::Pause)));
        assert_eq!(parse_input("reset"), Ok(Input::Timer(Command::Reset)));
        assert_eq!(parse_input("q"), Ok(Input::Timer(Command::Quit)));
    }

    #[test]
    fn parse_set_builds_patch() {
        let input = parse_input("set workMinutes 30").unwrap();
        let Input::Set(patch) = input else {
            panic!("Expected Set, got {input:?}");
        };
        assert_eq!(patch.work_minutes, Some(30));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_input("dance").is_err());
        assert!(parse_input("set workMinutes").is_err());
        assert!(parse_input("set workMinutes 0").is_err());
        assert!(parse_input("set workMinutes 5 extra").is_err());
    }

    #[test]
    fn progress_bar_fills_with_elapsed_time() {
        assert_eq!(
            progress_bar(&snapshot(Phase::Work, 1500, 1500, true, 0)),
            format!("[{}]", ".".repeat(20))
        );
        assert_eq!(
            progress_bar(&snapshot(Phase::Work, 750, 1500, true, 0)),
            format!("[{}{}]", "#".repeat(10), ".".repeat(10))
        );
        assert_eq!(
            progress_bar(&snapshot(Phase::Work, 0, 1500, true, 0)),
            format!("[{}]", "#".repeat(20))
        );
    }

    #[test]
    fn frame_shows_timer_clock_and_quote() {
        let out = frame(
            &Settings::default(),
            &snapshot(Phase::Work, 1499, 1500, true, 2),
            "Keep going.",
            None,
            &noon(),
        );
        assert!(out.contains("FOCUS #3"));
        assert!(out.contains("24:59"));
        assert!(out.contains("12:34:56"));
        assert!(out.contains("\"Keep going.\""));
        assert!(!out.contains("(paused)"));
    }

    #[test]
    fn frame_marks_paused_and_hides_seconds() {
        let settings = Settings {
            show_seconds: false,
            ..Settings::default()
        };
        let out = frame(
            &settings,
            &snapshot(Phase::ShortBreak, 120, 300, false, 1),
            "q",
            Some("settings saved"),
            &noon(),
        );
        assert!(out.contains("SHORT BREAK (paused)"));
        assert!(out.contains("12:34\n"));
        assert!(!out.contains("12:34:56"));
        assert!(out.contains("settings saved"));
    }

    #[test]
    fn frame_without_pomodoro_has_no_timer() {
        let settings = Settings {
            pomodoro_enabled: false,
            ..Settings::default()
        };
        let out = frame(
            &settings,
            &snapshot(Phase::Idle, 1500, 1500, false, 0),
            "q",
            None,
            &noon(),
        );
        assert!(!out.contains("READY TO FOCUS"));
        assert!(!out.contains("25:00"));
        assert!(out.starts_with("12:34:56"));
    }
}
