use std::time::Duration;

use clap::Subcommand;
use lazyriver_core::journal::{NewSession, SessionTag};
use lazyriver_core::timer::{BreathConfig, BreathRunner, BreathTimer, Phase};
use lazyriver_core::{Config, Event};
use tokio::sync::oneshot;

use super::{mark_today, open_store, CliResult, SAVED_TOAST};

#[derive(Subcommand)]
pub enum BreatheAction {
    /// Emergency Dinghy: three breaths, in 3, out 6
    Dinghy {
        /// Quick note saved with the session
        #[arg(long)]
        note: Option<String>,
        /// Tick period in milliseconds
        #[arg(long, hide = true, default_value_t = 1000)]
        tick_ms: u64,
    },
    /// Ratio timer
    Timer {
        /// Breathing ratio (defaults to timer.default_preset)
        #[arg(long, value_parser = ["2:4", "3:6", "4:8"])]
        preset: Option<String>,
        /// Number of rounds (defaults to timer.rounds)
        #[arg(long)]
        rounds: Option<u32>,
        /// Tick period in milliseconds
        #[arg(long, hide = true, default_value_t = 1000)]
        tick_ms: u64,
    },
}

pub fn run(action: BreatheAction) -> CliResult {
    let config = Config::load_or_default();

    let (breath, tag, note, tick_ms) = match action {
        BreatheAction::Dinghy { note, tick_ms } => {
            (config.dinghy_config()?, SessionTag::Dinghy, note, tick_ms)
        }
        BreatheAction::Timer {
            preset,
            rounds,
            tick_ms,
        } => (
            config.timer_config(preset.as_deref(), rounds)?,
            SessionTag::Timer,
            None,
            tick_ms,
        ),
    };

    if tag == SessionTag::Dinghy {
        println!(
            "Three breaths. In {}, out {}. No drama.",
            breath.inhale_secs, breath.exhale_secs
        );
    }
    guide(breath, Duration::from_millis(tick_ms.max(1)), |line| println!("{line}"))?;

    let store = open_store()?;
    let mut session = NewSession::from_config(&breath, tag);
    if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
        session = session.with_note(note);
    }
    let saved = store.save_session(session)?;
    let marked = mark_today(&store)?;
    tracing::debug!(?marked, "exercise recorded");

    if tag == SessionTag::Dinghy {
        println!("Dinghy deployed. You stayed in the boat.");
    }
    println!("{SAVED_TOAST} ({} {}, {}s)", saved.tag, saved.ratio, saved.duration_sec);
    Ok(())
}

/// Run one exercise to completion, handing each progress line to `emit`.
/// Returns once the timer's completion callback has fired.
fn guide(breath: BreathConfig, period: Duration, mut emit: impl FnMut(&str)) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let (done_tx, mut done_rx) = oneshot::channel();
        let timer = BreathTimer::new(breath)?.on_complete(move || {
            let _ = done_tx.send(());
        });
        let mut runner = BreathRunner::with_period(timer, period);
        let mut events = runner.take_events().ok_or("timer events unavailable")?;
        runner.start();

        loop {
            tokio::select! {
                Some(event) = events.recv() => {
                    if let Some(line) = render(&event, &breath) {
                        emit(&line);
                    }
                }
                finished = &mut done_rx => {
                    finished.map_err(|_| "timer stopped before completing")?;
                    break;
                }
            }
        }

        // The completing tick's event is published after the callback.
        runner.join().await;
        while let Ok(event) = events.try_recv() {
            if let Some(line) = render(&event, &breath) {
                emit(&line);
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn render(event: &Event, breath: &BreathConfig) -> Option<String> {
    let line = |phase: Phase, count: u32, round: u32| {
        format!(
            "{} {count} of {}  ·  Round {round} of {}",
            phase.label(),
            breath.limit(phase),
            breath.rounds
        )
    };
    match event {
        Event::BreathStarted { .. } => Some(line(Phase::In, 1, 1)),
        Event::BreathTick {
            phase,
            count,
            round,
            ..
        } => Some(line(*phase, *count, *round)),
        Event::PhaseChanged { phase, round, .. } => Some(line(*phase, 1, *round)),
        Event::BreathCompleted { .. } => Some("Timer finished.".to_string()),
        _ => None,
    }
}
