use rand::seq::SliceRandom;

use lazyriver_core::Config;

use super::{open_store, CliResult};

const DISCLAIMERS: [&str; 5] = [
    "Your data stays local. This isn't health care, it's nostril care.",
    "Saved here, not in the cloud. No HIPAA, just hiccups.",
    "Stored on this device. Not medical advice, but it may lower drama per minute.",
    "No servers, no side effects. Just you and your alveoli.",
    "This app is not FDA-approved, unless the F stands for Floating Downstream Association.",
];

pub fn run() -> CliResult {
    let config = Config::load_or_default();
    let store = open_store()?;

    let streak = store.streak();
    println!("Lazy River Breathing");
    println!("Streak: {streak} day{}", if streak == 1 { "" } else { "s" });
    println!("Sessions today: {}", store.today_session_count());

    let challenge = store.challenge_status();
    println!("Challenge: {}/{}", challenge.days_done, challenge.total);
    if challenge.certificate_eligible {
        println!("14-Day Drift complete. Your certificate is ready.");
    }

    if config.ui.show_disclaimer {
        if let Some(line) = DISCLAIMERS.choose(&mut rand::thread_rng()) {
            println!();
            println!("{line}");
        }
    }
    Ok(())
}
