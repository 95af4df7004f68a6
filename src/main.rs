//! Flower Farm entry point
//!
//! Native builds run a headless demo session: the clock advances in fixed
//! frames and a simple auto-player clicks flowers. Events are logged the way
//! a HUD would consume them (set `RUST_LOG=info` or `debug`).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use flower_farm::sim::GameState;
    use flower_farm::{HighScores, ScoreSubmission, Settings};

    env_logger::init();
    log::info!("Flower Farm (native demo) starting...");

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let key = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings.difficulty.as_str().to_string());

    let mut state = GameState::new(settings.layout);
    if let Err(e) = state.start(&key) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let clicks = run_demo(&mut state);
    let summary = state.summary();
    println!(
        "Game over on {}: {} points, max streak {}, level {} ({} clicks)",
        summary.difficulty.map_or("custom", |d| d.as_str()),
        summary.score,
        summary.max_streak,
        summary.level,
        clicks
    );

    let initials = settings.initials.as_deref().unwrap_or("CPU");
    match ScoreSubmission::new(initials, summary.score) {
        Ok(submission) => {
            if let Ok(body) = submission.to_json() {
                println!("POST /scores/ {body}");
            }
            let mut board = HighScores::new();
            if let Some(rank) = board.add_score(submission, state.now_ms() as f64) {
                println!("Local rank #{rank}");
            }
        }
        Err(e) => log::warn!("Not submitting score: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
const SETTINGS_FILE: &str = "flower_farm_settings.json";

/// Frame length of the demo loop (~60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: u64 = 16;

/// Auto-player reaction time between clicks
#[cfg(not(target_arch = "wasm32"))]
const CLICK_INTERVAL_MS: u64 = 350;

/// Play until the session ends; returns the number of clicks made
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(state: &mut flower_farm::sim::GameState) -> u32 {
    use flower_farm::sim::{GameEvent, GridLayout, resolve_click, tick};
    use rand::SeedableRng;
    use rand::seq::IteratorRandom;
    use rand_pcg::Pcg32;

    let layout = GridLayout::centered(state.layout, 1024.0);
    let mut player = Pcg32::from_rng(&mut rand::rng());
    let mut since_click = 0;
    let mut clicks = 0;

    while state.is_active() {
        tick(state, FRAME_MS);
        since_click += FRAME_MS;

        if since_click >= CLICK_INTERVAL_MS && state.is_active() {
            since_click = 0;
            // Mostly avoids pests, but fumbles now and then
            let candidates: Vec<_> = state
                .items
                .iter()
                .filter(|item| !item.kind.is_harmful() || player_fumbles(&mut player))
                .map(|item| item.cell)
                .collect();
            let target = candidates.into_iter().choose(&mut player);
            if let Some(cell) = target {
                if let Some(outcome) =
                    resolve_click(state, layout.cell_center(cell), &layout)
                {
                    clicks += 1;
                    log::debug!("Auto-click {:?}: {:+}", outcome.kind, outcome.delta);
                }
            }
        }

        for event in state.drain_events() {
            match event {
                GameEvent::ScoreChanged { score } => log::info!("Score: {}", score),
                GameEvent::TimeChanged { seconds } => log::info!("Time: {}s", seconds),
                GameEvent::ComboChanged { streak, multiplier } => {
                    log::info!("Combo: {} (x{})", streak, multiplier)
                }
                GameEvent::DifficultyChanged { level } => log::info!("Level {}", level),
                GameEvent::GameEnded { final_score } => {
                    log::info!("Game ended with {} points", final_score)
                }
                other => log::trace!("{:?}", other),
            }
        }
    }
    clicks
}

#[cfg(not(target_arch = "wasm32"))]
fn player_fumbles(rng: &mut rand_pcg::Pcg32) -> bool {
    use rand::Rng;
    rng.random_bool(0.1)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `flower_farm::sim` directly
}
