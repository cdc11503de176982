//! Sky Ace entry point
//!
//! Headless runner: the demo pilot plays a seeded session at a fixed step,
//! logging a summary per game and keeping the persisted high score current.
//!
//! Usage: `sky-ace [seed] [frames] [--dump]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, Result, anyhow};

    use sky_ace::HighScore;
    use sky_ace::Settings;
    use sky_ace::persistence::{Storage, default_storage};
    use sky_ace::platform::clock_seed;
    use sky_ace::sim::{GameEvent, SimContext, steer, tick};

    /// One minute of play at 60 ticks per second
    const DEFAULT_FRAMES: u64 = 3600;

    #[derive(Debug, PartialEq)]
    pub struct Args {
        pub seed: Option<u64>,
        pub frames: u64,
        pub dump: bool,
    }

    /// Decimal or `0x`-prefixed hex seed
    pub fn parse_seed(seed: &str) -> Result<u64> {
        let s = seed.trim();
        if s.is_empty() {
            return Err(anyhow!("empty seed"));
        }
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
        } else {
            s.parse::<u64>()
                .with_context(|| format!("invalid decimal seed: {s}"))
        }
    }

    pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
        let mut positional = Vec::new();
        let mut dump = false;
        for arg in args {
            match arg.as_str() {
                "--dump" => dump = true,
                flag if flag.starts_with("--") => return Err(anyhow!("unknown flag {flag}")),
                _ => positional.push(arg),
            }
        }
        if positional.len() > 2 {
            return Err(anyhow!("usage: sky-ace [seed] [frames] [--dump]"));
        }

        let seed = positional.first().map(|s| parse_seed(s)).transpose()?;
        let frames = match positional.get(1) {
            Some(f) => f
                .parse::<u64>()
                .with_context(|| format!("invalid frame count: {f}"))?,
            None => DEFAULT_FRAMES,
        };
        Ok(Args { seed, frames, dump })
    }

    /// Write the record through as soon as the simulation reports it improved
    pub fn persist_record(
        event: &GameEvent,
        wave: u32,
        best: &mut HighScore,
        storage: &dyn Storage,
    ) {
        let improved = match *event {
            GameEvent::NewHighScore { score } => best.record(score, wave),
            GameEvent::GameOver { score, wave } => best.record(score, wave),
            _ => false,
        };
        if improved {
            best.save(storage);
        }
    }

    pub fn run() -> Result<()> {
        let args = parse_args(std::env::args().skip(1))?;
        let storage = default_storage();
        let settings = Settings::load(storage.as_ref());
        let mut best = HighScore::load(storage.as_ref());

        let mut ctx = SimContext::new(args.seed.unwrap_or_else(clock_seed), settings);
        log::info!(
            "Sky Ace (headless) starting with seed {} for {} frames",
            ctx.seed,
            args.frames
        );

        let mut game = ctx.new_game(best.score);
        let mut games = 0u32;

        for _ in 0..args.frames {
            let mut input = steer(&game);
            for event in tick(&mut game, &mut input, &mut ctx) {
                if let GameEvent::GameOver { score, wave } = event {
                    games += 1;
                    log::info!("Game {} over: score {} on wave {}", games, score, wave);
                }
                persist_record(&event, game.wave, &mut best, storage.as_ref());
            }
        }

        // Unfinished run may still hold the record
        if best.record(game.player.score, game.wave) {
            best.save(storage.as_ref());
        }
        log::info!(
            "Finished: {} games completed, current score {} on wave {}, best {}",
            games,
            game.player.score,
            game.wave,
            best.score
        );

        if args.dump {
            let json = serde_json::to_string_pretty(&game).context("failed encoding state")?;
            println!("{json}");
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    sky_ace::init_logging();
    match headless::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds are driven by the host page through the library
}
