//! Wheeliepoppers entry point
//!
//! Native: leaderboard server, headless demo matches, leaderboard admin.
//! The browser build enters through `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::{Parser, Subcommand};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use wheeliepoppers::audio::Mixer;
    use wheeliepoppers::{Settings, Tuning};
    use wheeliepoppers::leaderboard::{LeaderboardService, Submission};
    use wheeliepoppers::persistence::FileBlobStore;
    use wheeliepoppers::platform::server;
    use wheeliepoppers::sim::{Boundaries, GameEvent, GameMode, MatchState, TickInput, tick};

    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// Serve the leaderboard API over HTTP
        Serve {
            /// Address to bind
            #[arg(long, default_value = "127.0.0.1:8787")]
            addr: String,

            /// Directory holding the leaderboard blob
            #[arg(long, default_value = "data")]
            data_dir: PathBuf,
        },

        /// Run an AI-vs-AI match without a window
        Simulate {
            #[arg(long, default_value = "1")]
            seed: u64,

            /// Give up after this many ticks
            #[arg(long, default_value = "36000")]
            max_ticks: u64,

            /// JSON tuning file (missing fields use defaults)
            #[arg(long)]
            tuning: Option<PathBuf>,

            #[arg(long, default_value = "1280")]
            width: f32,

            #[arg(long, default_value = "720")]
            height: f32,

            /// Print every event as a JSON line
            #[arg(long)]
            events: bool,

            /// Settings file; with --events, also print the sound/voice cues
            #[arg(long)]
            settings: Option<PathBuf>,
        },

        /// Show or change the stored player preferences
        Settings {
            #[arg(long, default_value = "settings.json")]
            path: PathBuf,
            #[arg(long)]
            muted: Option<bool>,
            #[arg(long)]
            master_volume: Option<f32>,
            #[arg(long)]
            sfx_volume: Option<f32>,
            #[arg(long)]
            music_volume: Option<f32>,
            #[arg(long)]
            music: Option<bool>,
            #[arg(long)]
            speech: Option<bool>,
        },

        /// Inspect or edit the stored leaderboard
        Leaderboard {
            #[command(subcommand)]
            action: LeaderboardAction,

            #[arg(long, default_value = "data", global = true)]
            data_dir: PathBuf,
        },
    }

    #[derive(Subcommand, Debug)]
    enum LeaderboardAction {
        /// Print the current standings
        Show,
        /// Submit a score as if it came from the API
        Submit {
            #[arg(long)]
            name: String,
            #[arg(long)]
            score: i64,
            #[arg(long)]
            emoji: Option<String>,
            /// Record a jackpot win of this amount
            #[arg(long)]
            prize: Option<i64>,
        },
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let args = Args::parse();
        match args.command {
            Command::Serve { addr, data_dir } => {
                let store = FileBlobStore::open(&data_dir)
                    .with_context(|| format!("opening data dir {}", data_dir.display()))?;
                let service = LeaderboardService::new(store);
                server::serve(&addr, &service)
            }
            Command::Simulate {
                seed,
                max_ticks,
                tuning,
                width,
                height,
                events,
                settings,
            } => {
                let tuning = match tuning {
                    Some(path) => Tuning::load(&path)
                        .with_context(|| format!("loading tuning {}", path.display()))?,
                    None => Tuning::default(),
                };
                let mixer = settings.map(|path| Mixer::from_settings(&Settings::load_from(path)));
                simulate(seed, max_ticks, tuning, width, height, events, mixer)
            }
            Command::Settings {
                path,
                muted,
                master_volume,
                sfx_volume,
                music_volume,
                music,
                speech,
            } => {
                let mut settings = Settings::load_from(&path);
                let changed = [muted, music, speech].iter().any(Option::is_some)
                    || [master_volume, sfx_volume, music_volume]
                        .iter()
                        .any(Option::is_some);
                if let Some(v) = muted {
                    settings.muted = v;
                }
                if let Some(v) = master_volume {
                    settings.master_volume = v;
                }
                if let Some(v) = sfx_volume {
                    settings.sfx_volume = v;
                }
                if let Some(v) = music_volume {
                    settings.music_volume = v;
                }
                if let Some(v) = music {
                    settings.music_enabled = v;
                }
                if let Some(v) = speech {
                    settings.speech_enabled = v;
                }
                let settings = settings.clamped();
                if changed {
                    settings.save_to(&path)?;
                }
                println!("{}", serde_json::to_string_pretty(&settings)?);
                Ok(())
            }
            Command::Leaderboard { action, data_dir } => {
                let store = FileBlobStore::open(&data_dir)
                    .with_context(|| format!("opening data dir {}", data_dir.display()))?;
                let service = LeaderboardService::new(store);
                match action {
                    LeaderboardAction::Show => {
                        print_board(&service.load());
                        Ok(())
                    }
                    LeaderboardAction::Submit {
                        name,
                        score,
                        emoji,
                        prize,
                    } => {
                        let mut submission = Submission::new(name, score);
                        if let Some(emoji) = emoji {
                            submission = submission.with_emoji(emoji);
                        }
                        if let Some(prize) = prize {
                            submission = submission.with_jackpot(None, prize);
                        }
                        let outcome = service.submit(&submission)?;
                        if !outcome.persisted {
                            anyhow::bail!("score computed but the leaderboard could not be saved");
                        }
                        match outcome.rank {
                            Some(rank) => println!("{} is now #{}", submission.name, rank),
                            None => println!("{} did not make the top list", submission.name),
                        }
                        Ok(())
                    }
                }
            }
        }
    }

    fn simulate(
        seed: u64,
        max_ticks: u64,
        tuning: Tuning,
        width: f32,
        height: f32,
        print_events: bool,
        mixer: Option<Mixer>,
    ) -> Result<()> {
        let bounds = Boundaries::from_viewport(width, height, tuning.ground_fraction);
        let tick_ms = tuning.tick_ms();
        let mut state = MatchState::new(bounds, tuning, seed);
        state.start(GameMode::Demo);

        let mut cue_rng = Pcg32::seed_from_u64(seed);
        let mut stomps = 0u32;
        let mut input = TickInput::default();
        for n in 1..=max_ticks {
            input.now_ms = (n as f64 * tick_ms) as u64;
            let events = tick(&mut state, &input);
            stomps += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Stomp { .. }))
                .count() as u32;
            if print_events {
                for event in &events {
                    println!("{}", serde_json::to_string(event)?);
                }
                if let Some(mixer) = &mixer {
                    for cue in mixer.plan_cues(&events, &mut cue_rng) {
                        println!("{}", serde_json::to_string(&cue)?);
                    }
                }
            }
            if !state.is_running() {
                break;
            }
        }

        let [p1, p2] = state.health_bars();
        let health = format!(
            "health {} ({:?}) / {} ({:?})",
            p1.health, p1.tier, p2.health, p2.tier
        );
        match state.winner() {
            Some(side) => println!(
                "{} wins after {} ticks ({} stomps) - {}",
                side.character().display_name(),
                state.time_ticks,
                stomps,
                health
            ),
            None => println!(
                "No winner after {} ticks ({} stomps) - {}",
                state.time_ticks, stomps, health
            ),
        }
        Ok(())
    }

    fn print_board(board: &wheeliepoppers::Leaderboard) {
        for (i, entry) in board.entries.iter().enumerate() {
            println!(
                "{:>3}. {} {:<20} {:>12}",
                i + 1,
                entry.emoji,
                entry.name,
                entry.high_score
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main, this is just to satisfy the compiler
}
