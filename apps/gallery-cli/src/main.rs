use clap::{Parser, Subcommand};
use gallery_kernel::{GameConfig, GameSession, RoundSummary};
use gallery_persist::ScoreBoard;
use gallery_render::{DebugTextRenderer, Renderer};
use gallery_report::HttpScoreReporter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Upper bound for `simulate --shots`.
const MAX_SHOTS_PER_SECOND: i64 = 100;

#[derive(Parser)]
#[command(name = "gallery-cli", about = "CLI tool for shooting gallery operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default round settings
    Info,
    /// Play a scripted round without a window
    Simulate {
        /// RNG seed for target placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Seconds to play before stopping (the round may end first)
        #[arg(long, default_value = "60")]
        seconds: u32,
        /// Shots fired at the nearest target each second
        #[arg(
            long,
            default_value = "1",
            value_parser = clap::value_parser!(u32).range(0..=MAX_SHOTS_PER_SECOND)
        )]
        shots: u32,
        /// Print the event log as JSON lines
        #[arg(long)]
        events: bool,
        /// Post the final score to this server
        #[arg(long)]
        server_url: Option<String>,
    },
    /// Print a leaderboard file
    Scores {
        /// Leaderboard file
        #[arg(short, long, env = "GALLERY_SCORE_FILE", default_value = "scores.json")]
        file: PathBuf,
    },
}

/// Fire `shots` times at whichever target is closest to the eye. A target
/// enclosing the eye cannot be hit from inside, so it is skipped.
fn volley(session: &mut GameSession, shots: u32) -> u32 {
    let mut hits = 0;
    for _ in 0..shots {
        let eye = session.player().eye();
        let nearest = session
            .targets()
            .iter()
            .filter(|t| !t.bounds().contains(eye))
            .min_by(|a, b| {
                a.position
                    .distance_squared(eye)
                    .total_cmp(&b.position.distance_squared(eye))
            })
            .map(|t| t.position);
        let Some(aim) = nearest else {
            break;
        };
        session.aim_at(aim);
        if session.fire().is_some() {
            hits += 1;
        }
    }
    hits
}

fn simulate(seed: u64, seconds: u32, shots: u32) -> anyhow::Result<(GameSession, RoundSummary)> {
    let mut session = GameSession::new(GameConfig::default(), seed)?;
    session.acquire_lock();

    let mut ended = None;
    for _ in 0..seconds {
        volley(&mut session, shots);
        if let Some(summary) = session.tick_second() {
            ended = Some(summary);
            break;
        }
    }

    let summary = match ended {
        Some(summary) => summary,
        None => {
            session.release_lock();
            session.summary()
        }
    };
    tracing::debug!("simulation finished: {summary:?}");
    Ok((session, summary))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = GameConfig::default();
            println!("gallery-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "round: {}s, {} targets, {} points per hit",
                config.round_seconds, config.target_count, config.points_per_hit
            );
            println!(
                "arena: half extent {}, gravity {}, jump {}",
                config.arena_half_extent, config.gravity, config.jump_impulse
            );
        }
        Commands::Simulate {
            seed,
            seconds,
            shots,
            events,
            server_url,
        } => {
            println!("Simulated round: seed={seed}, seconds={seconds}, shots/s={shots}");
            let (mut session, summary) = simulate(seed, seconds, shots)?;

            print!("{}", DebugTextRenderer::with_targets().render(&session));
            println!("Final score: {} ({} hits)", summary.score, summary.hits);

            if events {
                for event in session.drain_events() {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }

            if let Some(url) = server_url {
                let reporter = HttpScoreReporter::new(&url);
                reporter.send(summary.score)?;
                println!("Posted score to {}", reporter.endpoint());
            }
        }
        Commands::Scores { file } => {
            let board = ScoreBoard::open(&file);
            let scores = board.load()?;
            println!("Leaderboard {} ({} entries)", file.display(), scores.len());
            for (rank, score) in scores.iter().enumerate() {
                println!("{:>3}. {score}", rank + 1);
            }
        }
    }

    Ok(())
}
