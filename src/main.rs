//! Headless Plinko batch runner
//!
//! Runs an auto-play simulation to completion with no frontend attached and
//! reports per-bucket landing statistics, final multipliers, and the realized
//! return-to-player. Useful for checking odds-engine convergence.
//!
//! ```text
//! plinko [--seed N] [--rows N] [--trials N] [--wager X]
//! ```

use plinko::Tuning;
use plinko::consts::*;
use plinko::sim::{GameEvent, GameState, TickInput, tick};

struct Args {
    seed: u64,
    rows: u32,
    trials: u32,
    wager: f64,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 0,
            rows: DEFAULT_ROWS,
            trials: AUTO_PLAY_TRIALS,
            wager: DEFAULT_WAGER,
        }
    }
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let Some(value) = iter.next() else {
            log::warn!("Missing value for {flag}, ignoring");
            break;
        };
        let parsed = match flag.as_str() {
            "--seed" => value.parse().map(|v| args.seed = v).is_ok(),
            "--rows" => value.parse().map(|v| args.rows = v).is_ok(),
            "--trials" => value.parse().map(|v| args.trials = v).is_ok(),
            "--wager" => value.parse().map(|v| args.wager = v).is_ok(),
            _ => {
                log::warn!("Unknown flag {flag}, ignoring");
                continue;
            }
        };
        if !parsed {
            log::warn!("Bad value {value:?} for {flag}, keeping default");
        }
    }
    args
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let tuning = Tuning {
        auto_play_trials: args.trials,
        ..Tuning::default()
    };
    let mut state = GameState::with_tuning(args.seed, tuning);
    state.set_rows(args.rows);
    log::info!(
        "Simulating {} balls on a {}-row board at {:.2}/ball (seed {})",
        args.trials,
        state.layout.rows,
        args.wager,
        args.seed
    );

    let starting_balance = state.balance;
    let mut input = TickInput {
        wager: args.wager,
        target_rows: state.layout.rows,
        drop_ball: false,
        start_auto_play: true,
    };

    let mut peg_hits: u64 = 0;
    let mut landings: u64 = 0;
    // Generous cap in case a pathological board never clears
    let max_ticks = args.trials as u64 * state.tuning.auto_play_cadence + 1_000_000;

    tick(&mut state, &input);
    input.start_auto_play = false;
    while state.auto_play_active() && state.time_ticks < max_ticks {
        tick(&mut state, &input);
        for event in state.take_events() {
            match event {
                GameEvent::PegHit { .. } => peg_hits += 1,
                GameEvent::BucketLanding { .. } => landings += 1,
                GameEvent::AutoPlayFinished => {}
            }
        }
    }

    let total_drops = state.buckets.first().map_or(0, |b| b.total_drops);
    let seconds = state.time_ticks as f64 / f64::from(FRAME_RATE);
    println!(
        "\n{} balls dropped over {} ticks ({:.1}s at {} fps, {} audible peg hits)\n",
        total_drops, state.time_ticks, seconds, FRAME_RATE, peg_hits
    );
    println!("bucket   multiplier   landings   observed");
    for (i, bucket) in state.buckets.iter().enumerate() {
        let pct = if bucket.total_drops > 0 {
            bucket.landings as f64 * 100.0 / f64::from(bucket.total_drops)
        } else {
            0.0
        };
        println!(
            "{:>6}   {:>9.2}x   {:>8}   {:>7.2}%",
            i, bucket.multiplier, bucket.landings, pct
        );
    }

    let total_wagered = f64::from(args.trials) * args.wager;
    let returned = state.balance - starting_balance + total_wagered;
    let rtp = if total_wagered > 0.0 {
        returned / total_wagered * 100.0
    } else {
        0.0
    };
    println!(
        "\nlanded {}/{} | balance {:.2} -> {:.2} | realized RTP {:.2}% (target {:.2}%)",
        landings,
        total_drops,
        starting_balance,
        state.balance,
        rtp,
        (1.0 - state.tuning.house_edge) * 100.0
    );
}
