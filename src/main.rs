//! Brickfall headless runner
//!
//! Plays a short rally against a brick wall with an auto-tracking paddle and
//! logs every collision. Usage: `brickfall [config.json] [seed]`.

#[cfg(not(target_arch = "wasm32"))]
use brickfall::{
    ArenaConfig, LogSink,
    consts::BALL_SPEED,
    sim::{BallSet, Brick, Paddle, TickInput, tick},
};

#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u32 = 20_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brickfall (native) starting...");

    let mut args = std::env::args().skip(1);
    let arena = match args.next() {
        Some(path) => match ArenaConfig::from_json_file(&path) {
            Ok(arena) => arena,
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => ArenaConfig::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let mut bricks = brick_wall(&arena, 5, 8);
    let mut paddle = Paddle::centered_at(0.0, &arena);
    let mut balls = BallSet::new(seed, &paddle, &arena);
    let mut sink = LogSink::default();

    balls.launch(BALL_SPEED, 0.0, &arena);

    let mut ticks = 0;
    while ticks < MAX_TICKS {
        ticks += 1;

        // Track the lowest ball, leaning the paddle slightly off center
        if let Some(ball) = balls
            .balls()
            .iter()
            .filter(|b| b.is_moving())
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        {
            let limit = arena.width / 2.0 - paddle.half_width();
            paddle.x = (ball.pos.x - 0.3).clamp(-limit, limit);
        }

        let frame = tick(&mut balls, &TickInput::new(paddle), &bricks, &arena);
        frame.dispatch(&mut sink);

        for brick in bricks.iter_mut() {
            if frame.hit_brick_ids.contains(&brick.id) {
                brick.destroyed_at = Some(f64::from(ticks));
            }
        }

        if balls.all_lost() || bricks.iter().all(|b| !b.is_live()) {
            break;
        }
    }

    let destroyed = bricks.iter().filter(|b| !b.is_live()).count();
    println!(
        "{} ticks, {}/{} bricks destroyed, ball {}",
        ticks,
        destroyed,
        bricks.len(),
        if balls.all_lost() { "lost" } else { "in play" }
    );
}

/// Rows of bricks centered horizontally, starting four units below the top
#[cfg(not(target_arch = "wasm32"))]
fn brick_wall(arena: &ArenaConfig, rows: u32, cols: u32) -> Vec<Brick> {
    const GAP: f32 = 0.15;

    let step_x = arena.brick_width + GAP;
    let step_y = arena.brick_height + GAP;
    let start_x = -(cols as f32 - 1.0) * step_x / 2.0;
    let start_y = arena.height / 2.0 - 4.0;

    let mut bricks = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            bricks.push(Brick::with_arena_size(
                format!("{row}-{col}"),
                start_x + col as f32 * step_x,
                start_y - row as f32 * step_y,
                arena,
            ));
        }
    }
    bricks
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the host drives `sim::tick` itself
}
