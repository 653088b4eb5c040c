use brickfall::sim::*;
use brickfall::{ArenaConfig, CollisionEvent, ConfigError};
use glam::Vec2;

fn brick_row(arena: &ArenaConfig, y: f32, count: u32) -> Vec<Brick> {
    let step = arena.brick_width + 0.15;
    let start = -(count as f32 - 1.0) * step / 2.0;
    (0..count)
        .map(|i| Brick::with_arena_size(format!("0-{i}"), start + i as f32 * step, y, arena))
        .collect()
}

/// Run a rally for `ticks` ticks, destroying struck bricks between ticks
fn rally(seed: u64, ticks: u32) -> (BallSet, Vec<Brick>, Vec<CollisionEvent>) {
    let arena = ArenaConfig::default();
    let mut bricks = brick_row(&arena, 6.0, 6);
    let mut paddle = Paddle::centered_at(0.0, &arena);
    let mut balls = BallSet::new(seed, &paddle, &arena);
    let mut events = Vec::new();
    balls.launch(0.3, 0.0, &arena);

    for t in 0..ticks {
        if let Some(ball) = balls.balls().iter().find(|b| b.is_moving()) {
            let limit = arena.width / 2.0 - paddle.half_width();
            paddle.x = (ball.pos.x - 0.3).clamp(-limit, limit);
        }
        let frame = tick(&mut balls, &TickInput::new(paddle), &bricks, &arena);
        frame.dispatch(&mut events);
        for brick in bricks.iter_mut() {
            if frame.hit_brick_ids.contains(&brick.id) {
                brick.destroyed_at = Some(f64::from(t));
            }
        }
    }
    (balls, bricks, events)
}

#[test]
fn test_rally_is_deterministic() {
    let (balls_a, bricks_a, events_a) = rally(1234, 600);
    let (balls_b, bricks_b, events_b) = rally(1234, 600);
    assert_eq!(balls_a.balls(), balls_b.balls());
    assert_eq!(bricks_a, bricks_b);
    assert_eq!(events_a, events_b);
}

#[test]
fn test_rally_stays_in_arena() {
    let arena = ArenaConfig::default();
    let (balls, bricks, events) = rally(7, 1500);
    let ball = &balls.balls()[0];

    // The tracking paddle never misses
    assert!(ball.is_moving());
    assert!(ball.pos.is_finite());
    assert!(ball.pos.x.abs() <= arena.width / 2.0 + 0.3);
    assert!(ball.pos.y <= arena.height / 2.0 + 0.3);
    assert!((ball.vel.length() - 0.3).abs() < 1e-3);

    assert!(events.iter().any(|e| matches!(e, CollisionEvent::PaddleHit { .. })));
    assert!(bricks.iter().any(|b| !b.is_live()), "Some brick should have been broken");
}

#[test]
fn test_corner_combination() {
    let arena = ArenaConfig::default();
    let half_w = arena.brick_width / 2.0;
    let bricks = [
        Brick::with_arena_size("left", -half_w, 0.0, &arena),
        Brick::with_arena_size("right", half_w, 0.0, &arena),
    ];
    let result = check_brick_collisions(Vec2::ZERO, Vec2::new(1.0, -1.0), &bricks, &arena);
    assert_eq!(result.hit_brick_ids.len(), 2);
    assert_eq!(result.velocity, Vec2::new(-1.0, -1.0));
}

#[test]
fn test_no_collision_returns_input_velocity() {
    let arena = ArenaConfig::default();
    let paddle = Paddle::centered_at(0.0, &arena);
    let bricks = brick_row(&arena, 8.0, 4);
    let v = Vec2::new(0.07, -0.11);
    let report = check_all_collisions(Vec2::new(-2.0, 0.0), v, &paddle, &bricks, &arena);
    assert!(!report.any());
    assert_eq!(report.velocity, v);
}

#[test]
fn test_fast_ball_stops_at_first_thin_brick() {
    let arena = ArenaConfig::default();
    let paddle = Paddle::centered_at(0.0, &arena);
    // Two thin bricks stacked with a gap; the ball would clear both in one jump
    let bricks = [
        Brick::new("low", 0.0, 1.0, 1.8, 0.2),
        Brick::new("high", 0.0, 1.5, 1.8, 0.2),
    ];
    let report = advance(Vec2::ZERO, Vec2::new(0.0, 2.4), &paddle, &bricks, 1.0, &arena, false);
    assert_eq!(report.hit_brick_ids, vec!["low".to_string()]);
    assert!(report.velocity.y < 0.0);

    // With the low brick gone, the ball reaches the high one
    let mut bricks = bricks;
    bricks[0].active = false;
    let report = advance(Vec2::ZERO, Vec2::new(0.0, 2.4), &paddle, &bricks, 1.0, &arena, false);
    assert_eq!(report.hit_brick_ids, vec!["high".to_string()]);
}

#[test]
fn test_lost_ball_ends_life() {
    let arena = ArenaConfig::default();
    let paddle = Paddle::centered_at(-5.0, &arena);
    let mut balls = BallSet::new(3, &paddle, &arena);
    balls.launch(0.3, 0.0, &arena);

    // Drop the ball straight down, well clear of the paddle
    {
        let ball = &mut balls.balls_mut()[0];
        ball.pos = Vec2::new(5.0, 0.0);
        ball.vel = Vec2::new(0.0, -0.3);
    }
    let id = balls.balls()[0].id;

    let mut events = Vec::new();
    let mut lost = Vec::new();
    for _ in 0..100 {
        let frame = tick(&mut balls, &TickInput::new(paddle), &[], &arena);
        frame.dispatch(&mut events);
        lost.extend(frame.lost_balls);
        if balls.all_lost() {
            break;
        }
    }

    assert_eq!(lost, vec![id]);
    assert_eq!(events, vec![CollisionEvent::BallLost { ball_id: id }]);

    // Lost balls no longer move
    let frozen = balls.balls()[0].pos;
    tick(&mut balls, &TickInput::new(paddle), &[], &arena);
    assert_eq!(balls.balls()[0].pos, frozen);

    let next = balls.reset(&paddle, &arena);
    assert_ne!(next, id);
    assert_eq!(balls.get(next).map(|b| b.state), Some(BallState::Unlaunched));
}

#[test]
fn test_config_file_round_trip() {
    let arena = ArenaConfig {
        width: 24.0,
        max_substeps: 16,
        ..ArenaConfig::default()
    };
    let path = std::env::temp_dir().join(format!("brickfall-arena-{}.json", std::process::id()));
    std::fs::write(&path, arena.to_json().expect("serializable")).expect("temp dir writable");
    let loaded = ArenaConfig::from_json_file(&path);
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded.expect("valid config"), arena);
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = ArenaConfig::from_json_str(r#"{ "brick_height": 0.0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDimension { field: "brick_height", .. }));
    assert!(err.to_string().contains("brick_height"));
}
