//! Ball Trap headless runner
//!
//! The game itself runs in the browser through the `web` bindings. Natively
//! this runs a menu demo and an unattended play round and logs how they went.
//! Set `RUST_LOG=debug` to see individual bursts and boundaries.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ball_trap::LevelSettings;
    use ball_trap::sim::{CanvasBounds, GameEvent, GameMode, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Ball Trap (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let bounds = CanvasBounds::new(1280.0, 720.0);

    // One minute of attract mode
    let mut demo = GameState::new(LevelSettings::menu_demo(), GameMode::MenuDemo, bounds, seed);
    let mut bursts = 0;
    for _ in 0..60 * 60 {
        tick(&mut demo, &TickInput::default());
        bursts += demo
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BallBurst { .. }))
            .count();
    }
    log::info!(
        "Menu demo: {} frames, {} bursts, {} lines on screen",
        demo.frame,
        bursts,
        demo.boundaries.len()
    );

    // A play round where the hint line is drawn whenever one is available
    let mut round = GameState::new(LevelSettings::custom(30, 3), GameMode::Play, bounds, seed);
    while !round.phase.is_over() {
        if round.frame % 120 == 0 {
            if let Some(points) = round.suggest_trap_line() {
                if round.begin_stroke(points[0]) {
                    for point in &points[1..] {
                        round.extend_stroke(*point);
                    }
                    round.end_stroke();
                }
            }
        }
        tick(&mut round, &TickInput::default());
        round.drain_events();
    }
    log::info!(
        "Play round: {} after {} frames, {} of {} balls trapped with {} lines",
        round.phase.message(),
        round.frame,
        round.balls.len() - round.live_balls(),
        round.balls.len(),
        round.boundaries.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::start`, this is just to satisfy the compiler
}
