//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one frame. Within a frame every
//! live ball moves and resolves at most one contact, in id order; round
//! bookkeeping runs once after all balls have moved.

use glam::Vec2;
use rand::Rng;

use super::boundary::{Boundary, LineColor};
use super::demo;
use super::state::{DemoLine, GameEvent, GameMode, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in canvas pixels (`None` when off-canvas)
    pub cursor: Option<Vec2>,
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.mode {
        GameMode::Play => tick_play(state, input),
        GameMode::MenuDemo | GameMode::Pollock => tick_demo(state),
    }
}

fn tick_play(state: &mut GameState, input: &TickInput) {
    if state.balls.is_empty() {
        state.spawn_balls();
    }

    // Physics and the clock freeze once the round is decided
    if !state.phase.is_over() {
        step_balls(state, input.cursor);

        state.frame += 1;
        if state.frame % FRAMES_PER_SECOND == 0 {
            state.time_remaining = state.time_remaining.saturating_sub(1);
        }

        if state.all_burst() {
            state.phase = GamePhase::Won;
            state.push_event(GameEvent::RoundWon);
            log::info!(
                "Round won: '{}' cleared with {}s left",
                state.settings.level_name,
                state.time_remaining
            );
        } else if state.time_remaining == 0 {
            state.phase = GamePhase::Lost;
            state.push_event(GameEvent::RoundLost);
            log::info!(
                "Round lost: '{}' timed out with {} ball(s) free",
                state.settings.level_name,
                state.live_balls()
            );
        }
    }

    bake_pending(state);
}

fn tick_demo(state: &mut GameState) {
    state.frame += 1;

    if state.all_burst() {
        // The menu starts over on a clean canvas; Pollock keeps painting
        if state.mode == GameMode::MenuDemo {
            state.boundaries.clear();
        }
        state.spawn_balls();
        log::debug!("Demo respawned {} balls", state.balls.len());
    }

    if state.demo_line.is_none() && state.frame % DEMO_LINE_INTERVAL == 0 {
        start_demo_line(state);
    }

    // Demo balls ignore the cursor
    step_balls(state, None);

    if state.demo_line.is_some() && state.frame % DEMO_LINE_INTERVAL >= DEMO_LINE_ANIMATION {
        if let Some(line) = state.demo_line.take() {
            state.add_boundary(Boundary::new(line.points, line.color));
        }
    }
}

/// Move every live ball one frame and run the trap check
fn step_balls(state: &mut GameState, cursor: Option<Vec2>) {
    let bounds = state.bounds;
    let mut bursts = Vec::new();

    for ball in state.balls.iter_mut() {
        if ball.is_burst() {
            continue;
        }
        ball.update(bounds, cursor, &state.boundaries);
        if ball.check_if_trapped() {
            log::debug!(
                "Ball {} burst at ({:.1}, {:.1}) after {} collisions",
                ball.id,
                ball.pos.x,
                ball.pos.y,
                ball.collision_count()
            );
        }
    }

    for ball in state.balls.iter_mut() {
        if ball.is_burst() && !ball.particles_created {
            ball.particles_created = true;
            bursts.push(GameEvent::BallBurst {
                ball_id: ball.id,
                pos: ball.pos,
            });
        }
    }

    for event in bursts {
        state.push_event(event);
    }
}

/// Count down pending strokes and make the ready ones solid
///
/// Walks newest first, so lines ready on the same frame are added newest first.
fn bake_pending(state: &mut GameState) {
    let mut waiting = Vec::with_capacity(state.pending.len());
    for mut pending in std::mem::take(&mut state.pending).into_iter().rev() {
        if pending.tick() {
            state.add_boundary(pending.boundary);
        } else {
            waiting.push(pending);
        }
    }
    waiting.reverse();
    state.pending = waiting;
}

fn start_demo_line(state: &mut GameState) {
    let bounds = state.bounds;
    let safe_zone = state.safe_zone();

    let points = if state.rng.random_bool(0.6) {
        demo::validated(safe_zone, &mut state.rng, |rng| demo::squiggle(bounds, rng))
    } else {
        demo::validated(safe_zone, &mut state.rng, |rng| demo::straight_line(bounds, rng))
    };
    let color = LineColor::random(&mut state.rng);

    if let Some(points) = points {
        state.demo_line = Some(DemoLine { points, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LevelSettings;
    use crate::sim::ball::Ball;
    use crate::sim::collision::CanvasBounds;

    fn bounds() -> CanvasBounds {
        CanvasBounds::new(800.0, 600.0)
    }

    /// Play round with a single ball drifting slowly through open space
    fn drifting_round(settings: LevelSettings) -> GameState {
        let mut state = GameState::new(settings, GameMode::Play, bounds(), 1);
        state.balls = vec![Ball::with_velocity(
            1,
            Vec2::new(400.0, 300.0),
            Vec2::new(0.5, 0.0),
            &state.settings,
        )];
        state
    }

    fn square(center: Vec2, half: f32) -> Boundary {
        let (x0, x1) = (center.x - half, center.x + half);
        let (y0, y1) = (center.y - half, center.y + half);
        Boundary::new(
            vec![
                Vec2::new(x0, y0),
                Vec2::new(x1, y0),
                Vec2::new(x1, y1),
                Vec2::new(x0, y1),
                Vec2::new(x0, y0),
            ],
            LineColor::Cyan,
        )
    }

    #[test]
    fn test_round_won_when_all_burst() {
        let mut state = drifting_round(LevelSettings::default());
        state.balls[0].force_burst();
        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::BallBurst {
                    ball_id: 1,
                    pos: Vec2::new(400.0, 300.0)
                },
                GameEvent::RoundWon
            ]
        );
        assert!(state.balls[0].particles_created);
    }

    #[test]
    fn test_boxed_ball_bursts_from_frantic_bouncing() {
        let mut state = GameState::new(LevelSettings::default(), GameMode::Play, bounds(), 1);
        state.balls = vec![Ball::with_velocity(
            1,
            Vec2::new(400.0, 300.0),
            Vec2::new(5.0, 0.0),
            &state.settings,
        )];
        // 1px of play on each side: the ball hits a wall of the box every frame
        state.add_boundary(square(Vec2::new(400.0, 300.0), 21.0));

        for _ in 0..59 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.balls[0].collision_count(), 59);
        assert_eq!(state.phase, GamePhase::Playing);

        tick(&mut state, &TickInput::default());
        assert!(state.balls[0].is_burst());
        assert_eq!(state.phase, GamePhase::Won);
    }

    #[test]
    fn test_round_lost_on_timeout() {
        let mut state = drifting_round(LevelSettings {
            time_limit: 1,
            ..LevelSettings::default()
        });

        for _ in 0..59 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_remaining, 1);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.time_remaining, 0);
        assert!(state.drain_events().contains(&GameEvent::RoundLost));
    }

    #[test]
    fn test_win_beats_timeout_on_same_frame() {
        let mut state = drifting_round(LevelSettings {
            time_limit: 1,
            ..LevelSettings::default()
        });
        for _ in 0..59 {
            tick(&mut state, &TickInput::default());
        }
        state.balls[0].force_burst();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Won);
    }

    #[test]
    fn test_round_over_freezes_physics() {
        let mut state = drifting_round(LevelSettings {
            time_limit: 1,
            draw_delay: 2,
            ..LevelSettings::default()
        });
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Lost);

        // A stroke finished just before the buzzer still bakes in
        state
            .pending
            .push(crate::sim::PendingBoundary::new(square(Vec2::new(100.0, 100.0), 30.0), 2));
        let balls = state.balls.clone();
        let frame = state.frame;
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.balls, balls);
        assert_eq!(state.frame, frame);
        assert_eq!(state.boundaries.len(), 1);
    }

    #[test]
    fn test_pending_boundary_commits_after_draw_delay() {
        let mut state = drifting_round(LevelSettings {
            draw_delay: 3,
            ..LevelSettings::default()
        });
        state.begin_stroke(Vec2::new(100.0, 500.0));
        state.extend_stroke(Vec2::new(200.0, 500.0));
        state.end_stroke();

        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        assert!(state.boundaries.is_empty());
        assert_eq!(state.pending.len(), 1);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.boundaries.len(), 1);
        assert!(state.pending.is_empty());
        assert!(state.drain_events().contains(&GameEvent::BoundaryAdded { index: 0 }));
    }

    #[test]
    fn test_lines_ready_together_bake_newest_first() {
        let mut state = drifting_round(LevelSettings {
            draw_delay: 2,
            ..LevelSettings::default()
        });
        state.begin_stroke(Vec2::new(100.0, 500.0));
        state.extend_stroke(Vec2::new(200.0, 500.0));
        state.end_stroke();
        state.begin_stroke(Vec2::new(100.0, 100.0));
        state.extend_stroke(Vec2::new(200.0, 100.0));
        state.end_stroke();
        // Drawn a frame later, still waiting when the first two bake
        state.pending.push(crate::sim::PendingBoundary::new(square(Vec2::new(600.0, 100.0), 30.0), 3));

        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());

        let solid = state.boundaries.boundaries();
        assert_eq!(solid.len(), 2);
        assert_eq!(solid[0].points[0], Vec2::new(100.0, 100.0));
        assert_eq!(solid[1].points[0], Vec2::new(100.0, 500.0));
        assert_eq!(state.pending.len(), 1);
        assert_eq!(state.pending[0].timer, 1);
    }

    #[test]
    fn test_zero_delay_commits_next_frame() {
        let mut state = drifting_round(LevelSettings::default());
        state.begin_stroke(Vec2::new(100.0, 500.0));
        state.extend_stroke(Vec2::new(200.0, 500.0));
        state.end_stroke();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.boundaries.len(), 1);
    }

    #[test]
    fn test_cursor_repels_in_play() {
        let mut state = drifting_round(LevelSettings::default());
        let input = TickInput {
            cursor: Some(Vec2::new(410.0, 300.0)),
        };
        tick(&mut state, &input);
        assert!(state.balls[0].vel.x < 0.0);
    }

    #[test]
    fn test_demo_ignores_cursor_and_never_ends() {
        let settings = LevelSettings {
            time_limit: 1,
            ..LevelSettings::menu_demo()
        };
        let mut a = GameState::new(settings.clone(), GameMode::MenuDemo, CanvasBounds::new(1280.0, 720.0), 5);
        let mut b = GameState::new(settings, GameMode::MenuDemo, CanvasBounds::new(1280.0, 720.0), 5);
        let near = TickInput {
            cursor: Some(a.balls[0].pos + Vec2::new(5.0, 0.0)),
        };

        for _ in 0..200 {
            tick(&mut a, &near);
            tick(&mut b, &TickInput::default());
        }
        assert_eq!(a.balls, b.balls);
        assert_eq!(a.phase, GamePhase::Playing);
        assert_eq!(a.time_remaining, 1);
        assert!(!a.drain_events().iter().any(|e| matches!(e, GameEvent::RoundWon | GameEvent::RoundLost)));
    }

    #[test]
    fn test_menu_demo_respawns_on_clean_canvas() {
        let mut state = GameState::new(
            LevelSettings::menu_demo(),
            GameMode::MenuDemo,
            CanvasBounds::new(1280.0, 720.0),
            11,
        );
        state.add_boundary(square(Vec2::new(100.0, 100.0), 30.0));
        for ball in &mut state.balls {
            ball.force_burst();
        }
        let old_ids: Vec<u32> = state.balls.iter().map(|b| b.id).collect();

        tick(&mut state, &TickInput::default());
        assert!(state.boundaries.is_empty());
        assert_eq!(state.balls.len(), 2);
        assert!(state.balls.iter().all(|b| !old_ids.contains(&b.id)));
    }

    #[test]
    fn test_pollock_keeps_its_lines() {
        let mut state = GameState::new(
            LevelSettings::pollock(),
            GameMode::Pollock,
            CanvasBounds::new(1280.0, 720.0),
            12,
        );
        state.add_boundary(square(Vec2::new(100.0, 100.0), 30.0));
        for ball in &mut state.balls {
            ball.force_burst();
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.boundaries.len(), 1);
        assert_eq!(state.balls.len(), 15);
        assert_eq!(state.live_balls(), 15);
    }

    #[test]
    fn test_demo_line_animates_then_turns_solid() {
        let mut state = GameState::new(
            LevelSettings::pollock(),
            GameMode::Pollock,
            CanvasBounds::new(1280.0, 720.0),
            13,
        );

        for _ in 0..DEMO_LINE_INTERVAL {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.demo_line.is_some());
        assert!(state.boundaries.is_empty());

        for _ in 0..DEMO_LINE_ANIMATION - 1 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.demo_line.is_some());

        tick(&mut state, &TickInput::default());
        assert!(state.demo_line.is_none());
        assert_eq!(state.boundaries.len(), 1);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs stay identical
        let settings = LevelSettings {
            num_balls: 6,
            ..LevelSettings::default()
        };
        let mut state1 = GameState::new(settings.clone(), GameMode::Play, bounds(), 99999);
        let mut state2 = GameState::new(settings, GameMode::Play, bounds(), 99999);
        state1.add_boundary(square(Vec2::new(400.0, 300.0), 120.0));
        state2.add_boundary(square(Vec2::new(400.0, 300.0), 120.0));

        for frame in 0..300 {
            let input = TickInput {
                cursor: (frame % 3 == 0).then(|| Vec2::new(frame as f32 * 2.0, 300.0)),
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.balls, state2.balls);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.drain_events(), state2.drain_events());
    }
}
