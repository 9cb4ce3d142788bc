use std::time::Instant;

use rand::Rng;

use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{GameOverCause, GameState, Position, Snake},
};

/// Result of a simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Set once the round has ended, with the cause
    pub game_over: Option<GameOverCause>,
}

/// The game engine that advances the simulation
pub struct GameEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::thread_rng(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh round: length-1 snake at board center heading right,
    /// random food, zero score, full countdown anchored at `now`
    pub fn reset(&mut self, now: Instant) -> GameState {
        let head = Position::new(self.config.grid_width() / 2, self.config.grid_height() / 2);
        let snake = Snake::new(head, Direction::Right, self.config.initial_snake_length);
        let food = self.spawn_food();

        GameState::new(
            snake,
            food,
            self.config.grid_width(),
            self.config.grid_height(),
            self.config.round_secs,
            now,
        )
    }

    /// Advance the simulation by one tick.
    ///
    /// Turn requests are applied only when orthogonal to the current
    /// heading. The head then moves one cell and wraps onto the toroidal
    /// grid; a hit against the pre-update body ends the round without
    /// committing the move. Eating food grows the snake, bumps the score
    /// and respawns food. The countdown is recomputed from `now` last, and
    /// ends the round at zero.
    pub fn step(&mut self, state: &mut GameState, action: Action, now: Instant) -> StepOutcome {
        if state.is_over() {
            return StepOutcome {
                ate_food: false,
                game_over: state.over,
            };
        }

        if let Action::Turn(requested) = action {
            if state.snake.direction.is_orthogonal_to(requested) {
                state.snake.direction = requested;
            }
        }

        let new_head = state
            .snake
            .head()
            .offset(state.snake.direction)
            .wrapped(state.grid_width, state.grid_height);

        if state.snake.collides_with_body(new_head) {
            state.over = Some(GameOverCause::SelfCollision);
            return StepOutcome {
                ate_food: false,
                game_over: state.over,
            };
        }

        let ate_food = new_head == state.food;
        state.snake.advance(new_head, ate_food);

        if ate_food {
            state.score += 1;
            state.food = self.spawn_food();
        }

        state.time_left = state.remaining_secs(now);
        if state.time_left == 0 {
            state.over = Some(GameOverCause::TimeUp);
        }

        StepOutcome {
            ate_food,
            game_over: state.over,
        }
    }

    /// Pick a food cell uniformly at random over the interior (the board
    /// minus the border ring). The snake body is deliberately not
    /// consulted, so food can spawn underneath it.
    fn spawn_food(&mut self) -> Position {
        let border = self.config.border_cells();
        let x = self.rng.gen_range(border..self.config.grid_width() - border);
        let y = self.rng.gen_range(border..self.config.grid_height() - border);
        Position::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::new(GameConfig::default());
        let state = engine.reset(Instant::now());

        assert!(!state.is_over());
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, 60);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(15, 10));
        assert_eq!(state.snake.direction, Direction::Right);
    }

    #[test]
    fn test_food_spawns_in_interior() {
        let mut engine = GameEngine::new(GameConfig::default());
        for _ in 0..100 {
            let state = engine.reset(Instant::now());
            assert!((1..29).contains(&state.food.x), "food x = {}", state.food.x);
            assert!((1..19).contains(&state.food.y), "food y = {}", state.food.y);
        }
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::new(GameConfig::default());
        let now = Instant::now();
        let mut state = engine.reset(now);

        let outcome = engine.step(&mut state, Action::Continue, now);

        assert_eq!(outcome.game_over, None);
        assert_eq!(state.snake.head(), Position::new(16, 10));
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_wraparound_at_right_edge() {
        let mut engine = GameEngine::new(GameConfig::default());
        let now = Instant::now();
        let mut state = engine.reset(now);
        state.snake = Snake::new(Position::new(29, 10), Direction::Right, 1);

        engine.step(&mut state, Action::Continue, now);

        assert_eq!(state.snake.head(), Position::new(0, 10));
    }

    #[test]
    fn test_wraparound_at_top_edge() {
        let mut engine = GameEngine::new(GameConfig::default());
        let now = Instant::now();
        let mut state = engine.reset(now);
        state.snake = Snake::new(Position::new(4, 0), Direction::Up, 1);

        engine.step(&mut state, Action::Continue, now);

        assert_eq!(state.snake.head(), Position::new(4, 19));
    }

    #[test]
    fn test_orthogonal_turn_accepted_reversal_ignored() {
        let mut engine = GameEngine::new(GameConfig::default());
        let now = Instant::now();
        let mut state = engine.reset(now);
        assert_eq!(state.snake.direction, Direction::Right);

        engine.step(&mut state, Action::Turn(Direction::Up), now);
        assert_eq!(state.snake.direction, Direction::Up);

        // reversal of the new heading is dropped silently
        engine.step(&mut state, Action::Turn(Direction::Down), now);
        assert_eq!(state.snake.direction, Direction::Up);
    }

    #[test]
    fn test_repeated_up_signals() {
        // moving right, three UP signals in a row: the first is orthogonal
        // and turns the snake, the repeats are ignored
        let mut engine = GameEngine::new(GameConfig::default());
        let now = Instant::now();
        let mut state = engine.reset(now);

        for _ in 0..3 {
            engine.step(&mut state, Action::Turn(Direction::Up), now);
            assert_eq!(state.snake.direction, Direction::Up);
        }
        assert!(!state.is_over());
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = GameEngine::new(GameConfig::default());
        let now = Instant::now();
        let mut state = engine.reset(now);

        state.food = state.snake.head().offset(Direction::Right);
        let initial_length = state.snake.len();

        let outcome = engine.step(&mut state, Action::Continue, now);

        assert!(outcome.ate_food);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        // the replacement food is somewhere in the interior
        assert!((1..29).contains(&state.food.x));
        assert!((1..19).contains(&state.food.y));
    }

    #[test]
    fn test_self_collision_preserves_pre_tick_state() {
        let mut engine = GameEngine::new(GameConfig::default());
        let now = Instant::now();
        let mut state = engine.reset(now);

        // length 4 heading right, then walk three sides of a square so the
        // next move lands on the old tail cell, which is still occupied
        state.snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        engine.step(&mut state, Action::Turn(Direction::Down), now);
        engine.step(&mut state, Action::Turn(Direction::Left), now);
        let before = state.snake.body.clone();

        let outcome = engine.step(&mut state, Action::Turn(Direction::Up), now);

        assert_eq!(outcome.game_over, Some(GameOverCause::SelfCollision));
        assert!(state.is_over());
        // the colliding move was not committed
        assert_eq!(state.snake.body, before);
    }

    #[test]
    fn test_countdown_tracks_wall_clock() {
        let mut engine = GameEngine::new(GameConfig::default());
        let start = Instant::now();
        let mut state = engine.reset(start);

        engine.step(&mut state, Action::Continue, start + Duration::from_secs(5));

        assert_eq!(state.time_left, 55);
        assert!(!state.is_over());
    }

    #[test]
    fn test_timer_expiry_ends_round() {
        let mut engine = GameEngine::new(GameConfig::default());
        let start = Instant::now();
        let mut state = engine.reset(start);

        let outcome = engine.step(&mut state, Action::Continue, start + Duration::from_secs(60));

        assert_eq!(outcome.game_over, Some(GameOverCause::TimeUp));
        assert_eq!(state.time_left, 0);
    }

    #[test]
    fn test_no_updates_after_game_over() {
        let mut engine = GameEngine::new(GameConfig::default());
        let now = Instant::now();
        let mut state = engine.reset(now);
        state.over = Some(GameOverCause::TimeUp);
        let snapshot = state.clone();

        let outcome = engine.step(&mut state, Action::Turn(Direction::Up), now);

        assert_eq!(outcome.game_over, Some(GameOverCause::TimeUp));
        assert_eq!(state, snapshot);
    }
}
