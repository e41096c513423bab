// Round state and tick loop for a single snake round.

use serde::Serialize;

use super::chain::{Chain, Heading, Segment};
use super::config::START_CELL;
use super::target::Target;

/// Snapshot of one chain segment for rendering / API consumers.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SegmentSnapshot {
    pub x: usize,
    pub y: usize,
    pub heading: Heading,
}

/// Snapshot of the target for rendering / API consumers.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TargetSnapshot {
    pub cx: i32,
    pub cy: i32,
    pub r: i32,
}

/// Snapshot of the full round state for one tick.
#[derive(Clone, Debug, Serialize)]
pub struct RoundSnapshot {
    pub tick: u64,
    pub score: u32,
    pub round_over: bool,
    /// Head first, tail last.
    pub segments: Vec<SegmentSnapshot>,
    pub target: TargetSnapshot,
}

/// Top-level round state: the chain, the target, and the score.
///
/// Owned by the driver and mutated only through `tick`; there are no
/// ambient globals. Exactly one mutation pass runs per external tick,
/// in a fixed order: advance, self-collision check, consumption check.
pub struct Game {
    pub chain: Chain,
    pub target: Target,
    pub score: u32,
    pub tick_count: u64,
    /// Set once the head has run into the body. A finished round is
    /// frozen: further ticks are no-ops until the driver starts a new
    /// round. This is ordinary control flow, not an error.
    pub round_over: bool,
}

impl Game {
    /// New round: length-1 chain at the fixed start cell heading right,
    /// target centered, score zero.
    pub fn new() -> Self {
        Game::with_start(START_CELL, Heading::Right)
    }

    /// New round with an explicit start cell and heading.
    pub fn with_start(start: (usize, usize), heading: Heading) -> Self {
        Game {
            chain: Chain::new(start, heading),
            target: Target::centered(),
            score: 0,
            tick_count: 0,
            round_over: false,
        }
    }

    /// Run one round tick under the given steering request.
    ///
    /// Returns true if the chain consumed the target this tick.
    pub fn tick(&mut self, requested: Heading) -> bool {
        if self.round_over {
            return false;
        }

        // 1. Move the whole chain (reversal requests are ignored inside)
        self.chain.advance(requested);
        self.tick_count += 1;

        // 2. Self-collision ends the round; the state stays frozen for
        //    the driver to present.
        if self.chain.self_collided() {
            self.round_over = true;
            return false;
        }

        // 3. Consumption: at most once per tick, checked after movement
        if self.target.intersects_cell(self.chain.head()) {
            self.target.reposition();
            self.chain.grow();
            self.score += 1;
            return true;
        }

        false
    }

    pub fn head(&self) -> &Segment {
        self.chain.head()
    }

    /// Build a snapshot of the current round state.
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            tick: self.tick_count,
            score: self.score,
            round_over: self.round_over,
            segments: self
                .chain
                .segments()
                .map(|s| SegmentSnapshot {
                    x: s.x,
                    y: s.y,
                    heading: s.heading,
                })
                .collect(),
            target: TargetSnapshot {
                cx: self.target.cx,
                cy: self.target.cy,
                r: self.target.r,
            },
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{CELL_SIZE, GRID_RES};

    /// Park the target on the given cell so the next tick consumes it.
    fn place_target_on_cell(game: &mut Game, x: usize, y: usize) {
        game.target = Target {
            cx: x as i32 * CELL_SIZE + CELL_SIZE / 2,
            cy: y as i32 * CELL_SIZE + CELL_SIZE / 2,
            r: CELL_SIZE,
        };
    }

    #[test]
    fn test_new_round() {
        let game = Game::new();
        assert_eq!(game.chain.len(), 1);
        assert_eq!(game.score, 0);
        assert_eq!(game.tick_count, 0);
        assert!(!game.round_over);
        assert!(game.target.in_bounds());
    }

    #[test]
    fn test_tick_moves_head() {
        let mut game = Game::with_start((5, 5), Heading::Right);
        let consumed = game.tick(Heading::Right);
        assert!(!consumed);
        assert_eq!((game.head().x, game.head().y), (6, 5));
        assert_eq!(game.tick_count, 1);
    }

    #[test]
    fn test_consumption_grows_scores_and_repositions() {
        let mut game = Game::with_start((5, 5), Heading::Right);
        place_target_on_cell(&mut game, 6, 5);

        let consumed = game.tick(Heading::Right);
        assert!(consumed);
        assert_eq!(game.score, 1);
        assert_eq!(game.chain.len(), 2);
        assert!(game.target.in_bounds());
    }

    #[test]
    fn test_consumption_at_most_once_per_tick() {
        let mut game = Game::with_start((5, 5), Heading::Right);
        place_target_on_cell(&mut game, 6, 5);
        game.tick(Heading::Right);
        assert_eq!(game.score, 1);
        // Next tick: target has moved, score only changes if the new
        // placement happens to intersect the head again.
        let score_before = game.score;
        let consumed = game.tick(Heading::Right);
        assert_eq!(game.score, score_before + u32::from(consumed));
    }

    #[test]
    fn test_repeated_repositions_stay_in_bounds() {
        let mut game = Game::with_start((5, 5), Heading::Right);
        for _ in 0..1_000 {
            let (hx, hy) = (game.head().x, game.head().y);
            place_target_on_cell(&mut game, hx, hy);
            // The oversized radius still covers the next cell over, so
            // every tick consumes and forces a fresh random placement.
            game.tick(game.head().heading);
            assert!(game.target.in_bounds());
        }
    }

    #[test]
    fn test_round_over_freezes_state() {
        let mut game = Game::with_start((5, 5), Heading::Right);
        for _ in 0..4 {
            game.chain.grow();
        }
        // Turn through a 2x2 box with a length-5 chain: collides
        game.tick(Heading::Down);
        game.tick(Heading::Left);
        game.tick(Heading::Up);
        game.tick(Heading::Up);
        assert!(game.round_over);

        let ticks = game.tick_count;
        let len = game.chain.len();
        let head = *game.head();
        let consumed = game.tick(Heading::Right);
        assert!(!consumed);
        assert_eq!(game.tick_count, ticks);
        assert_eq!(game.chain.len(), len);
        assert_eq!(*game.head(), head);
    }

    #[test]
    fn test_no_consumption_on_collision_tick() {
        let mut game = Game::with_start((5, 5), Heading::Right);
        for _ in 0..4 {
            game.chain.grow();
        }
        game.tick(Heading::Down);
        game.tick(Heading::Left);
        game.tick(Heading::Up);
        // Park the target where the head will collide with the body
        let (hx, hy) = (game.head().x, game.head().y);
        place_target_on_cell(&mut game, hx, hy);
        let consumed = game.tick(Heading::Up);
        assert!(game.round_over);
        assert!(!consumed);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut game = Game::with_start((5, 5), Heading::Right);
        game.chain.grow();
        game.tick(Heading::Down);

        let snap = game.snapshot();
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.score, 0);
        assert!(!snap.round_over);
        assert_eq!(snap.segments.len(), 2);
        assert_eq!(snap.segments[0].x, game.head().x);
        assert_eq!(snap.segments[0].y, game.head().y);
        assert_eq!(snap.target.r, game.target.r);
    }

    #[test]
    fn test_long_straight_run_wraps_and_survives() {
        let mut game = Game::with_start((0, 20), Heading::Right);
        // Keep the target away from row 20 so nothing is consumed
        game.target = Target { cx: 15, cy: 15, r: 5 };
        for _ in 0..GRID_RES as u64 * 3 {
            game.tick(Heading::Right);
            assert!(!game.round_over);
            assert!(game.head().x < GRID_RES);
        }
        assert_eq!(game.chain.len(), 1);
    }
}
