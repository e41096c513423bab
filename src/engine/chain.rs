// Segment chain: the creature's body as an ordered sequence of grid
// cells, advanced one cell per tick with follow-the-leader propagation.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::config::GRID_RES;

/// One of the four cardinal movement directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Heading {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Heading {
    /// The exact 180° reversal of this heading.
    pub fn opposite(self) -> Heading {
        match self {
            Heading::Right => Heading::Left,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Up => Heading::Down,
        }
    }

    /// Move one cell from `(x, y)` in this heading, wrapping at the grid
    /// edges. The playfield is toroidal: there are no walls, crossing an
    /// edge re-enters from the opposite side.
    pub fn step(self, x: usize, y: usize) -> (usize, usize) {
        match self {
            Heading::Right => ((x + 1) % GRID_RES, y),
            Heading::Down => (x, (y + 1) % GRID_RES),
            Heading::Left => (if x == 0 { GRID_RES - 1 } else { x - 1 }, y),
            Heading::Up => (x, if y == 0 { GRID_RES - 1 } else { y - 1 }),
        }
    }

    /// Decode a heading from its wire discriminant. Unknown values are
    /// rejected rather than mapped to an arbitrary direction.
    pub fn from_u8(value: u8) -> Option<Heading> {
        match value {
            0 => Some(Heading::Right),
            1 => Some(Heading::Down),
            2 => Some(Heading::Left),
            3 => Some(Heading::Up),
            _ => None,
        }
    }
}

/// One cell of the creature's body. The stored heading is the direction
/// that produced the segment's current position; the segment behind it
/// replays that heading on the next tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub x: usize,
    pub y: usize,
    pub heading: Heading,
}

/// The creature: a non-empty head-to-tail sequence of segments.
///
/// The front element is the head, the only segment steered by input.
/// Growth is a single front-insert and movement is an iterative scan,
/// so chain length never affects stack depth.
pub struct Chain {
    segments: VecDeque<Segment>,
}

impl Chain {
    /// Create a length-1 chain at the given start cell and heading.
    pub fn new(start: (usize, usize), heading: Heading) -> Self {
        let mut segments = VecDeque::new();
        segments.push_back(Segment {
            x: start.0,
            y: start.1,
            heading,
        });
        Chain { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        false // length >= 1 by construction
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Advance every segment one cell.
    ///
    /// The head moves in its currently stored heading, then stores the
    /// requested heading to apply next tick. Each successor moves in its
    /// own stored heading and inherits its predecessor's previous one,
    /// so the body follows the head with one tick of lag per segment.
    /// The whole chain finishes moving before any collision check runs.
    ///
    /// A request to reverse 180° is ignored and the current heading kept;
    /// the chain cannot be steered back onto its own neck.
    pub fn advance(&mut self, requested: Heading) {
        let current = self.segments[0].heading;
        let mut carry = if requested == current.opposite() {
            current
        } else {
            requested
        };

        for seg in self.segments.iter_mut() {
            let last = seg.heading;
            let (nx, ny) = seg.heading.step(seg.x, seg.y);
            seg.x = nx;
            seg.y = ny;
            seg.heading = carry;
            carry = last;
        }
    }

    /// Whether the head occupies the same cell as any other segment.
    /// Only meaningful after `advance` has completed for the whole
    /// chain; a length-1 chain can never collide with itself.
    pub fn self_collided(&self) -> bool {
        let head = self.segments[0];
        self.segments
            .iter()
            .skip(1)
            .any(|seg| seg.x == head.x && seg.y == head.y)
    }

    /// Grow by one segment from the head.
    ///
    /// The new head starts as a copy of the current head advanced one
    /// step in the head's heading (with wrap), as if the head split and
    /// moved an extra virtual tick. No existing segment is disturbed.
    pub fn grow(&mut self) {
        let mut new_head = self.segments[0];
        let (nx, ny) = new_head.heading.step(new_head.x, new_head.y);
        new_head.x = nx;
        new_head.y = ny;
        self.segments.push_front(new_head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(chain: &Chain) -> Vec<(usize, usize)> {
        chain.segments().map(|s| (s.x, s.y)).collect()
    }

    #[test]
    fn test_step_wraps_all_four_edges() {
        assert_eq!(Heading::Right.step(GRID_RES - 1, 7), (0, 7));
        assert_eq!(Heading::Left.step(0, 7), (GRID_RES - 1, 7));
        assert_eq!(Heading::Down.step(7, GRID_RES - 1), (7, 0));
        assert_eq!(Heading::Up.step(7, 0), (7, GRID_RES - 1));
    }

    #[test]
    fn test_step_interior() {
        assert_eq!(Heading::Right.step(5, 5), (6, 5));
        assert_eq!(Heading::Down.step(5, 5), (5, 6));
        assert_eq!(Heading::Left.step(5, 5), (4, 5));
        assert_eq!(Heading::Up.step(5, 5), (5, 4));
    }

    #[test]
    fn test_advance_stays_in_bounds() {
        let mut chain = Chain::new((GRID_RES - 2, 0), Heading::Right);
        for _ in 0..GRID_RES * 3 {
            chain.advance(Heading::Right);
            let head = chain.head();
            assert!(head.x < GRID_RES && head.y < GRID_RES);
        }
    }

    #[test]
    fn test_advance_preserves_length() {
        let mut chain = Chain::new((5, 5), Heading::Right);
        chain.grow();
        chain.grow();
        assert_eq!(chain.len(), 3);
        chain.advance(Heading::Down);
        assert_eq!(chain.len(), 3);
        let _ = chain.self_collided();
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_body_follows_with_one_tick_lag() {
        let mut chain = Chain::new((5, 5), Heading::Right);
        chain.grow(); // head (6,5), second (5,5)
        let head_before = (chain.head().x, chain.head().y);
        chain.advance(Heading::Right);
        let cells = positions(&chain);
        // Second segment moved into the head's previous cell
        assert_eq!(cells[1], head_before);
    }

    #[test]
    fn test_turn_applies_next_tick() {
        let mut chain = Chain::new((5, 5), Heading::Right);
        chain.advance(Heading::Down);
        // This tick still moves in the old heading
        assert_eq!((chain.head().x, chain.head().y), (6, 5));
        chain.advance(Heading::Down);
        // The requested heading applies one tick later
        assert_eq!((chain.head().x, chain.head().y), (6, 6));
    }

    #[test]
    fn test_reversal_request_ignored() {
        let mut chain = Chain::new((5, 5), Heading::Right);
        chain.advance(Heading::Left);
        assert_eq!(chain.head().heading, Heading::Right);
        chain.advance(Heading::Left);
        // Still moving right, two cells on
        assert_eq!((chain.head().x, chain.head().y), (7, 5));
    }

    #[test]
    fn test_straight_mover_never_collides() {
        let mut chain = Chain::new((0, 10), Heading::Right);
        for _ in 0..6 {
            chain.grow();
        }
        assert_eq!(chain.len(), 7);
        // Several full wraps of the grid without a single turn
        for _ in 0..GRID_RES * 4 {
            chain.advance(Heading::Right);
            assert!(!chain.self_collided());
        }
    }

    #[test]
    fn test_vacated_cell_is_not_a_collision() {
        // A length-4 chain can circle a 2x2 box forever: each tick the
        // head enters the cell the tail vacates on that same tick. The
        // whole chain finishes moving before the check, so this never
        // reports a collision.
        let mut chain = Chain::new((5, 5), Heading::Right);
        for _ in 0..3 {
            chain.grow();
        }
        // Chain: (8,5) (7,5) (6,5) (5,5), all heading Right
        let turns = [Heading::Down, Heading::Left, Heading::Up, Heading::Right];
        for turn in turns.iter().cycle().take(16) {
            chain.advance(*turn);
            assert!(!chain.self_collided());
        }
    }

    #[test]
    fn test_loop_back_collides() {
        // A length-5 chain turning through a 2x2 box runs into its own
        // body.
        let mut chain = Chain::new((5, 5), Heading::Right);
        for _ in 0..4 {
            chain.grow();
        }
        assert_eq!(chain.len(), 5);
        chain.advance(Heading::Down);
        assert!(!chain.self_collided());
        chain.advance(Heading::Left);
        assert!(!chain.self_collided());
        chain.advance(Heading::Up);
        assert!(!chain.self_collided());
        // Fourth turn closes the box onto the body
        chain.advance(Heading::Up);
        assert!(chain.self_collided());
    }

    #[test]
    fn test_grow_from_single_segment() {
        let mut chain = Chain::new((5, 5), Heading::Right);
        chain.grow();
        assert_eq!(chain.len(), 2);
        assert_eq!((chain.head().x, chain.head().y), (6, 5));
        assert_eq!(chain.head().heading, Heading::Right);
        let cells = positions(&chain);
        assert_eq!(cells[1], (5, 5));
    }

    #[test]
    fn test_grow_wraps_at_edge() {
        let mut chain = Chain::new((GRID_RES - 1, 3), Heading::Right);
        chain.grow();
        assert_eq!((chain.head().x, chain.head().y), (0, 3));
    }

    #[test]
    fn test_grow_leaves_body_untouched() {
        let mut chain = Chain::new((5, 5), Heading::Down);
        chain.grow();
        let before = positions(&chain);
        chain.grow();
        let after = positions(&chain);
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[1..], &before[..]);
    }

    #[test]
    fn test_heading_from_u8() {
        assert_eq!(Heading::from_u8(0), Some(Heading::Right));
        assert_eq!(Heading::from_u8(3), Some(Heading::Up));
        assert_eq!(Heading::from_u8(4), None);
    }

    #[test]
    fn test_heading_opposites() {
        for h in [Heading::Right, Heading::Down, Heading::Left, Heading::Up] {
            assert_eq!(h.opposite().opposite(), h);
            assert_ne!(h.opposite(), h);
        }
    }
}
