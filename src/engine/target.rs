// The consumable target: a circle in pixel space, repositioned
// uniformly at random (in bounds) each time the head eats it.

use rand::Rng;
use serde::Serialize;

use super::chain::Segment;
use super::config::{CELL_SIZE, PLAYFIELD_SIZE, TARGET_MAX_RADIUS, TARGET_MIN_RADIUS};

/// Circular target. Center and radius are in pixels; the full circle
/// always lies inside the playfield (`r <= cx, cy <= PLAYFIELD_SIZE - r`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Target {
    pub cx: i32,
    pub cy: i32,
    pub r: i32,
}

impl Target {
    /// The fixed starting target: maximum radius, centered.
    pub fn centered() -> Self {
        let r = TARGET_MAX_RADIUS;
        let c = (PLAYFIELD_SIZE - r) / 2;
        Target { cx: c, cy: c, r }
    }

    /// Move to a uniformly random in-bounds position with a uniformly
    /// random radius. Bounds are inclusive on both ends so the circle
    /// can touch, but never cross, the playfield edge.
    pub fn reposition(&mut self) {
        let mut rng = rand::thread_rng();
        self.r = rng.gen_range(TARGET_MIN_RADIUS..=TARGET_MAX_RADIUS);
        self.cx = rng.gen_range(self.r..=PLAYFIELD_SIZE - self.r);
        self.cy = rng.gen_range(self.r..=PLAYFIELD_SIZE - self.r);
    }

    /// Whether this circle intersects the given segment's cell
    /// rectangle. The cell rect is derived from grid coordinates and the
    /// fixed per-cell pixel size; intersection is tested by clamping the
    /// circle center onto the rectangle and comparing squared distances.
    pub fn intersects_cell(&self, segment: &Segment) -> bool {
        let rx = segment.x as i32 * CELL_SIZE;
        let ry = segment.y as i32 * CELL_SIZE;

        let nearest_x = self.cx.clamp(rx, rx + CELL_SIZE);
        let nearest_y = self.cy.clamp(ry, ry + CELL_SIZE);

        let dx = (self.cx - nearest_x) as i64;
        let dy = (self.cy - nearest_y) as i64;
        dx * dx + dy * dy <= (self.r as i64) * (self.r as i64)
    }

    /// Whether the circle lies fully inside the playfield.
    pub fn in_bounds(&self) -> bool {
        self.r <= self.cx
            && self.cx <= PLAYFIELD_SIZE - self.r
            && self.r <= self.cy
            && self.cy <= PLAYFIELD_SIZE - self.r
    }
}
