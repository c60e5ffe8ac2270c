//! Collision response against static level geometry
//!
//! Landing is a "from above" test on the post-move position, not a swept
//! test: fast bodies can tunnel through thin platforms and platform sides
//! and ceilings are not solid. Both are accepted game feel.

use super::body::Body;
use super::level::Layout;
use super::rect::Rect;

/// Land `body` on the first qualifying platform, in list order.
///
/// Ground contact is cleared first, so it only survives a frame if a
/// platform re-asserts it. Returns true on landing.
pub fn resolve_landing<'a>(body: &mut Body, platforms: impl IntoIterator<Item = &'a Rect>) -> bool {
    body.on_ground = false;

    for platform in platforms {
        if body.rect().intersects(platform) && body.vel.y > 0.0 && body.pos.y < platform.y {
            body.pos.y = platform.y - body.size.y;
            body.vel.y = 0.0;
            body.on_ground = true;
            return true;
        }
    }

    false
}

/// Check if the body overlaps any of the given obstacles
pub fn hits_obstacle<'a>(body: &Body, obstacles: impl IntoIterator<Item = &'a Rect>) -> bool {
    let rect = body.rect();
    obstacles.into_iter().any(|o| rect.intersects(o))
}

/// Check if the body dropped below the bottom of its world
pub fn fell_out(body: &Body, layout: &Layout) -> bool {
    body.pos.y > body.world.lower_bound(layout)
}

/// Check if the body overlaps its world's exit
pub fn at_exit(body: &Body, exit: &Rect) -> bool {
    body.rect().intersects(exit)
}
