//! Body vs world collision response
//!
//! Bodies move first, then get pushed back out of whatever they ended up
//! inside. The previous position decides which side a body came from:
//! - feet were above the top edge: land on it
//! - head was below the bottom edge: bump the ceiling (solid only)
//! - otherwise: push out sideways (solid only)

use serde::{Deserialize, Serialize};

use super::actor::Body;
use super::geometry::{Motion, PlatformKind, Rect, World};
use crate::consts::CONTACT_EPSILON;

/// Which surfaces a body touched during resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub grounded: bool,
    pub ceiling: bool,
    pub wall: bool,
}

/// Resolve one body against the platforms and world bounds
///
/// Platforms are visited in level order. `dropping` makes one-way platforms
/// transparent. Updates `body.grounded` and returns the contacts.
pub fn resolve_body(body: &mut Body, world: &World, dropping: bool) -> Contact {
    let mut contact = Contact::default();
    if body.is_dead() {
        return contact;
    }

    let prev = Rect::new(body.prev_pos.x, body.prev_pos.y, body.size.x, body.size.y);
    let motion = Motion { vy: body.vel.y, dropping };

    for platform in &world.platforms {
        let rect = body.rect();
        if !platform.blocks(motion) || !platform.rect.intersects(&rect) {
            continue;
        }
        let p = platform.rect;
        let came_from_above = prev.bottom() <= p.top() + CONTACT_EPSILON;

        match platform.kind {
            PlatformKind::OneWay => {
                if came_from_above {
                    land(body, p.top(), &mut contact);
                }
            }
            PlatformKind::Solid => {
                let came_from_below = prev.top() >= p.bottom() - CONTACT_EPSILON;
                if came_from_above && body.vel.y >= 0.0 {
                    land(body, p.top(), &mut contact);
                } else if came_from_below && body.vel.y <= 0.0 {
                    body.pos.y = p.bottom();
                    body.vel.y = 0.0;
                    contact.ceiling = true;
                } else {
                    if rect.center().x < p.center().x {
                        body.pos.x = p.left() - body.size.x;
                    } else {
                        body.pos.x = p.right();
                    }
                    body.vel.x = 0.0;
                    contact.wall = true;
                }
            }
        }
    }

    let (clamped, hit_side, hit_top, hit_bottom) = world.clamp_rect(body.rect());
    body.pos.x = clamped.x;
    body.pos.y = clamped.y;
    if hit_side {
        body.vel.x = 0.0;
        contact.wall = true;
    }
    if hit_top {
        body.vel.y = body.vel.y.max(0.0);
        contact.ceiling = true;
    }
    if hit_bottom {
        body.vel.y = body.vel.y.min(0.0);
        contact.grounded = true;
    }

    body.grounded = contact.grounded;
    contact
}

fn land(body: &mut Body, top: f32, contact: &mut Contact) {
    body.pos.y = top - body.size.y;
    body.vel.y = 0.0;
    contact.grounded = true;
}
