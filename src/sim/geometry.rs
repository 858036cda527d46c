//! Axis-aligned world geometry: rectangles, platforms and world bounds
//!
//! Screen-space coordinates: x grows right, y grows down. A rectangle is
//! stored as its top-left corner plus size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CONTACT_EPSILON;

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle around a center point
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Strict overlap (touching edges don't count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Vertical band overlap only (used for line-of-sight checks)
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }

    /// Horizontal band overlap only
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Closest point inside the rectangle to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.left(), self.right()), p.y.clamp(self.top(), self.bottom()))
    }

    /// Circle overlap test
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = self.clamp_point(center);
        closest.distance_squared(center) < radius * radius
    }

    /// Both dimensions strictly positive and finite
    pub fn is_valid(&self) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
    }
}

/// Platform collision class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    #[default]
    Solid,
    /// Blocks only bodies falling onto it from above
    OneWay,
}

/// Vertical motion of a body being tested against platforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Vertical velocity (positive = falling)
    pub vy: f32,
    /// Body is deliberately dropping through one-way platforms
    pub dropping: bool,
}

/// A static platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub kind: PlatformKind,
}

impl Platform {
    pub fn solid(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { rect: Rect::new(x, y, w, h), kind: PlatformKind::Solid }
    }

    pub fn one_way(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { rect: Rect::new(x, y, w, h), kind: PlatformKind::OneWay }
    }

    /// Whether this platform takes part in collision for the given motion
    pub fn blocks(&self, motion: Motion) -> bool {
        match self.kind {
            PlatformKind::Solid => true,
            PlatformKind::OneWay => motion.vy > 0.0 && !motion.dropping,
        }
    }
}

/// Static level geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub bounds: Rect,
    pub platforms: Vec<Platform>,
}

impl World {
    pub fn new(bounds: Rect, platforms: Vec<Platform>) -> Self {
        Self { bounds, platforms }
    }

    /// Platforms overlapping `rect` that block a body with the given motion
    pub fn colliders(&self, rect: Rect, motion: Motion) -> impl Iterator<Item = &Platform> + '_ {
        self.platforms
            .iter()
            .filter(move |p| p.blocks(motion) && p.rect.intersects(&rect))
    }

    /// Platforms overlapping `rect`, filtered by kind
    pub fn intersecting(&self, rect: Rect, kind: PlatformKind) -> impl Iterator<Item = &Platform> + '_ {
        self.platforms
            .iter()
            .filter(move |p| p.kind == kind && p.rect.intersects(&rect))
    }

    /// The platform `rect` is standing on, if any
    ///
    /// Standing means the bottom edge sits on the platform top (within
    /// tolerance) with some horizontal overlap.
    pub fn resting_on(&self, rect: Rect) -> Option<&Platform> {
        self.platforms.iter().find(|p| {
            (rect.bottom() - p.rect.top()).abs() <= CONTACT_EPSILON
                && rect.overlaps_horizontally(&p.rect)
        })
    }

    /// Clamp a rectangle into the world bounds, returning the corrected rect
    /// and which sides were hit as (left/right, top, bottom)
    pub fn clamp_rect(&self, rect: Rect) -> (Rect, bool, bool, bool) {
        let b = self.bounds;
        let mut out = rect;
        let mut hit_side = false;
        let mut hit_top = false;
        let mut hit_bottom = false;

        if out.left() < b.left() {
            out.x = b.left();
            hit_side = true;
        } else if out.right() > b.right() {
            out.x = b.right() - out.w;
            hit_side = true;
        }

        if out.bottom() > b.bottom() {
            out.y = b.bottom() - out.h;
            hit_bottom = true;
        } else if out.top() < b.top() {
            out.y = b.top();
            hit_top = true;
        }

        (out, hit_side, hit_top, hit_bottom)
    }

    /// Whether a point has left the world bounds
    pub fn out_of_bounds(&self, point: Vec2) -> bool {
        !self.bounds.contains_point(point)
    }
}
