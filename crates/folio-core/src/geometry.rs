// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry kernel — origin + extent rectangles and points in page dots or
// device pixels. Pure value arithmetic, no I/O.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Slack used by [`Rect::round_out`] so that an edge sitting exactly on an
/// integer boundary does not pull in the neighbouring pixel.
pub const ROUNDING_EPSILON: f64 = f32::EPSILON as f64;

/// Numeric types a [`Rect`] can be instantiated over.
pub trait Coord:
    Copy + PartialOrd + Default + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
    const ZERO: Self;
}

macro_rules! impl_coord {
    ($($t:ty => $zero:expr),* $(,)?) => {
        $(impl Coord for $t {
            const ZERO: Self = $zero;
        })*
    };
}

impl_coord!(f32 => 0.0, f64 => 0.0, i32 => 0, i64 => 0);

fn min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

fn max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle stored as origin plus width/height.
///
/// A rectangle whose `dx` or `dy` is zero or negative is empty. Empty
/// rectangles contain nothing, absorb under [`Rect::intersect`] and act as
/// the identity under [`Rect::union`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub dx: T,
    pub dy: T,
}

/// Rectangle in continuous page units.
pub type RectD = Rect<f64>;
/// Rectangle in whole pixels.
pub type RectI = Rect<i32>;

impl<T: Coord> Rect<T> {
    /// The canonical empty rectangle `{0, 0, 0, 0}`.
    pub const EMPTY: Self = Self {
        x: T::ZERO,
        y: T::ZERO,
        dx: T::ZERO,
        dy: T::ZERO,
    };

    pub const fn new(x: T, y: T, dx: T, dy: T) -> Self {
        Self { x, y, dx, dy }
    }

    /// Build a rectangle from two opposite corners given in any order.
    pub fn from_corners(xs: T, ys: T, xe: T, ye: T) -> Self {
        let (xs, xe) = if xs > xe { (xe, xs) } else { (xs, xe) };
        let (ys, ye) = if ys > ye { (ye, ys) } else { (ys, ye) };
        Self::new(xs, ys, xe - xs, ye - ys)
    }

    pub fn is_empty(&self) -> bool {
        self.dx <= T::ZERO || self.dy <= T::ZERO
    }

    /// Both extents non-positive. Only such rectangles are skipped by `union`.
    fn is_degenerate(&self) -> bool {
        self.dx <= T::ZERO && self.dy <= T::ZERO
    }

    pub fn top_left(&self) -> Point<T> {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point<T> {
        Point::new(self.x + self.dx, self.y + self.dy)
    }

    pub fn size(&self) -> Point<T> {
        Point::new(self.dx, self.dy)
    }

    /// Whether `pt` lies inside or on the border. Empty rectangles contain
    /// no points.
    pub fn contains(&self, pt: Point<T>) -> bool {
        if self.is_empty() {
            return false;
        }
        let br = self.bottom_right();
        pt.x >= self.x && pt.x <= br.x && pt.y >= self.y && pt.y <= br.y
    }

    /// Whether `other` is non-empty and lies entirely within `self`.
    pub fn contains_rect(&self, other: &Self) -> bool {
        !other.is_empty() && self.contains(other.top_left()) && self.contains(other.bottom_right())
    }

    /// Overlapping region of both rectangles, or [`Rect::EMPTY`] if they do
    /// not overlap.
    pub fn intersect(&self, other: &Self) -> Self {
        let x = max(self.x, other.x);
        let y = max(self.y, other.y);
        let dx = min(self.x + self.dx, other.x + other.dx) - x;
        let dy = min(self.y + self.dy, other.y + other.dy) - y;

        if dx <= T::ZERO || dy <= T::ZERO {
            return Self::EMPTY;
        }
        Self::new(x, y, dx, dy)
    }

    /// Smallest rectangle covering both. A degenerate operand is ignored and
    /// the other one is returned unchanged. Of two degenerate operands the
    /// non-canonical one wins, then the lexicographically smaller one, so the
    /// result never depends on argument order.
    pub fn union(&self, other: &Self) -> Self {
        match (self.is_degenerate(), other.is_degenerate()) {
            (true, true) => return Self::pick_degenerate(*self, *other),
            (true, false) => return *other,
            (false, true) => return *self,
            (false, false) => {}
        }

        let x = min(self.x, other.x);
        let y = min(self.y, other.y);
        let dx = max(self.x + self.dx, other.x + other.dx) - x;
        let dy = max(self.y + self.dy, other.y + other.dy) - y;
        Self::new(x, y, dx, dy)
    }

    fn pick_degenerate(a: Self, b: Self) -> Self {
        if a == Self::EMPTY {
            return b;
        }
        if b == Self::EMPTY {
            return a;
        }
        let key = |r: &Self| (r.x, r.y, r.dx, r.dy);
        if key(&b) < key(&a) { b } else { a }
    }

    pub fn offset(&self, x: T, y: T) -> Self {
        Self::new(self.x + x, self.y + y, self.dx, self.dy)
    }

    /// Grow by `x` on the left and right and by `y` on the top and bottom.
    pub fn inflate(&self, x: T, y: T) -> Self {
        Self::new(self.x - x, self.y - y, self.dx + x + x, self.dy + y + y)
    }

    pub fn scale(&self, sx: T, sy: T) -> Self {
        Self::new(self.x * sx, self.y * sy, self.dx * sx, self.dy * sy)
    }

    pub fn scale_uniform(&self, s: T) -> Self {
        self.scale(s, s)
    }

    /// Convert each component with `f`, e.g. `r.map(f64::from)`.
    pub fn map<S>(self, f: impl Fn(T) -> S) -> Rect<S> {
        Rect {
            x: f(self.x),
            y: f(self.y),
            dx: f(self.dx),
            dy: f(self.dy),
        }
    }
}

impl<T: Coord + Into<f64>> Rect<T> {
    /// Round every component to the nearest integer (`floor(v + 0.5)`).
    /// Suitable for display; does not guarantee containment.
    pub fn round_nearest(&self) -> RectI {
        let round = |v: T| (v.into() + 0.5).floor() as i32;
        RectI::new(round(self.x), round(self.y), round(self.dx), round(self.dy))
    }

    /// Smallest pixel box covering the continuous rectangle, with
    /// [`ROUNDING_EPSILON`] of slack on both edges.
    pub fn round_out(&self) -> RectI {
        let (x, y): (f64, f64) = (self.x.into(), self.y.into());
        let (dx, dy): (f64, f64) = (self.dx.into(), self.dy.into());
        RectI::from_corners(
            (x + ROUNDING_EPSILON).floor() as i32,
            (y + ROUNDING_EPSILON).floor() as i32,
            (x + dx - ROUNDING_EPSILON).ceil() as i32,
            (y + dy - ROUNDING_EPSILON).ceil() as i32,
        )
    }
}

impl From<RectI> for RectD {
    fn from(r: RectI) -> Self {
        r.map(f64::from)
    }
}

/// `[x,y; dx,dy]`. A precision such as `{:.2}` applies to every component.
impl<T: fmt::Display> fmt::Display for Rect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, dx, dy) = (&self.x, &self.y, &self.dx, &self.dy);
        match f.precision() {
            Some(p) => write!(f, "[{x:.p$},{y:.p$}; {dx:.p$},{dy:.p$}]"),
            None => write!(f, "[{x},{y}; {dx},{dy}]"),
        }
    }
}
