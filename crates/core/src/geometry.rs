//! Displacement vectors and absolute grid positions.
//!
//! `Vector` is a displacement and `Position` is an absolute coordinate. The two
//! never convert implicitly; use `Vector::to_position` / `Position::to_vector`
//! where a call site really means to reinterpret one as the other.

use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    pub rows: i32,
    pub cols: i32,
}

impl Vector {
    pub const ZERO: Self = Self { rows: 0, cols: 0 };

    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    pub fn dot(self, other: Self) -> i32 {
        self.rows * other.rows + self.cols * other.cols
    }

    pub fn cross(self, other: Self) -> i32 {
        self.rows * other.cols - self.cols * other.rows
    }

    pub fn length_squared(self) -> i32 {
        self.dot(self)
    }

    pub fn to_position(self) -> Position {
        Position { row: self.rows, col: self.cols }
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.rows + rhs.rows, self.cols + rhs.cols)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.rows - rhs.rows, self.cols - rhs.cols)
    }
}

impl Mul for Vector {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.rows * rhs.rows, self.cols * rhs.cols)
    }
}

impl Div for Vector {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(self.rows / rhs.rows, self.cols / rhs.cols)
    }
}

impl Add<i32> for Vector {
    type Output = Self;

    fn add(self, scalar: i32) -> Self {
        Self::new(self.rows + scalar, self.cols + scalar)
    }
}

impl Sub<i32> for Vector {
    type Output = Self;

    fn sub(self, scalar: i32) -> Self {
        Self::new(self.rows - scalar, self.cols - scalar)
    }
}

impl Mul<i32> for Vector {
    type Output = Self;

    fn mul(self, scalar: i32) -> Self {
        Self::new(self.rows * scalar, self.cols * scalar)
    }
}

impl Div<i32> for Vector {
    type Output = Self;

    fn div(self, scalar: i32) -> Self {
        Self::new(self.rows / scalar, self.cols / scalar)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.rows, -self.cols)
    }
}

/// Absolute grid coordinate. Ordered by row, then column.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const ZERO: Self = Self { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn to_vector(self) -> Vector {
        Vector { rows: self.row, cols: self.col }
    }

    /// Raw translation with no wrapping. `World::translate` is the wrapped form.
    pub fn offset(self, by: Vector) -> Self {
        Self::new(self.row + by.rows, self.col + by.cols)
    }

    /// Raw displacement from `origin` to `self` with no toroidal shortening.
    pub fn delta_from(self, origin: Self) -> Vector {
        Vector::new(self.row - origin.row, self.col - origin.col)
    }
}

pub(crate) fn wrap_axis(value: i32, size: i32) -> i32 {
    value.rem_euclid(size)
}

/// Shortest distance along one wrapped axis. Both inputs must already be in `[0, size)`.
pub(crate) fn axis_distance(a: i32, b: i32, size: i32) -> i32 {
    let raw = (a - b).abs();
    raw.min(size - raw)
}
