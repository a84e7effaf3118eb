use nalgebra as na;

/// Scalar usable as an image coordinate: integer pixels or float sub-pixel values.
pub trait Coord: na::Scalar + num_traits::Num + PartialOrd + Copy {}

impl<T> Coord for T where T: na::Scalar + num_traits::Num + PartialOrd + Copy {}

/// Directed segment `start -> end`. Only the sign of the side value is
/// meaningful and it stays stable as long as the endpoints do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tripwire<T: Coord> {
    pub start: na::Point2<T>,
    pub end: na::Point2<T>,
}

impl<T: Coord> Tripwire<T> {
    pub fn new(start: na::Point2<T>, end: na::Point2<T>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// 2D cross product of `end - start` and `p - start`.
    #[inline]
    pub fn side(&self, p: &na::Point2<T>) -> T {
        let (ax, ay) = (self.start.x, self.start.y);
        let (bx, by) = (self.end.x, self.end.y);

        (bx - ax) * (p.y - ay) - (by - ay) * (p.x - ax)
    }
}

/// Axis-aligned rectangle, boundaries included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone<T: Coord> {
    pub top_left: na::Point2<T>,
    pub bottom_right: na::Point2<T>,
}

impl<T: Coord> Zone<T> {
    pub fn new(top_left: na::Point2<T>, bottom_right: na::Point2<T>) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    #[inline(always)]
    pub fn left(&self) -> T {
        self.top_left.x
    }

    #[inline(always)]
    pub fn top(&self) -> T {
        self.top_left.y
    }

    #[inline(always)]
    pub fn right(&self) -> T {
        self.bottom_right.x
    }

    #[inline(always)]
    pub fn bottom(&self) -> T {
        self.bottom_right.y
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.left() <= self.right() && self.top() <= self.bottom()
    }

    #[inline]
    pub fn contains(&self, p: &na::Point2<T>) -> bool {
        self.left() <= p.x && p.x <= self.right() && self.top() <= p.y && p.y <= self.bottom()
    }
}
