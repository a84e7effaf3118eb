use nalgebra as na;
use std::marker::PhantomData;

pub trait BBoxFormat: std::fmt::Debug {}

/// Left-top-right-bottom format, contains left top and right bottom corners
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ltrb;
impl BBoxFormat for Ltrb {}

/// X-y-width-height format, contains coordinates of the center of bbox and width-height
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Xywh;
impl BBoxFormat for Xywh {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox<F: BBoxFormat>([f32; 4], PhantomData<F>);

impl<F: BBoxFormat> From<BBox<F>> for [f32; 4] {
    fn from(bbox: BBox<F>) -> Self {
        bbox.0
    }
}

impl<F: BBoxFormat> BBox<F> {
    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.0
    }
}

impl BBox<Ltrb> {
    #[inline]
    pub fn ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        BBox([left, top, right, bottom], Default::default())
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn as_xywh(&self) -> BBox<Xywh> {
        self.into()
    }

    /// Midpoint of the two corners.
    #[inline]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new(
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
        )
    }

    /// Midpoint snapped down to whole pixels, `(x1 + x2) // 2` on integer corners.
    #[inline]
    pub fn pixel_center(&self) -> na::Point2<f32> {
        let (l, t) = (self.left().floor(), self.top().floor());
        let (r, b) = (self.right().floor(), self.bottom().floor());

        na::Point2::new(((l + r) / 2.0).floor(), ((t + b) / 2.0).floor())
    }
}

impl BBox<Xywh> {
    #[inline]
    pub fn xywh(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        BBox([cx, cy, width, height], Default::default())
    }

    #[inline]
    pub fn as_ltrb(&self) -> BBox<Ltrb> {
        self.into()
    }

    #[inline(always)]
    pub fn cx(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn cy(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.0[3]
    }

    #[inline(always)]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new(self.cx(), self.cy())
    }
}

impl<'a> From<&'a BBox<Ltrb>> for BBox<Xywh> {
    #[inline]
    fn from(v: &'a BBox<Ltrb>) -> Self {
        Self(
            [
                (v.0[0] + v.0[2]) / 2.0,
                (v.0[1] + v.0[3]) / 2.0,
                v.0[2] - v.0[0],
                v.0[3] - v.0[1],
            ],
            Default::default(),
        )
    }
}

impl<'a> From<&'a BBox<Xywh>> for BBox<Ltrb> {
    #[inline]
    fn from(v: &'a BBox<Xywh>) -> Self {
        let w2 = v.0[2] / 2.0;
        let h2 = v.0[3] / 2.0;

        Self(
            [v.0[0] - w2, v.0[1] - h2, v.0[0] + w2, v.0[1] + h2],
            Default::default(),
        )
    }
}
