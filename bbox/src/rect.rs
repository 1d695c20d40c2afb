use super::{TLBR, TLHW};
use crate::common::*;

/// The generic rectangle.
///
/// Accessors follow the image convention: `t`/`b` are rows (y) and
/// `l`/`r` are columns (x).
pub trait Rect {
    type Type;

    fn t(&self) -> Self::Type;
    fn l(&self) -> Self::Type;
    fn b(&self) -> Self::Type;
    fn r(&self) -> Self::Type;
    fn cy(&self) -> Self::Type;
    fn cx(&self) -> Self::Type;
    fn h(&self) -> Self::Type;
    fn w(&self) -> Self::Type;

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

pub trait RectNum: Rect
where
    Self::Type: Num + PartialOrd,
{
    /// Build from Pascal VOC corners `[x_min, y_min, x_max, y_max]`.
    fn try_from_voc(voc: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized,
    {
        let [x_min, y_min, x_max, y_max] = voc;
        Self::try_from_tlbr([y_min, x_min, y_max, x_max])
    }

    /// Build from COCO `[x_min, y_min, width, height]`.
    fn try_from_coco(coco: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized,
    {
        let [x, y, w, h] = coco;
        Self::try_from_tlhw([y, x, h, w])
    }

    fn tlbr(&self) -> [Self::Type; 4] {
        [self.t(), self.l(), self.b(), self.r()]
    }

    /// Pascal VOC corners `[x_min, y_min, x_max, y_max]`.
    fn voc(&self) -> [Self::Type; 4] {
        [self.l(), self.t(), self.r(), self.b()]
    }

    /// COCO `[x_min, y_min, width, height]`.
    fn coco(&self) -> [Self::Type; 4] {
        [self.l(), self.t(), self.w(), self.h()]
    }

    fn to_tlhw(&self) -> TLHW<Self::Type> {
        TLHW {
            t: self.t(),
            l: self.l(),
            h: self.h(),
            w: self.w(),
        }
    }

    /// Check whether both sides have positive length.
    fn is_degenerate(&self) -> bool {
        !(self.b() > self.t() && self.r() > self.l())
    }

    /// Check whether the rectangle lies inside `[0, w] x [0, h]`.
    fn is_within(&self, h: Self::Type, w: Self::Type) -> bool {
        let zero = Self::Type::zero();
        self.t() >= zero && self.l() >= zero && self.b() <= h && self.r() <= w
    }
}

pub trait RectFloat: RectNum
where
    Self::Type: Float,
{
    /// Compute the intersection in TLBR format, or `None` if it has no area.
    fn intersect_with<R>(&self, other: &R) -> Option<TLBR<Self::Type>>
    where
        R: Rect<Type = Self::Type>,
    {
        let t = self.t().max(other.t());
        let l = self.l().max(other.l());
        let b = self.b().min(other.b());
        let r = self.r().min(other.r());
        (b > t && r > l).then(|| TLBR { t, l, b, r })
    }
}

impl<T> RectNum for T
where
    T: Rect,
    T::Type: Num + PartialOrd,
{
}

impl<T> RectFloat for T
where
    T: Rect,
    T::Type: Float,
{
}
