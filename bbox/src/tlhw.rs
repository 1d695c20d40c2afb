use super::{Rect, TLBR};
use crate::common::*;

/// Bounding box in TLHW format.
///
/// The same box in COCO order is `[l, t, w, h]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TLHW<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) h: T,
    pub(crate) w: T,
}

impl<T> TLHW<T> {
    pub fn try_cast<V>(self) -> Option<TLHW<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(TLHW {
            t: V::from(self.t)?,
            l: V::from(self.l)?,
            h: V::from(self.h)?,
            w: V::from(self.w)?,
        })
    }

    pub fn cast<V>(self) -> TLHW<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Rect for TLHW<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.t
    }

    fn l(&self) -> Self::Type {
        self.l
    }

    fn b(&self) -> Self::Type {
        self.t + self.h
    }

    fn r(&self) -> Self::Type {
        self.l + self.w
    }

    fn cy(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.t + self.h / two
    }

    fn cx(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.l + self.w / two
    }

    fn h(&self) -> Self::Type {
        self.h
    }

    fn w(&self) -> Self::Type {
        self.w
    }

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");
        Ok(Self {
            t,
            l,
            h: b - t,
            w: r - l,
        })
    }

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self> {
        let [t, l, h, w] = tlhw;
        let zero = T::zero();
        ensure!(h >= zero && w >= zero, "h and w must be non-negative");
        Ok(Self { t, l, h, w })
    }
}

impl<T> From<TLBR<T>> for TLHW<T>
where
    T: Copy + Num + PartialOrd,
{
    fn from(from: TLBR<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&TLBR<T>> for TLHW<T>
where
    T: Copy + Num + PartialOrd,
{
    fn from(from: &TLBR<T>) -> Self {
        Self {
            t: from.t(),
            l: from.l(),
            h: from.h(),
            w: from.w(),
        }
    }
}
