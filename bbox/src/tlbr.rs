use super::{Point, Rect, TLHW};
use crate::{common::*, RectFloat, Transform};

/// Bounding box in TLBR format.
///
/// The same box in Pascal VOC order is `[l, t, r, b]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TLBR<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) b: T,
    pub(crate) r: T,
}

impl<T> TLBR<T> {
    pub fn try_cast<V>(self) -> Option<TLBR<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(TLBR {
            t: V::from(self.t)?,
            l: V::from(self.l)?,
            b: V::from(self.b)?,
            r: V::from(self.r)?,
        })
    }

    pub fn cast<V>(self) -> TLBR<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> TLBR<T>
where
    T: Float,
{
    /// The four corners in clockwise order starting from top-left.
    pub fn corners(&self) -> [Point<T>; 4] {
        let Self { t, l, b, r } = *self;
        [
            Point::new(l, t),
            Point::new(r, t),
            Point::new(r, b),
            Point::new(l, b),
        ]
    }

    /// The smallest axis-aligned box containing all points.
    ///
    /// Returns `None` for an empty point set.
    pub fn hull_of<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point<T>>,
    {
        points.into_iter().fold(None, |hull, point| {
            let Point { x, y } = point;
            Some(match hull {
                None => Self {
                    t: y,
                    l: x,
                    b: y,
                    r: x,
                },
                Some(Self { t, l, b, r }) => Self {
                    t: t.min(y),
                    l: l.min(x),
                    b: b.max(y),
                    r: r.max(x),
                },
            })
        })
    }

    /// Map the box by an affine transform.
    ///
    /// The corners are mapped individually and the axis-aligned hull of the
    /// results is returned, so rotated boxes grow to enclose the rotated
    /// region. The result may be degenerate, e.g. under a zero scale.
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        let corners = self.corners().map(|corner| corner.transform(transform));
        Self::hull_of(corners).unwrap()
    }

    /// Clip the box to the canvas `[0, w] x [0, h]`.
    ///
    /// Returns `None` if nothing with positive area is left.
    pub fn clip_to(&self, h: T, w: T) -> Option<Self> {
        let zero = T::zero();
        let canvas = Self {
            t: zero,
            l: zero,
            b: h,
            r: w,
        };
        self.intersect_with(&canvas)
    }
}

impl<T> Rect for TLBR<T>
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
        self.b
    }

    fn r(&self) -> Self::Type {
        self.r
    }

    fn cy(&self) -> Self::Type {
        let one = T::one();
        let two = one + one;
        self.t + self.h() / two
    }

    fn cx(&self) -> Self::Type {
        let one = T::one();
        let two = one + one;
        self.l + self.w() / two
    }

    fn h(&self) -> Self::Type {
        self.b - self.t
    }

    fn w(&self) -> Self::Type {
        self.r - self.l
    }

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");

        Ok(Self { t, l, b, r })
    }

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self> {
        let [t, l, h, w] = tlhw;
        let b = t + h;
        let r = l + w;
        Self::try_from_tlbr([t, l, b, r])
    }
}

impl<T> From<TLHW<T>> for TLBR<T>
where
    T: Copy + Num,
{
    fn from(from: TLHW<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&TLHW<T>> for TLBR<T>
where
    T: Copy + Num,
{
    fn from(from: &TLHW<T>) -> Self {
        let TLHW { t, l, h, w } = *from;
        Self {
            t,
            l,
            b: t + h,
            r: l + w,
        }
    }
}
