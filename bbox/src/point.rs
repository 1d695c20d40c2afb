use crate::{common::*, Transform};

/// A 2-D point in pixel units, `x` along columns and `y` along rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn try_cast<V>(self) -> Option<Point<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(Point {
            x: V::from(self.x)?,
            y: V::from(self.y)?,
        })
    }
}

impl<T> Point<T>
where
    T: Copy + Num,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        let Transform {
            xx,
            xy,
            tx,
            yx,
            yy,
            ty,
        } = *transform;
        let Self { x, y } = *self;
        Self {
            x: xx * x + xy * y + tx,
            y: yx * x + yy * y + ty,
        }
    }
}

impl<T> Mul<&Point<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = Point<T>;

    fn mul(self, rhs: &Point<T>) -> Self::Output {
        rhs.transform(self)
    }
}
