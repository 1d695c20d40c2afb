use crate::{common::*, Point};

/// Image or canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HW<T> {
    h: T,
    w: T,
}

impl<T> HW<T> {
    pub fn try_cast<U>(self) -> Option<HW<U>>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        Some(HW {
            h: U::from(self.h)?,
            w: U::from(self.w)?,
        })
    }

    pub fn cast<U>(self) -> HW<U>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> HW<T>
where
    T: Num + PartialOrd + Copy,
{
    pub fn try_from_hw(hw: [T; 2]) -> Result<Self> {
        let [h, w] = hw;
        let zero = T::zero();
        ensure!(
            h >= zero && w >= zero,
            "height and width parameters must be non-negative"
        );
        Ok(Self { h, w })
    }

    pub fn from_hw(hw: [T; 2]) -> Self {
        Self::try_from_hw(hw).unwrap()
    }

    pub fn area(&self) -> T {
        self.w * self.h
    }

    pub fn is_empty(&self) -> bool {
        self.h == T::zero() || self.w == T::zero()
    }

    /// Check whether a point lies in the half-open pixel grid
    /// `[0, w) x [0, h)`.
    pub fn contains(&self, point: &Point<T>) -> bool {
        let zero = T::zero();
        point.x >= zero && point.x < self.w && point.y >= zero && point.y < self.h
    }

    pub fn w(&self) -> T {
        self.w
    }

    pub fn h(&self) -> T {
        self.h
    }
}

impl From<(u32, u32)> for HW<u32> {
    /// Convert from `image` crate dimensions, which are `(width, height)`.
    fn from((w, h): (u32, u32)) -> Self {
        Self { h, w }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn size_area() {
        let s1 = HW::from_hw([3.0, 2.0]);
        let area: f64 = s1.area();
        assert_abs_diff_eq!(area, 6.0);
    }

    #[test]
    fn size_from_image_dimensions() {
        let size = HW::from((640u32, 360u32));
        assert_eq!(size.h(), 360);
        assert_eq!(size.w(), 640);
    }

    #[test]
    fn size_contains_is_half_open() {
        let size = HW::from_hw([360.0, 640.0]);
        assert!(size.contains(&Point::new(0.0, 0.0)));
        assert!(size.contains(&Point::new(639.5, 359.0)));
        assert!(!size.contains(&Point::new(640.0, 10.0)));
        assert!(!size.contains(&Point::new(10.0, -0.5)));
    }
}
