use super::{Point, HW};
use crate::common::*;

/// 2-D affine transform on pixel coordinates.
///
/// A point maps as
///
/// ```text
/// x' = xx * x + xy * y + tx
/// y' = yx * x + yy * y + ty
/// ```
///
/// `a * b` composes the transforms so that `b` is applied first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub xx: T,
    pub xy: T,
    pub tx: T,
    pub yx: T,
    pub yy: T,
    pub ty: T,
}

impl<T> Transform<T>
where
    T: Copy + Num,
{
    pub fn identity() -> Self {
        let zero = T::zero();
        let one = T::one();
        Self {
            xx: one,
            xy: zero,
            tx: zero,
            yx: zero,
            yy: one,
            ty: zero,
        }
    }

    pub fn scaling(sx: T, sy: T) -> Self {
        let zero = T::zero();
        Self {
            xx: sx,
            xy: zero,
            tx: zero,
            yx: zero,
            yy: sy,
            ty: zero,
        }
    }

    pub fn translation(tx: T, ty: T) -> Self {
        Self {
            tx,
            ty,
            ..Self::identity()
        }
    }

    /// Stretch the `src_size` canvas onto the `tgt_size` canvas.
    pub fn from_sizes_exact(src_size: HW<T>, tgt_size: HW<T>) -> Self
    where
        T: PartialOrd,
    {
        Self::scaling(tgt_size.w() / src_size.w(), tgt_size.h() / src_size.h())
    }

    /// Mirror along the vertical axis of a canvas of the given width.
    ///
    /// Continuous coordinates map as `x' = width - x`, which is the
    /// convention for box edges.
    pub fn horizontal_flip(width: T) -> Self
    where
        T: Neg<Output = T>,
    {
        Self {
            xx: -T::one(),
            tx: width,
            ..Self::identity()
        }
    }

    /// Row-major 3x3 homogeneous matrix.
    pub fn to_matrix(&self) -> [T; 9] {
        let zero = T::zero();
        let one = T::one();
        let Self {
            xx,
            xy,
            tx,
            yx,
            yy,
            ty,
        } = *self;
        [xx, xy, tx, yx, yy, ty, zero, zero, one]
    }
}

impl<T> Transform<T>
where
    T: Float,
{
    /// Rotate by `degrees` and scale uniformly by `scale` about `center`.
    ///
    /// Positive angles turn the image counter-clockwise as displayed, i.e.
    /// with the y axis pointing down. This is the matrix OpenCV's
    /// `getRotationMatrix2D` produces.
    pub fn rotation_about(center: Point<T>, degrees: T, scale: T) -> Self {
        let radians = degrees.to_radians();
        let alpha = scale * radians.cos();
        let beta = scale * radians.sin();
        let one = T::one();
        let Point { x: cx, y: cy } = center;

        Self {
            xx: alpha,
            xy: beta,
            tx: (one - alpha) * cx - beta * cy,
            yx: -beta,
            yy: alpha,
            ty: beta * cx + (one - alpha) * cy,
        }
    }
}

impl<T> Transform<T> {
    pub fn try_cast<V>(self) -> Option<Transform<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(Transform {
            xx: V::from(self.xx)?,
            xy: V::from(self.xy)?,
            tx: V::from(self.tx)?,
            yx: V::from(self.yx)?,
            yy: V::from(self.yy)?,
            ty: V::from(self.ty)?,
        })
    }

    pub fn cast<V>(self) -> Transform<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Mul<&Transform<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = Transform<T>;

    fn mul(self, rhs: &Transform<T>) -> Self::Output {
        Transform {
            xx: self.xx * rhs.xx + self.xy * rhs.yx,
            xy: self.xx * rhs.xy + self.xy * rhs.yy,
            tx: self.xx * rhs.tx + self.xy * rhs.ty + self.tx,
            yx: self.yx * rhs.xx + self.yy * rhs.yx,
            yy: self.yx * rhs.xy + self.yy * rhs.yy,
            ty: self.yx * rhs.tx + self.yy * rhs.ty + self.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RectNum, TLBR};
    use approx::assert_abs_diff_eq;

    fn assert_transform_eq(lhs: &Transform<f64>, rhs: &Transform<f64>) {
        lhs.to_matrix()
            .iter()
            .zip(rhs.to_matrix().iter())
            .for_each(|(&l, &r)| assert_abs_diff_eq!(l, r, epsilon = 1e-9));
    }

    #[test]
    fn rect_resize_exact() {
        let transform =
            Transform::from_sizes_exact(HW::from_hw([80.0, 80.0]), HW::from_hw([20.0, 40.0]));
        let expect = Transform::scaling(0.5, 0.25);
        assert_eq!(transform, expect);
    }

    #[test]
    fn horizontal_flip_mirrors_box_edges() {
        let flip = Transform::horizontal_flip(640.0);
        let rect = TLBR::try_from_voc([10.0, 10.0, 50.0, 50.0]).unwrap();
        assert_eq!(rect.transform(&flip).voc(), [590.0, 10.0, 630.0, 50.0]);
    }

    #[test]
    fn rotation_keeps_center_fixed() {
        let center = Point::new(320.0, 180.0);
        let transform = Transform::rotation_about(center, 5.0, 0.9);
        let mapped = center.transform(&transform);
        assert_abs_diff_eq!(mapped.x, 320.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mapped.y, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn rotation_turns_counter_clockwise_on_screen() {
        // a point right of the center moves up (smaller y) for positive angles
        let center = Point::new(0.0, 0.0);
        let transform = Transform::rotation_about(center, 90.0, 1.0);
        let mapped = Point::new(1.0, 0.0).transform(&transform);
        assert_abs_diff_eq!(mapped.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mapped.y, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn composition_applies_right_hand_side_first() {
        let scale = Transform::scaling(2.0, 2.0);
        let shift = Transform::translation(10.0, 0.0);
        let point = Point::new(1.0, 1.0);
        assert_eq!(point.transform(&(&shift * &scale)), Point::new(12.0, 2.0));
        assert_eq!(point.transform(&(&scale * &shift)), Point::new(22.0, 2.0));
    }
}
