use bbox::{Rect, Transform, TLBR};
use num_traits::Float;
use std::ops::Mul;

/// A rectangle tagged with its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label<R, C>
where
    R: Rect,
{
    pub rect: R,
    pub class: C,
}

impl<'a, T, C> Mul<&'a Label<TLBR<T>, C>> for &'a Transform<T>
where
    T: Float,
    C: Clone,
{
    type Output = Label<TLBR<T>, C>;

    fn mul(self, rhs: &'a Label<TLBR<T>, C>) -> Self::Output {
        Label {
            rect: rhs.rect.transform(self),
            class: rhs.class.clone(),
        }
    }
}
