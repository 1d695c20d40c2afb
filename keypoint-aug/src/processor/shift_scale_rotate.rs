use super::EngineOutput;
use crate::{common::*, error::TransformError};
use anyhow::{ensure, Result};
use imageproc::geometric_transformations::{warp, Interpolation, Projection};

/// Ranges of the random shift, scale and rotation.
///
/// `shift_limit` is a fraction of the image extent, `scale_limit` is added
/// to 1 to give the scale factor and `rotate_limit` is in degrees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShiftScaleRotateInit {
    pub shift_limit: (R64, R64),
    pub scale_limit: (R64, R64),
    pub rotate_limit: (R64, R64),
}

impl ShiftScaleRotateInit {
    pub fn build(self) -> Result<ShiftScaleRotate> {
        let Self {
            shift_limit: (shift_lo, shift_up),
            scale_limit: (scale_lo, scale_up),
            rotate_limit: (rotate_lo, rotate_up),
        } = self;

        ensure!(
            shift_lo <= shift_up,
            "shift limit min must not exceed shift limit max"
        );
        ensure!(
            scale_lo <= scale_up,
            "scale limit min must not exceed scale limit max"
        );
        ensure!(scale_lo > -1.0, "scale limit min must be greater than -1");
        ensure!(
            rotate_lo <= rotate_up,
            "rotate limit min must not exceed rotate limit max"
        );

        Ok(ShiftScaleRotate {
            shift_limit: (shift_lo.raw(), shift_up.raw()),
            scale_limit: (scale_lo.raw(), scale_up.raw()),
            rotate_limit: (rotate_lo.raw(), rotate_up.raw()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShiftScaleRotate {
    shift_limit: (f64, f64),
    scale_limit: (f64, f64),
    rotate_limit: (f64, f64),
}

impl ShiftScaleRotate {
    pub fn shift_limit(&self) -> (f64, f64) {
        self.shift_limit
    }

    pub fn scale_limit(&self) -> (f64, f64) {
        self.scale_limit
    }

    pub fn rotate_limit(&self) -> (f64, f64) {
        self.rotate_limit
    }

    /// Draw one set of parameters.
    pub fn sample_params<R>(&self, rng: &mut R) -> ShiftScaleRotateParams
    where
        R: Rng + ?Sized,
    {
        let (rotate_lo, rotate_up) = self.rotate_limit;
        let (scale_lo, scale_up) = self.scale_limit;
        let (shift_lo, shift_up) = self.shift_limit;

        ShiftScaleRotateParams {
            angle: rng.gen_range(rotate_lo..=rotate_up),
            scale: 1.0 + rng.gen_range(scale_lo..=scale_up),
            dx: rng.gen_range(shift_lo..=shift_up),
            dy: rng.gen_range(shift_lo..=shift_up),
        }
    }

    pub fn forward<R>(&self, sample: EngineOutput, rng: &mut R) -> Result<EngineOutput, TransformError>
    where
        R: Rng + ?Sized,
    {
        let params = self.sample_params(rng);
        debug!("shift_scale_rotate parameters {:?}", params);
        params.apply(sample)
    }
}

/// One draw of [ShiftScaleRotate].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftScaleRotateParams {
    /// Rotation in degrees, counter-clockwise on screen.
    pub angle: f64,
    pub scale: f64,
    /// Horizontal shift as a fraction of the width.
    pub dx: f64,
    /// Vertical shift as a fraction of the height.
    pub dy: f64,
}

impl ShiftScaleRotateParams {
    /// The pixel transform on an image of the given size.
    ///
    /// Rotation and scaling are about the image center and the shift is
    /// applied last.
    pub fn transform(&self, size: HW<f64>) -> Transform<f64> {
        let center = Point::new(size.w() / 2.0, size.h() / 2.0);
        let rotation = Transform::rotation_about(center, self.angle, self.scale);
        let shift = Transform::translation(self.dx * size.w(), self.dy * size.h());
        &shift * &rotation
    }

    pub fn apply(&self, sample: EngineOutput) -> Result<EngineOutput, TransformError> {
        let transform = self.transform(sample.size().cast());
        let projection = Projection::from_matrix(transform.cast::<f32>().to_matrix())
            .ok_or(TransformError::SingularTransform)?;
        let image = warp(
            &sample.image,
            &projection,
            Interpolation::Bilinear,
            Rgb([0, 0, 0]),
        );
        sample.map_geometry(image, &transform, &transform)
    }
}
