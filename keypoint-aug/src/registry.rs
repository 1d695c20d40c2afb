//! The fixed table of named transforms.

use crate::{
    annotation::{EngineBox, EngineKeypoint},
    common::*,
    error::{AugmentError, TransformError},
    processor::{horizontal_flip, resize, EngineOutput, ShiftScaleRotate, ShiftScaleRotateInit},
};
use anyhow::{ensure, Result};

pub const RESIZE: &str = "resize";
pub const HORIZONTAL_FLIP: &str = "horizontal_flip";
pub const SCALE_DOWN: &str = "scale_down";
pub const SHIFT_SCALE_ROTATE: &str = "shift_scale_rotate";
pub const SHIFT_SCALE_ROTATE_NEGATIVE: &str = "shift_scale_rotate_negative";

/// Height of the canvas every transform resizes to.
pub const CANVAS_HEIGHT: u32 = 360;
/// Width of the canvas every transform resizes to.
pub const CANVAS_WIDTH: u32 = 640;

static STANDARD: Lazy<TransformRegistry> = Lazy::new(|| {
    let canvas = HW::from_hw([CANVAS_HEIGHT, CANVAS_WIDTH]);
    let ssr = |shift: f64, scale: (f64, f64), rotate: (f64, f64)| {
        ShiftScaleRotateInit {
            shift_limit: (r64(-shift), r64(shift)),
            scale_limit: (r64(scale.0), r64(scale.1)),
            rotate_limit: (r64(rotate.0), r64(rotate.1)),
        }
        .build()
        .unwrap()
    };

    TransformRegistry::from_specs([
        TransformSpec::new(HORIZONTAL_FLIP, canvas, Perturbation::HorizontalFlip),
        TransformSpec::new(
            SCALE_DOWN,
            canvas,
            Perturbation::ShiftScaleRotate(ssr(0.0625, (-0.1, -0.05), (-5.0, 5.0))),
        ),
        TransformSpec::new(
            SHIFT_SCALE_ROTATE,
            canvas,
            Perturbation::ShiftScaleRotate(ssr(0.05, (-0.1, 0.1), (-5.0, 5.0))),
        ),
        TransformSpec::new(
            SHIFT_SCALE_ROTATE_NEGATIVE,
            canvas,
            Perturbation::ShiftScaleRotate(ssr(0.05, (-0.1, 0.1), (-5.0, -5.0))),
        ),
        TransformSpec::new(RESIZE, canvas, Perturbation::None),
    ])
    .unwrap()
});

/// The operation a transform applies after resizing.
#[derive(Debug, Clone, PartialEq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Perturbation {
    None,
    HorizontalFlip,
    ShiftScaleRotate(ShiftScaleRotate),
}

/// A named transform: resize to the canvas, then perturb.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSpec {
    name: String,
    canvas: HW<u32>,
    perturbation: Perturbation,
    probability: f64,
}

impl TransformSpec {
    /// Create a transform that always applies its perturbation.
    pub fn new(name: impl Into<String>, canvas: HW<u32>, perturbation: Perturbation) -> Self {
        Self {
            name: name.into(),
            canvas,
            perturbation,
            probability: 1.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canvas(&self) -> HW<u32> {
        self.canvas
    }

    pub fn perturbation(&self) -> &Perturbation {
        &self.perturbation
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn apply<R>(&self, sample: EngineOutput, rng: &mut R) -> Result<EngineOutput, TransformError>
    where
        R: Rng + ?Sized,
    {
        let sample = resize(sample, self.canvas)?;
        let sample = if rng.gen_bool(self.probability) {
            match &self.perturbation {
                Perturbation::None => sample,
                Perturbation::HorizontalFlip => horizontal_flip(sample)?,
                Perturbation::ShiftScaleRotate(ssr) => ssr.forward(sample, rng)?,
            }
        } else {
            sample
        };
        sample.validate()
    }
}

/// Transforms keyed by name, in the order they run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRegistry {
    specs: IndexMap<String, TransformSpec>,
}

impl TransformRegistry {
    /// The five built-in transforms.
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    pub fn from_specs(specs: impl IntoIterator<Item = TransformSpec>) -> Result<Self> {
        let mut map = IndexMap::new();
        for spec in specs {
            ensure!(
                spec.probability >= 0.0 && spec.probability <= 1.0,
                "probability of '{}' must be in range [0, 1]",
                spec.name
            );
            ensure!(
                !spec.canvas.is_empty(),
                "canvas of '{}' must not be empty",
                spec.name
            );
            let name = spec.name.clone();
            let prev = map.insert(name, spec);
            ensure!(
                prev.is_none(),
                "transform '{}' is registered twice",
                prev.map(|spec| spec.name).unwrap_or_default()
            );
        }
        Ok(Self { specs: map })
    }

    /// Keep only the named transforms, in the given order.
    pub fn select<S>(&self, names: &[S]) -> Result<Self, AugmentError>
    where
        S: AsRef<str>,
    {
        let specs = names
            .iter()
            .map(|name| self.get(name.as_ref()).map(|spec| (spec.name.clone(), spec.clone())))
            .collect::<Result<_, _>>()?;
        Ok(Self { specs })
    }

    pub fn get(&self, name: &str) -> Result<&TransformSpec, AugmentError> {
        self.specs
            .get(name)
            .ok_or_else(|| AugmentError::UnknownTransform(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransformSpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Run the named transform on one sample.
    ///
    /// The name is looked up before the inputs are checked.
    pub fn apply<R>(
        &self,
        name: &str,
        image: RgbImage,
        boxes: Vec<EngineBox>,
        keypoints: Vec<EngineKeypoint>,
        labels: &[String],
        rng: &mut R,
    ) -> Result<EngineOutput, AugmentError>
    where
        R: Rng + ?Sized,
    {
        let spec = self.get(name)?;
        let sample = EngineOutput::try_new(image, boxes, keypoints, labels)?;
        Ok(spec.apply(sample, rng)?)
    }
}
