//! Common imports from external crates.

pub use bbox::{prelude::*, Point, Transform, HW, TLBR, TLHW};
pub use image::{imageops::FilterType, Rgb, RgbImage};
pub use indexmap::IndexMap;
pub use itertools::{izip, Itertools as _};
pub use label::Label;
pub use noisy_float::prelude::*;
pub use once_cell::sync::Lazy;
pub use rand::{prelude::*, rngs::StdRng};
pub use semver::{Version, VersionReq};
pub use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
pub use serde_json::{Map, Number, Value};
pub use std::{
    fmt::{self, Debug, Display},
    fs,
    io::{self, prelude::*},
    path::{Path, PathBuf},
};
pub use strum::{AsRefStr, Display as StrumDisplay, EnumString};
pub use tracing::{debug, info, warn};
