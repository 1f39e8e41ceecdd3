pub mod sharpness;
pub mod stats;

pub use sharpness::image_sharpness;
pub use stats::{image_means, image_snrs, image_snrs_checked, image_variances};
