pub mod convert;
pub mod raw_to_rgb;
pub mod yuv;

pub use convert::convert_capture_to_rgb_image;
pub use raw_to_rgb::convert_raw_to_rgb_image;
pub use yuv::convert_yuv420_planar_to_rgb_image;
