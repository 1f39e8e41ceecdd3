pub mod blur;
pub mod lut;
pub mod matrix;
pub mod normalize;
pub mod resize;
