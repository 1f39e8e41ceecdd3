pub mod capture_file;
pub mod image_io;
pub mod yuv_file;
