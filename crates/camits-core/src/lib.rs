pub mod capture;
pub mod chart;
pub mod color;
pub mod consts;
pub mod error;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod planes;
pub mod props;
pub mod quality;
pub mod raw;
