pub mod buffer;
pub mod convolve;
pub mod edge_detect;
pub mod kernel;
pub mod params;
pub mod pgm;
pub mod pipeline;
pub mod point;
pub mod render;
pub mod session;
