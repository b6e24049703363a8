//! Simple ray-tracing rendering engine, following the
//! [Ray Tracing in One Weekend](https://raytracing.github.io/) book series.

pub mod camera;
pub mod material;
pub mod object;
pub mod picture;
pub mod ray;
pub mod render;
