pub mod config;
pub mod consts;
pub mod decode;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod inertia;
pub mod io;
pub mod render;
pub mod view;
pub mod viewport;
pub mod window;
