//! Application layer: wires the kernel to the runtime and the render sink.

pub mod workbench;

pub use workbench::Workbench;
