//! Compilation of structured layouts into executable simulations.

mod compiler;
pub mod constraint;
pub mod force;
pub mod index;
mod octree;

pub use compiler::LayoutCompiler;
