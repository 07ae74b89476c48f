// Library exports for percolate
pub mod percolation;
pub mod stats;
pub mod union_find;

pub use percolation::{Percolation, PercolationError};
pub use stats::{PercolationStats, UniformSource};
