mod element;
pub mod timestamp;
mod topology;

pub use element::*;
pub use topology::*;
