//! Map-side pieces of the workflow: click capture, markers and viewport.

mod capture;
mod markers;
mod viewport;

pub use capture::*;
pub use markers::*;
pub use viewport::*;
