pub mod compositor;
pub mod decision;
pub mod lifecycle;

pub use compositor::*;
pub use decision::*;
pub use lifecycle::*;
