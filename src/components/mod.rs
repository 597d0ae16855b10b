pub mod light;
pub mod token;
pub mod vision_mask;

pub use light::*;
pub use token::*;
pub use vision_mask::*;
