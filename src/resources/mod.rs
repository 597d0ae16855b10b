pub mod blur_state;
pub mod cli;
pub mod scene;
pub mod settings;

pub use blur_state::*;
pub use cli::*;
pub use scene::*;
pub use settings::*;
