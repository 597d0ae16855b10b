//! Vision blur for 2D tabletop scenes.
//!
//! Blurs everything outside the vision range of the acting user's tokens.
//! A throttled decision engine picks the observers and whether blur is
//! wanted at all; a per-frame compositor eases the blur intensity and feeds
//! a post-processing mask pass on every 2D camera.
//!
//! Add [`plugins::vision_blur::VisionBlurPlugin`] after `DefaultPlugins`,
//! then mark scene entities with [`components::Token`] and
//! [`components::LightSource`].

pub mod components;
pub mod events;
pub mod plugins;
pub mod resources;
pub mod systems;
pub mod utils;
