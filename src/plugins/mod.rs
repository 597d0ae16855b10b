pub mod vision_blur;
pub mod mask_pass;
pub mod persistence;

pub mod input;
pub mod settings_ui;
pub mod tabletop;
