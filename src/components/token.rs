use bevy::prelude::*;

/// Vision mode a token is currently using to see.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Reflect)]
pub enum VisionMode {
    /// Ordinary sight, relies on scene lighting.
    #[default]
    Basic,
    /// Sees in darkness, but only within a limited range.
    Darkvision,
}

impl VisionMode {
    /// Stable identifier for the mode, used in logs and the settings panel.
    pub fn id(&self) -> &'static str {
        match self {
            VisionMode::Basic => "basic",
            VisionMode::Darkvision => "darkvision",
        }
    }
}

/// A token on the tabletop that can anchor a visibility hole in the blur mask.
///
/// The token's world-space center is read from its `GlobalTransform`, and its
/// visibility from `InheritedVisibility`.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, Visibility)]
pub struct Token {
    /// Display name, only used for logging.
    pub name: String,
    /// Vision mode currently active on this token.
    pub vision_mode: VisionMode,
}

impl Token {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vision_mode: VisionMode::Basic,
        }
    }

    /// Builder-style helper for tokens that see with darkvision.
    pub fn with_vision(mut self, vision_mode: VisionMode) -> Self {
        self.vision_mode = vision_mode;
        self
    }
}

/// Marks a token as currently selected (controlled) by the acting user.
/// `sequence` preserves selection order so the oldest selection comes first.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Controlled {
    pub sequence: u32,
}

/// Marks a token the acting user owns.
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerOwned;

/// Marks an active token bound to the acting user's assigned character.
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct AssignedCharacter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_defaults_to_basic_vision() {
        let token = Token::new("Scout");
        assert_eq!(token.name, "Scout");
        assert_eq!(token.vision_mode, VisionMode::Basic);
    }

    #[test]
    fn test_with_vision() {
        let token = Token::new("Dwarf").with_vision(VisionMode::Darkvision);
        assert_eq!(token.vision_mode.id(), "darkvision");
    }
}
