/// Placement formats and their safe zones.
pub mod format;
/// Format-independent brand rules.
pub mod rules;
