use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Smallest and largest pixel width a console panel may take
pub const PANEL_WIDTH_RANGE: std::ops::RangeInclusive<u32> = 120..=2400;

/// Widths of the two resizable console panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelWidths {
    pub left: u32,
    pub right: u32,
}

impl Default for PanelWidths {
    fn default() -> Self {
        Self {
            left: 320,
            right: 420,
        }
    }
}

/// Per-operator console layout
///
/// Mirrors the three layout keys the console keeps: `layout-settings`,
/// `component-order` and `panel-widths`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPreferences {
    /// Visibility flag per dashboard section
    #[serde(default)]
    pub layout_settings: BTreeMap<String, bool>,
    /// Order in which dashboard sections are rendered
    #[serde(default)]
    pub component_order: Vec<String>,
    #[serde(default)]
    pub panel_widths: PanelWidths,
}

impl Default for LayoutPreferences {
    fn default() -> Self {
        let sections = ["sessions", "inbox", "detections", "agents"];
        Self {
            layout_settings: sections.iter().map(|s| (s.to_string(), true)).collect(),
            component_order: sections.iter().map(|s| s.to_string()).collect(),
            panel_widths: PanelWidths::default(),
        }
    }
}

impl LayoutPreferences {
    /// Validates the layout
    ///
    /// # Validation Rules
    /// - Section identifiers are non-empty and unique in `component_order`
    /// - Both panel widths lie within [`PANEL_WIDTH_RANGE`]
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for section in &self.component_order {
            if section.trim().is_empty() {
                return Err("Component identifiers cannot be empty".to_string());
            }
            if !seen.insert(section.as_str()) {
                return Err(format!("Component {} is listed twice", section));
            }
        }

        for (name, width) in [
            ("left", self.panel_widths.left),
            ("right", self.panel_widths.right),
        ] {
            if !PANEL_WIDTH_RANGE.contains(&width) {
                return Err(format!(
                    "Panel width {} = {} is outside {}..={}",
                    name,
                    width,
                    PANEL_WIDTH_RANGE.start(),
                    PANEL_WIDTH_RANGE.end()
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LayoutPreferences::default().validate().is_ok());
    }

    #[test]
    fn duplicate_sections_rejected() {
        let mut prefs = LayoutPreferences::default();
        prefs.component_order.push("inbox".to_string());

        assert!(prefs.validate().unwrap_err().contains("twice"));
    }

    #[test]
    fn narrow_panel_rejected() {
        let mut prefs = LayoutPreferences::default();
        prefs.panel_widths.left = 40;

        assert!(prefs.validate().is_err());
    }

    #[test]
    fn deserializes_console_keys() {
        let prefs: LayoutPreferences = serde_json::from_str(
            r#"{
                "layoutSettings": {"inbox": false},
                "componentOrder": ["inbox"],
                "panelWidths": {"left": 300, "right": 500}
            }"#,
        )
        .unwrap();

        assert_eq!(prefs.layout_settings.get("inbox"), Some(&false));
        assert_eq!(prefs.panel_widths.right, 500);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let prefs: LayoutPreferences = serde_json::from_str("{}").unwrap();

        assert!(prefs.component_order.is_empty());
        assert_eq!(prefs.panel_widths, PanelWidths::default());
    }
}
