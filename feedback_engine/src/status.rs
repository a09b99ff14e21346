//! Status-line rendering
//!
//! Renders the configurable status-bar template with the current level and
//! progress values. Purely textual; the host decides where the line goes.

use crate::progression::Progress;
use feedback_settings::StatusBarSettings;

/// Renders the status line, or `None` when the status bar is disabled
///
/// Supported placeholders: `{level}`, `{currentXP}`, `{targetXP}`.
pub fn render_status(settings: &StatusBarSettings, level: u32, progress: &Progress) -> Option<String> {
    if !settings.enabled {
        return None;
    }

    Some(
        settings
            .template
            .replace("{level}", &level.to_string())
            .replace("{currentXP}", &format_number(progress.current))
            .replace("{targetXP}", &format_number(progress.max)),
    )
}

/// Formats a numeric value with thousands separators
///
/// Non-integral values keep their plain representation; XP values are whole
/// numbers under any whole `base_xp`.
fn format_number(value: f64) -> String {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return format!("{}", value);
    }
    group_thousands(value as u64)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
