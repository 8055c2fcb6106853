/// Display tokens for warning levels.
///
/// Maps a `warningLevel` string to the CSS color class, Font Awesome icon,
/// and card gradient the dashboard uses. Unknown strings get the neutral
/// default rather than an error, since the UI may be fed stored reports.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarningStyle {
    pub color: &'static str,
    pub icon: &'static str,
    pub gradient: &'static str,
}

pub const DEFAULT_STYLE: WarningStyle = WarningStyle {
    color: "secondary",
    icon: "fa-info-circle",
    gradient: "linear-gradient(135deg, #6c757d 0%, #495057 100%)",
};

static STYLES: &[(&str, WarningStyle)] = &[
    (
        "Low",
        WarningStyle {
            color: "success",
            icon: "fa-check-circle",
            gradient: "linear-gradient(135deg, #28a745 0%, #20c997 100%)",
        },
    ),
    (
        "Moderate",
        WarningStyle {
            color: "warning",
            icon: "fa-exclamation-triangle",
            gradient: "linear-gradient(135deg, #ffc107 0%, #fd7e14 100%)",
        },
    ),
    (
        "High",
        WarningStyle {
            color: "danger",
            icon: "fa-exclamation-circle",
            gradient: "linear-gradient(135deg, #dc3545 0%, #c82333 100%)",
        },
    ),
    (
        "Critical",
        WarningStyle {
            color: "critical",
            icon: "fa-skull-crossbones",
            gradient: "linear-gradient(135deg, #6f0000 0%, #200122 100%)",
        },
    ),
];

pub fn style_for(level: &str) -> WarningStyle {
    STYLES
        .iter()
        .find(|(name, _)| *name == level)
        .map(|(_, style)| *style)
        .unwrap_or(DEFAULT_STYLE)
}

pub fn warning_color(level: &str) -> &'static str {
    style_for(level).color
}

pub fn warning_icon(level: &str) -> &'static str {
    style_for(level).icon
}

/// Icon with the `fas` prefix, as used on report cards.
pub fn warning_icon_class(level: &str) -> String {
    format!("fas {}", warning_icon(level))
}
