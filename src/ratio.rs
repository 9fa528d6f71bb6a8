/// A named aspect ratio. `aspect` is width / height and identifies the preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatioPreset {
    pub label: &'static str,
    pub aspect: f32,
}

/// Aspects must stay unique, they are used as the selection key.
pub const RATIOS: [RatioPreset; 4] = [
    RatioPreset {
        label: "1:1",
        aspect: 1.0,
    },
    RatioPreset {
        label: "2:3",
        aspect: 2.0 / 3.0,
    },
    RatioPreset {
        label: "16:9",
        aspect: 16.0 / 9.0,
    },
    RatioPreset {
        label: "16:10",
        aspect: 16.0 / 10.0,
    },
];

impl RatioPreset {
    pub fn matches(&self, aspect: Option<f32>) -> bool {
        aspect == Some(self.aspect)
    }
}

impl std::fmt::Display for RatioPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Clicking the active preset clears it, any other preset replaces it.
pub fn toggle(current: Option<RatioPreset>, clicked: RatioPreset) -> Option<RatioPreset> {
    match current {
        Some(active) if active.aspect == clicked.aspect => None,
        _ => Some(clicked),
    }
}
