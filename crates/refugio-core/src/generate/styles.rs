//! Built-in visual styles and the prompt template they plug into.

/// A selectable wallpaper style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub id: &'static str,
    /// Display name shown to the user.
    pub name: &'static str,
    /// Style-specific fragment inserted into the prompt template.
    pub prompt: &'static str,
}

pub const STYLES: &[Style] = &[
    Style {
        id: "paz",
        name: "Paz",
        prompt: "heavenly peace, soft clouds, biblical atmosphere, blue and white tones",
    },
    Style {
        id: "fortaleza",
        name: "Fortaleza",
        prompt: "strong rock, majestic mountains, solid faith, golden hour lighting",
    },
    Style {
        id: "amor",
        name: "Amor",
        prompt: "divine love, warm light, soft textures, rose and cream colors",
    },
    Style {
        id: "luz",
        name: "Luz",
        prompt: "divine light, bright morning, hope, high contrast spiritual art",
    },
];

impl Style {
    /// Full prompt sent to the endpoint. Pure function of the style.
    pub fn prompt_text(&self) -> String {
        format!(
            "Mobile wallpaper 9:16 aspect ratio. {}. Spiritual christian theme, peaceful, artistic, high definition 4k. No text.",
            self.prompt
        )
    }
}

/// Look up a style by id (case-insensitive).
pub fn find_style(id: &str) -> Option<&'static Style> {
    let id = id.trim();
    STYLES.iter().find(|s| s.id.eq_ignore_ascii_case(id))
}
