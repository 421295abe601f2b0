/// A scripture quotation and its reference label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verse {
    pub text: &'static str,
    pub reference: &'static str,
}

impl Verse {
    /// Text copied to the clipboard / share sheet: `"<text> - <reference>"`.
    pub fn share_text(&self) -> String {
        format!("{} - {}", self.text, self.reference)
    }
}

/// Rotation order matters: index `day % len` picks the verse.
pub const VERSES: &[Verse] = &[
    Verse {
        text: "Jehová es mi pastor; nada me faltará.",
        reference: "Salmos 23:1",
    },
    Verse {
        text: "Todo lo puedo en Cristo que me fortalece.",
        reference: "Filipenses 4:13",
    },
    Verse {
        text: "No temas, porque yo estoy contigo.",
        reference: "Isaías 41:10",
    },
    Verse {
        text: "La paz de Dios sobrepasa todo entendimiento.",
        reference: "Filipenses 4:7",
    },
    Verse {
        text: "Lámpara es a mis pies tu palabra.",
        reference: "Salmos 119:105",
    },
];
