use std::fmt;

use serde::Serialize;

/// Country code to glyph table shared by every view.
pub const FLAG_GLYPHS: &[(&str, &str)] = &[
    ("flag_uk", "🇬🇧"),
    ("flag_us", "🇺🇸"),
    ("flag_br", "🇧🇷"),
    ("flag_tr", "🇹🇷"),
    ("flag_fr", "🇫🇷"),
    ("flag_de", "🇩🇪"),
    ("flag_es", "🇪🇸"),
    ("flag_it", "🇮🇹"),
    ("flag_pt", "🇵🇹"),
    ("flag_jp", "🇯🇵"),
    ("flag_kr", "🇰🇷"),
    ("flag_cn", "🇨🇳"),
    ("flag_ru", "🇷🇺"),
];

const GLOBE: &str = "🌐";

/// What to show next to a team name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagGlyph {
    Emoji(&'static str),
    /// Generic indicator for codes missing from [`FLAG_GLYPHS`].
    Globe,
}

impl FlagGlyph {
    pub fn is_fallback(&self) -> bool {
        matches!(self, FlagGlyph::Globe)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlagGlyph::Emoji(glyph) => *glyph,
            FlagGlyph::Globe => GLOBE,
        }
    }
}

impl fmt::Display for FlagGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a vlr.gg flag code such as `flag_fr` to its glyph. Never fails.
pub fn resolve(code: Option<&str>) -> FlagGlyph {
    code.and_then(|code| {
        FLAG_GLYPHS
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, glyph)| FlagGlyph::Emoji(*glyph))
    })
    .unwrap_or(FlagGlyph::Globe)
}
