//! Sticker patterns: 54-character color strings in F, R, D, B, L, U face
//! order, and the named presets used for teaching partial stages.

use crate::cube::Color;

/// Pattern of a solved cube with yellow on top.
pub(crate) const SOLVED: &str = "rrrrrrrrrgggggggggwwwwwwwwwooooooooobbbbbbbbbyyyyyyyyy";

/// Sticker position names, one per character of a pattern.
///
/// Each name lists the faces a sticker's cubie touches, starting with the face
/// the sticker itself is on.
#[rustfmt::skip]
pub(crate) const POSITIONS: [&str; 54] = [
    "FUL", "FU", "FUR", "FL", "F", "FR", "FDL", "FD", "FDR",
    "RFU", "RU", "RBU", "RF", "R", "RB", "RFD", "RD", "RBD",
    "DLF", "DF", "DRF", "DL", "D", "DR", "DLB", "DB", "DRB",
    "BUR", "BU", "BUL", "BR", "B", "BL", "BDR", "BD", "BDL",
    "LBU", "LU", "LFU", "LB", "L", "LF", "LBD", "LD", "LFD",
    "ULB", "UB", "URB", "UL", "U", "UR", "ULF", "UF", "URF",
];

/// Named partial patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Preset {
    Cross,
    FirstLayer,
    F2l,
    Shortcut,
    Oll,
    Pll,
    Full,
}

impl Preset {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "CROSS" => Some(Preset::Cross),
            "FL" => Some(Preset::FirstLayer),
            "F2L" => Some(Preset::F2l),
            "SHORTCUT" => Some(Preset::Shortcut),
            "OLL" => Some(Preset::Oll),
            "PLL" => Some(Preset::Pll),
            "FULL" => Some(Preset::Full),
            _ => None,
        }
    }

    #[rustfmt::skip]
    pub(crate) fn pattern(self) -> &'static str {
        match self {
            Preset::Cross =>      "xxxxrxxrxxxxxgxxgxxwxwwwxwxxxxxoxxoxxxxxbxxbxxxxxyxxxx",
            Preset::FirstLayer => "xxxxxxrrrxxxxxxgggwwwwwwwwwxxxxxxoooxxxxxxbbbxxxxxxxxx",
            Preset::F2l =>        "xxxrrrrrrxxxggggggwwwwwwwwwxxxooooooxxxbbbbbbxxxxyxxxx",
            Preset::Shortcut =>   "xxxxrrxrrxxxggxggxxwwwwwxwxxxxxoxxoxxxxxbxxbxxxxxyxxxx",
            Preset::Oll =>        "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxyyyyyyyyy",
            Preset::Pll =>        "rrrxxxxxxgggxxxxxxxxxxxxxxxoooxxxxxxbbbxxxxxxyyyyyyyyy",
            Preset::Full => SOLVED,
        }
    }
}

/// Expands a preset name into its pattern; anything else is returned as is.
pub(crate) fn resolve(pattern: &str) -> &str {
    match Preset::from_name(pattern) {
        Some(preset) => preset.pattern(),
        None => pattern,
    }
}

/// Index of a position name in [`POSITIONS`].
pub(crate) fn position_index(name: &str) -> Option<usize> {
    POSITIONS.iter().position(|&p| p == name)
}

/// Color at `index`, neutral gray when the pattern is too short or the
/// character is not a known color code.
pub(crate) fn color_at(pattern: &str, index: usize) -> Color {
    pattern
        .chars()
        .nth(index)
        .and_then(Color::from_code)
        .unwrap_or(Color::Gray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_full_length() {
        for name in ["CROSS", "FL", "F2L", "SHORTCUT", "OLL", "PLL", "FULL"] {
            assert_eq!(resolve(name).chars().count(), 54, "{name}");
        }
    }

    #[test]
    fn preset_names_are_case_insensitive() {
        assert_eq!(resolve("oll"), resolve("OLL"));
        assert_eq!(Preset::from_name("f2l"), Some(Preset::F2l));
    }

    #[test]
    fn raw_patterns_pass_through() {
        assert_eq!(resolve(SOLVED), SOLVED);
        assert_eq!(resolve("rgb"), "rgb");
    }

    #[test]
    fn positions_are_unique() {
        let mut names = POSITIONS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 54);
    }

    #[test]
    fn unknown_characters_degrade_to_gray() {
        assert_eq!(color_at("r?", 0), Color::Red);
        assert_eq!(color_at("r?", 1), Color::Gray);
        assert_eq!(color_at("r?", 99), Color::Gray);
    }
}
