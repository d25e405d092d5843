//! Counties covered by the TPQA exercise.

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
pub enum Region {
    #[default]
    Kisii,
    Laikipia,
    Migori,
    Kisumu,
    Lamu,
    Kilifi,
    Kwale,
    Muranga,
    Narok,
    TharakaNithi,
    TanaRiver,
    Isiolo,
    Garissa,
    TaitaTaveta,
    WestPokot,
    Baringo,
    Samburu,
    Kitui,
}

impl Region {
    /// All regions in selector order.
    pub const ALL: [Region; 18] = [
        Region::Kisii,
        Region::Laikipia,
        Region::Migori,
        Region::Kisumu,
        Region::Lamu,
        Region::Kilifi,
        Region::Kwale,
        Region::Muranga,
        Region::Narok,
        Region::TharakaNithi,
        Region::TanaRiver,
        Region::Isiolo,
        Region::Garissa,
        Region::TaitaTaveta,
        Region::WestPokot,
        Region::Baringo,
        Region::Samburu,
        Region::Kitui,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Region::Kisii => "Kisii",
            Region::Laikipia => "Laikipia",
            Region::Migori => "Migori",
            Region::Kisumu => "Kisumu",
            Region::Lamu => "Lamu",
            Region::Kilifi => "Kilifi",
            Region::Kwale => "Kwale",
            Region::Muranga => "Murang'a",
            Region::Narok => "Narok",
            Region::TharakaNithi => "Tharaka Nithi",
            Region::TanaRiver => "Tana River",
            Region::Isiolo => "Isiolo",
            Region::Garissa => "Garissa",
            Region::TaitaTaveta => "Taita Taveta",
            Region::WestPokot => "West Pokot",
            Region::Baringo => "Baringo",
            Region::Samburu => "Samburu",
            Region::Kitui => "Kitui",
        }
    }

    /// Directory and file-name friendly name: `tharaka_nithi`, `muranga`.
    pub fn slug(self) -> String {
        slugify(self.display_name())
    }

    /// Label of the county-wide summary dataset.
    pub fn summary_label(self) -> String {
        format!("{} County Summary", self.display_name())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lowercase, ASCII alphanumerics only, words joined by `_`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_sep = true;
        }
    }
    out
}
