//! Administrative-unit abbreviation expansion
//!
//! The catalogue stores type codes (`г`, `обл`, ...). Display strings use
//! the full words. Regions and localities keep separate tables.

/// Region-level codes
const REGION_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Респ", "республика"),
    ("обл", "область"),
    ("Аобл", "автономная область"),
    ("АО", "автономный округ"),
    ("р-н", "район"),
];

/// Locality-level codes
const LOCALITY_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Респ", "республика"),
    ("обл", "область"),
    ("АО", "автономный округ"),
    ("р-н", "район"),
    ("г", "город"),
    ("п", "поселок"),
    ("с", "село"),
    ("х", "хутор"),
    ("д", "деревня"),
    ("нп", "населенный пункт"),
    ("п/ст", "поселок при станции"),
    ("сл", "слобода"),
    ("снт", "садовое некоммерческое товарищество"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expander {
    Region,
    Locality,
}

impl Expander {
    /// Pick the table for a document: top-level records are regions
    pub fn for_document(is_top_level: bool) -> Self {
        if is_top_level {
            Expander::Region
        } else {
            Expander::Locality
        }
    }

    fn table(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Expander::Region => REGION_ABBREVIATIONS,
            Expander::Locality => LOCALITY_ABBREVIATIONS,
        }
    }

    /// Full word for `code`; unknown codes come back unchanged
    pub fn expand<'a>(&self, code: &'a str) -> &'a str {
        let code = code.trim();
        self.table()
            .iter()
            .find(|(short, _)| *short == code)
            .map(|(_, full)| *full)
            .unwrap_or(code)
    }
}

/// Locality-level expansion
pub fn expand(code: &str) -> &str {
    Expander::Locality.expand(code)
}

/// Expand a trailing `г` city token inside an assembled full name.
///
/// `"Казань г, Татарстан Респ"` becomes `"Казань город, Татарстан Респ"`.
/// Only the last ` г,` occurrence is rewritten; other tokens are untouched.
/// The whitespace run before the token collapses into one space.
pub fn fix_full_name(full_name: &str) -> String {
    const TOKEN: &str = "г,";

    let candidate = full_name.rmatch_indices(TOKEN).find(|(idx, _)| {
        full_name[..*idx]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace)
    });

    match candidate {
        Some((idx, _)) => {
            // 整段空白压成一个空格
            let head = full_name[..idx].trim_end();
            format!("{} город{}", head, &full_name[idx + "г".len()..])
        }
        None => full_name.to_string(),
    }
}
