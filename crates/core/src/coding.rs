//! Delimited multi-value decoding.
//!
//! Several columns pack zero or more coded entries into one string:
//!
//! ```text
//! system,code,display|system,code,display
//! ```
//!
//! Entries are separated by `|` and positions within an entry by `,`. Every mapper that emits
//! coded arrays goes through [`decode`] (or [`decode_positions`] for wider entries such as next
//! of kin), so the grammar is implemented exactly once.

use fhir::datatypes::{CodeableConcept, Coding};
use sider_types::present_or_absent;

pub const ENTRY_DELIMITER: char = '|';
pub const POSITION_DELIMITER: char = ',';

/// One decoded `(system, code, display)` triple. Any position may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodedEntry {
    pub system: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
}

impl CodedEntry {
    pub fn to_coding(&self) -> Coding {
        Coding::from_parts(self.system.clone(), self.code.clone(), self.display.clone())
    }

    /// A concept holding this entry as its only coding.
    pub fn to_concept(&self) -> CodeableConcept {
        CodeableConcept::single(self.to_coding())
    }
}

/// Split `raw` into entries of exactly `N` positions.
///
/// Order is preserved. Empty entries are kept with every position absent, missing trailing
/// positions are absent, and positions beyond `N` are ignored. An absent or empty `raw` yields
/// no entries.
pub fn decode_positions<const N: usize>(raw: Option<&str>) -> Vec<[Option<String>; N]> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };

    raw.split(ENTRY_DELIMITER)
        .map(|entry| {
            let mut positions = entry.split(POSITION_DELIMITER);
            std::array::from_fn(|_| present_or_absent(positions.next()))
        })
        .collect()
}

/// Decode a `system,code,display|...` column into coded entries.
pub fn decode(raw: Option<&str>) -> Vec<CodedEntry> {
    decode_positions::<3>(raw)
        .into_iter()
        .map(|[system, code, display]| CodedEntry {
            system,
            code,
            display,
        })
        .collect()
}

/// Decode a column straight into one concept per entry.
pub fn decode_concepts(raw: Option<&str>) -> Vec<CodeableConcept> {
    decode(raw).iter().map(CodedEntry::to_concept).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(system: &str, code: &str, display: &str) -> CodedEntry {
        CodedEntry {
            system: Some(system.into()),
            code: Some(code.into()),
            display: Some(display.into()),
        }
    }

    #[test]
    fn decodes_entries_in_order() {
        let decoded = decode(Some("sys,code,disp|sys2,code2,disp2"));
        assert_eq!(
            decoded,
            vec![entry("sys", "code", "disp"), entry("sys2", "code2", "disp2")]
        );
    }

    #[test]
    fn absent_or_empty_input_yields_nothing() {
        assert!(decode(None).is_empty());
        assert!(decode(Some("")).is_empty());
    }

    #[test]
    fn missing_positions_are_absent() {
        let decoded = decode(Some("sys,code"));
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].system.as_deref(), Some("sys"));
        assert_eq!(decoded[0].code.as_deref(), Some("code"));
        assert_eq!(decoded[0].display, None);
    }

    #[test]
    fn empty_entries_and_positions_are_kept_as_absent() {
        let decoded = decode(Some("a,,c||,b"));
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].code, None);
        assert_eq!(decoded[0].display.as_deref(), Some("c"));
        assert_eq!(decoded[1], CodedEntry::default());
        assert_eq!(decoded[2].system, None);
        assert_eq!(decoded[2].code.as_deref(), Some("b"));
    }

    #[test]
    fn extra_positions_are_ignored() {
        let decoded = decode(Some("s,c,d,extra,more"));
        assert_eq!(decoded, vec![entry("s", "c", "d")]);
    }

    #[test]
    fn wider_entries_keep_every_position() {
        let decoded = decode_positions::<6>(Some("sys,SPS,Spouse,Jane,Doe,0123|,,,Bob"));
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0][4].as_deref(), Some("Doe"));
        assert_eq!(decoded[0][5].as_deref(), Some("0123"));
        assert_eq!(decoded[1][3].as_deref(), Some("Bob"));
        assert_eq!(decoded[1][5], None);
    }

    #[test]
    fn concepts_wrap_each_entry() {
        let concepts = decode_concepts(Some("sys,code,disp"));
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].coding[0].code.as_deref(), Some("code"));
        assert_eq!(concepts[0].text, None);
    }
}
