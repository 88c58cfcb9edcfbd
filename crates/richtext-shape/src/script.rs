//! Which text is worth shaping

use std::ops::RangeInclusive;

use icu_properties::{props::Script, CodePointMapData, CodePointMapDataBorrowed};

/// Devanagari, Devanagari Extended and Vedic Extensions
pub const DEVANAGARI_RANGES: [RangeInclusive<u32>; 3] =
    [0x0900..=0x097F, 0xA8E0..=0xA8FF, 0x1CD0..=0x1CFF];

/// Decides whether a string needs a real shaper
///
/// Text qualifies when any character falls in one of the configured code
/// point ranges, or belongs to one of the configured Unicode scripts.
/// The default detector knows Devanagari only.
#[derive(Debug, Clone)]
pub struct ComplexScripts {
    ranges: Vec<RangeInclusive<u32>>,
    scripts: Vec<Script>,
    script_map: CodePointMapDataBorrowed<'static, Script>,
}

impl ComplexScripts {
    /// A detector that matches nothing
    pub fn empty() -> Self {
        Self {
            ranges: Vec::new(),
            scripts: Vec::new(),
            script_map: CodePointMapData::<Script>::new(),
        }
    }

    pub fn devanagari() -> Self {
        Self::empty().with_ranges(DEVANAGARI_RANGES)
    }

    pub fn with_range(mut self, range: RangeInclusive<char>) -> Self {
        self.ranges.push(*range.start() as u32..=*range.end() as u32);
        self
    }

    pub fn with_ranges(mut self, ranges: impl IntoIterator<Item = RangeInclusive<u32>>) -> Self {
        self.ranges.extend(ranges);
        self
    }

    /// Also shape any text in `script`
    pub fn with_script(mut self, script: Script) -> Self {
        if !self.scripts.contains(&script) {
            self.scripts.push(script);
        }
        self
    }

    pub fn needs_shaping(&self, text: &str) -> bool {
        text.chars().any(|ch| self.is_complex(ch))
    }

    fn is_complex(&self, ch: char) -> bool {
        let cp = ch as u32;
        if self.ranges.iter().any(|r| r.contains(&cp)) {
            return true;
        }
        !self.scripts.is_empty() && self.scripts.contains(&self.script_map.get(ch))
    }
}

impl Default for ComplexScripts {
    fn default() -> Self {
        Self::devanagari()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_devanagari_detected() {
        let detector = ComplexScripts::default();
        assert!(detector.needs_shaping("नमस्ते"));
        assert!(detector.needs_shaping("Hello नमस्ते"));
        assert!(detector.needs_shaping("\u{A8E0}"));
        assert!(detector.needs_shaping("\u{1CD0}"));
    }

    #[test]
    fn test_latin_not_detected() {
        let detector = ComplexScripts::default();
        assert!(!detector.needs_shaping("Hello, world"));
        assert!(!detector.needs_shaping(""));
        assert!(!detector.needs_shaping("\u{0980}"));
    }

    #[test]
    fn test_extra_scripts() {
        let detector = ComplexScripts::default().with_script(Script::Arabic);
        assert!(detector.needs_shaping("مرحبا"));
        assert!(!detector.needs_shaping("plain"));

        let bengali = ComplexScripts::empty().with_range('\u{0980}'..='\u{09FF}');
        assert!(bengali.needs_shaping("\u{0995}"));
        assert!(!bengali.needs_shaping("नमस्ते"));
    }

    proptest! {
        #[test]
        fn ascii_never_needs_shaping(s in "[ -~]*") {
            prop_assert!(!ComplexScripts::default().needs_shaping(&s));
        }

        #[test]
        fn one_devanagari_char_is_enough(prefix in "[a-z ]{0,8}", cp in 0x0900u32..=0x097F) {
            let ch = char::from_u32(cp).unwrap_or('\u{0915}');
            let text = format!("{prefix}{ch}");
            prop_assert!(ComplexScripts::default().needs_shaping(&text));
        }
    }
}
