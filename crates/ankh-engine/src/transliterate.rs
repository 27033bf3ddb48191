use crate::glyphs::GlyphMap;

/// Map each character of `input` through the glyph table.
///
/// Characters are lowercased before lookup; anything outside the table
/// passes through unchanged with its original casing. No input fails and
/// no character is ever dropped.
pub fn transliterate(glyphs: &GlyphMap, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let mut lowered = c.to_lowercase();
        let first = lowered.next().unwrap_or(c);
        match lowered.next() {
            // Common case: one-to-one lowering.
            None => match glyphs.glyph(first) {
                Some(glyph) => out.push_str(glyph),
                None => out.push(c),
            },
            // Rare multi-character lowerings (e.g. 'İ') are looked up per
            // expanded character.
            Some(second) => {
                for lc in [first, second].into_iter().chain(lowered) {
                    match glyphs.glyph(lc) {
                        Some(glyph) => out.push_str(glyph),
                        None => out.push(lc),
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> GlyphMap {
        GlyphMap::builtin()
    }

    #[test]
    fn maps_lowercase_letters() {
        assert_eq!(transliterate(&map(), "abc"), "𓄿𓃀𓎢");
    }

    #[test]
    fn uppercase_is_lowered_first() {
        assert_eq!(transliterate(&map(), "ABC"), transliterate(&map(), "abc"));
    }

    #[test]
    fn repeated_letters_map_per_occurrence() {
        assert_eq!(transliterate(&map(), "hello"), "𓉔𓅂𓃭𓃭𓅱");
    }

    #[test]
    fn full_alphabet_golden() {
        assert_eq!(
            transliterate(&map(), "abcdefghijklmnopqrstuvwxyz"),
            "𓄿𓃀𓎢𓂧𓅂𓆑𓎼𓉔𓇋𓆓𓈎𓃭𓅓𓈖𓅱𓊪𓎡𓂋𓋴𓏏𓅲𓆯𓅃𓇨𓇌𓊃"
        );
    }

    #[test]
    fn space_becomes_separator_glyph() {
        assert_eq!(transliterate(&map(), "a b"), "𓄿𓐍𓃀");
    }

    #[test]
    fn unmapped_characters_pass_through() {
        assert_eq!(transliterate(&map(), "a1!"), "𓄿1!");
        assert_eq!(transliterate(&map(), "3.14"), "3.14");
    }

    #[test]
    fn unmapped_uppercase_keeps_its_case() {
        // 'Σ' lowers to 'σ', which is not a key; the original survives.
        assert_eq!(transliterate(&map(), "Σ"), "Σ");
    }

    #[test]
    fn arabic_letters_pass_through() {
        // Letters survive untouched; the space between them still maps.
        assert_eq!(transliterate(&map(), "نهر النيل"), "نهر𓐍النيل");
    }

    #[test]
    fn empty_input_empty_output() {
        assert_eq!(transliterate(&map(), ""), "");
    }

    #[test]
    fn deterministic() {
        let a = transliterate(&map(), "Hello World");
        let b = transliterate(&map(), "Hello World");
        assert_eq!(a, b);
    }

    #[test]
    fn second_application_is_a_noop() {
        let once = transliterate(&map(), "the quick brown fox 42!");
        let twice = transliterate(&map(), &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn multi_character_lowering_handled_per_char() {
        // 'İ' lowers to "i\u{307}"; the i maps, the combining dot passes.
        assert_eq!(transliterate(&map(), "İ"), "𓇋\u{307}");
    }

    #[test]
    fn mixed_sentence() {
        assert_eq!(
            transliterate(&map(), "the river"),
            "𓏏𓉔𓅂𓐍𓂋𓇋𓆯𓅂𓂋"
        );
    }
}
