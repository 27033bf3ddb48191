use std::collections::HashMap;
use std::path::Path;

/// Canonical sign table: the 26 lowercase Latin letters plus the word
/// separator, one Egyptian hieroglyph each.
pub static GLYPH_TABLE: &[(char, &str)] = &[
    ('a', "𓄿"),
    ('b', "𓃀"),
    ('c', "𓎢"),
    ('d', "𓂧"),
    ('e', "𓅂"),
    ('f', "𓆑"),
    ('g', "𓎼"),
    ('h', "𓉔"),
    ('i', "𓇋"),
    ('j', "𓆓"),
    ('k', "𓈎"),
    ('l', "𓃭"),
    ('m', "𓅓"),
    ('n', "𓈖"),
    ('o', "𓅱"),
    ('p', "𓊪"),
    ('q', "𓎡"),
    ('r', "𓂋"),
    ('s', "𓋴"),
    ('t', "𓏏"),
    ('u', "𓅲"),
    ('v', "𓆯"),
    ('w', "𓅃"),
    ('x', "𓇨"),
    ('y', "𓇌"),
    ('z', "𓊃"),
    (' ', "𓐍"),
];

#[derive(Debug, thiserror::Error)]
pub enum GlyphMapError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid glyph map: {0}")]
    Invalid(String),
}

/// Immutable letter → glyph mapping.
///
/// The key domain is fixed: exactly a-z plus one space. A replacement
/// table loaded from disk is validated against that domain; after
/// construction the map never changes, so shared references are safe
/// across request tasks without locking.
#[derive(Clone, Debug)]
pub struct GlyphMap {
    glyphs: HashMap<char, String>,
}

impl GlyphMap {
    /// The built-in canonical table.
    pub fn builtin() -> Self {
        let glyphs = GLYPH_TABLE
            .iter()
            .map(|(c, glyph)| (*c, (*glyph).to_string()))
            .collect();
        Self { glyphs }
    }

    /// Load a replacement table from a JSON object of single-character
    /// keys to non-empty glyph strings, covering exactly a-z plus space.
    pub fn from_path(path: &Path) -> Result<Self, GlyphMapError> {
        let raw = std::fs::read_to_string(path).map_err(|e| GlyphMapError::Io(e.to_string()))?;
        let GlyphEntries(entries) =
            serde_json::from_str(&raw).map_err(|e| GlyphMapError::Parse(e.to_string()))?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<(String, String)>) -> Result<Self, GlyphMapError> {
        let mut glyphs = HashMap::with_capacity(entries.len());
        for (key, glyph) in entries {
            let mut chars = key.chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(GlyphMapError::Invalid(format!(
                        "key {key:?} is not a single character"
                    )))
                }
            };
            if glyph.is_empty() {
                return Err(GlyphMapError::Invalid(format!("empty glyph for key {key:?}")));
            }
            if glyphs.insert(c, glyph).is_some() {
                return Err(GlyphMapError::Invalid(format!("duplicate key {key:?}")));
            }
        }

        for expected in ('a'..='z').chain(std::iter::once(' ')) {
            if !glyphs.contains_key(&expected) {
                return Err(GlyphMapError::Invalid(format!("missing key {expected:?}")));
            }
        }
        if glyphs.len() != GLYPH_TABLE.len() {
            let extra: Vec<char> = glyphs
                .keys()
                .filter(|c| !c.is_ascii_lowercase() && **c != ' ')
                .copied()
                .collect();
            return Err(GlyphMapError::Invalid(format!("unexpected keys {extra:?}")));
        }

        Ok(Self { glyphs })
    }

    pub fn glyph(&self, c: char) -> Option<&str> {
        self.glyphs.get(&c).map(String::as_str)
    }

    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains_key(&c)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Entry list parsed from a glyph resource. Deserialized through a map
/// visitor so a key duplicated in the file survives to validation
/// instead of collapsing to its last occurrence.
struct GlyphEntries(Vec<(String, String)>);

impl<'de> serde::Deserialize<'de> for GlyphEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct EntryVisitor;

        impl<'de> serde::de::Visitor<'de> for EntryVisitor {
            type Value = GlyphEntries;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an object of letter keys to glyph strings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry()? {
                    entries.push(pair);
                }
                Ok(GlyphEntries(entries))
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}
