// src/descriptor/glyph_map.rs

//! Insertion-ordered character → glyph rectangle map.
//!
//! FixedHeight fonts fall back to the *first* glyph, and saved descriptors
//! must be byte-stable, so iteration order is the order glyphs were added (or
//! the order they appear in the JSON document).

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::surface::GlyphRect;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphMap {
    entries: Vec<(char, GlyphRect)>,
    index: HashMap<char, usize>,
}

impl GlyphMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a glyph. A replaced glyph keeps its original
    /// position; the previous rectangle is returned.
    pub fn insert(&mut self, ch: char, rect: GlyphRect) -> Option<GlyphRect> {
        match self.index.get(&ch) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, rect)),
            None => {
                self.index.insert(ch, self.entries.len());
                self.entries.push((ch, rect));
                None
            }
        }
    }

    pub fn get(&self, ch: char) -> Option<&GlyphRect> {
        self.index.get(&ch).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.index.contains_key(&ch)
    }

    /// The first-inserted glyph.
    pub fn first(&self) -> Option<(char, GlyphRect)> {
        self.entries.first().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &GlyphRect)> + '_ {
        self.entries.iter().map(|(ch, rect)| (*ch, rect))
    }

    pub fn values(&self) -> impl Iterator<Item = &GlyphRect> + '_ {
        self.entries.iter().map(|(_, rect)| rect)
    }
}

impl FromIterator<(char, GlyphRect)> for GlyphMap {
    fn from_iter<I: IntoIterator<Item = (char, GlyphRect)>>(iter: I) -> Self {
        let mut map = GlyphMap::new();
        for (ch, rect) in iter {
            map.insert(ch, rect);
        }
        map
    }
}

impl Serialize for GlyphMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (ch, rect) in &self.entries {
            map.serialize_entry(&ch.to_string(), rect)?;
        }
        map.end()
    }
}

struct GlyphMapVisitor;

impl<'de> Visitor<'de> for GlyphMapVisitor {
    type Value = GlyphMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from single characters to glyph rectangles")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<GlyphMap, A::Error> {
        let mut map = GlyphMap::new();
        while let Some((key, rect)) = access.next_entry::<String, GlyphRect>()? {
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    return Err(serde::de::Error::custom(format!(
                        "glyph key '{}' must be exactly one character",
                        key
                    )))
                }
            };
            if map.insert(ch, rect).is_some() {
                return Err(serde::de::Error::custom(format!(
                    "duplicate glyph key '{}'",
                    key
                )));
            }
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for GlyphMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GlyphMapVisitor)
    }
}
