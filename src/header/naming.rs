//! Constant naming.
//!
//! A [`ConstantPath`] records where a leaf sits in the configuration tree.
//! Its name is the uppercase join of the segments with `_`:
//! `battery.soc_offset_percent.empty` becomes
//! `BATTERY_SOC_OFFSET_PERCENT_EMPTY`, and assist level 0 of the standard
//! table becomes `ASSIST_LEVEL_STANDARD_0_<FIELD>`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Position of a leaf in the configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantPath {
    segments: Vec<Segment>,
}

impl ConstantPath {
    /// Empty path at the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path extended by a field name.
    pub fn key(&self, key: &str) -> Self {
        self.with(Segment::Key(key.to_string()))
    }

    /// Path extended by a sequence index.
    pub fn index(&self, index: usize) -> Self {
        self.with(Segment::Index(index))
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Symbolic constant name of this path.
    pub fn name(&self) -> String {
        constant_name(&self.segments)
    }
}

fn constant_name(segments: &[Segment]) -> String {
    let mut name = String::new();
    for segment in segments {
        if !name.is_empty() {
            name.push('_');
        }
        match segment {
            Segment::Key(key) => name.push_str(&key.to_uppercase()),
            Segment::Index(index) => name.push_str(&index.to_string()),
        }
    }
    name
}

impl fmt::Display for ConstantPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_record_name() {
        let path = ConstantPath::root()
            .key("battery")
            .key("soc_offset_percent")
            .key("empty");
        assert_eq!(path.name(), "BATTERY_SOC_OFFSET_PERCENT_EMPTY");
    }

    #[test]
    fn test_assist_level_name() {
        let path = ConstantPath::root()
            .key("assist_level")
            .key("standard")
            .index(0)
            .key("flags");
        assert_eq!(path.name(), "ASSIST_LEVEL_STANDARD_0_FLAGS");

        let path = ConstantPath::root()
            .key("assist_level")
            .key("sport")
            .index(9)
            .key("max_throttle_current_percent");
        assert_eq!(path.name(), "ASSIST_LEVEL_SPORT_9_MAX_THROTTLE_CURRENT_PERCENT");
    }

    #[test]
    fn test_root_is_empty() {
        let root = ConstantPath::root();
        assert_eq!(root.name(), "");
        assert_eq!(root, ConstantPath::default());
        assert_eq!(root.key("lights").name(), "LIGHTS");
    }

    #[test]
    fn test_extending_does_not_mutate_parent() {
        let parent = ConstantPath::root().key("walk_mode");
        let _ = parent.key("speed");
        assert_eq!(parent.name(), "WALK_MODE");
    }
}
