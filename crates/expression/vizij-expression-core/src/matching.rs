//! Name heuristics that map catalog fragments and bone names onto whatever
//! naming convention a rig vendor picked.
//!
//! Matching is deliberately loose. A fragment activates a channel when either
//! name contains the other (ignoring ASCII case), so `mouthSmile` drives
//! `mouthSmileLeft` and `mouthSmileRight`. The flip side is that very short
//! channel names (`mouth`, `eye`) are contained in many fragments and will be
//! activated by unrelated emotions on unusual rigs. There is no
//! canonicalization table beyond this heuristic.

/// Substrings that tag a morph channel as an eyelid-close channel.
pub const BLINK_MARKERS: [&str; 3] = ["blink", "eye_close", "eyeblink"];

/// Bidirectional substring match on names that are already ASCII-lowercased.
#[inline]
pub fn fuzzy_matches_lower(channel: &str, fragment: &str) -> bool {
    channel.contains(fragment) || fragment.contains(channel)
}

/// Bidirectional, case-insensitive substring match between a rig channel name
/// and a catalog fragment.
pub fn fuzzy_matches(channel: &str, fragment: &str) -> bool {
    fuzzy_matches_lower(
        &channel.to_ascii_lowercase(),
        &fragment.to_ascii_lowercase(),
    )
}

/// Lowercased copies of `names`, for matching many channels against them.
pub fn lowercase_all<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.as_ref().to_ascii_lowercase())
        .collect()
}

/// True when the lowercased `channel` matches any lowercased fragment.
pub fn matches_any_lower(channel: &str, fragments: &[String]) -> bool {
    fragments.iter().any(|f| fuzzy_matches_lower(channel, f))
}

/// Channels the blink scheduler owns.
pub fn is_blink_channel(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    BLINK_MARKERS.iter().any(|m| lower.contains(m))
}

/// Head or neck bone, picked up for idle head sway.
pub fn is_head_bone(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("head") || lower.contains("neck")
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EyeSide {
    Left,
    Right,
}

/// Eye bones need `eye` plus a side marker; `left` is checked first.
pub fn eye_side(name: &str) -> Option<EyeSide> {
    let lower = name.to_ascii_lowercase();
    if !lower.contains("eye") {
        return None;
    }
    if lower.contains("left") {
        Some(EyeSide::Left)
    } else if lower.contains("right") {
        Some(EyeSide::Right)
    } else {
        None
    }
}
