//! Approximate default op-amp parameters by part name.

/// Known parts: (subckt name, A0, GBW in Hz). Compared case-insensitively.
const PART_PRESETS: &[(&str, f64, f64)] = &[
    // ADI OP284 dual op-amp, GBW ~ 4 MHz
    ("OP284", 2e5, 4e6),
    // TI TL072, GBW ~ 3 MHz
    ("TL072", 2e5, 3e6),
];

/// Look up preset (A0, GBW) for a part name.
pub fn part_preset(name: &str) -> Option<(f64, f64)> {
    PART_PRESETS
        .iter()
        .find(|(part, _, _)| part.eq_ignore_ascii_case(name))
        .map(|(_, a0, gbw)| (*a0, *gbw))
}
