//! Theme - named color palettes over semantic tags
//!
//! Every line the renderer emits carries a semantic tag (kernel,
//! thought, network, ...) which the active theme maps to a terminal
//! style. Themes are selected once at startup and read-only for the
//! rest of the run.

use std::collections::HashMap;

use colored::{Color, ColoredString, Colorize};
use once_cell::sync::Lazy;

/// Semantic tags the renderer can request a style for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Log,
    Kernel,
    Async,
    Thought,
    Error,
    Success,
    Warning,
    Heartbeat,
    Network,
    Cpu,
    Memory,
    Security,
    Dream,
    Animation,
    Critical,
    Info,
    Debug,
}

/// All tags, for exhaustive fallback checks in tests.
pub const ALL_TAGS: [Tag; 17] = [
    Tag::Log,
    Tag::Kernel,
    Tag::Async,
    Tag::Thought,
    Tag::Error,
    Tag::Success,
    Tag::Warning,
    Tag::Heartbeat,
    Tag::Network,
    Tag::Cpu,
    Tag::Memory,
    Tag::Security,
    Tag::Dream,
    Tag::Animation,
    Tag::Critical,
    Tag::Info,
    Tag::Debug,
];

/// Display style for one tag: a color plus brightness modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagStyle {
    pub color: Color,
    pub bold: bool,
    pub dimmed: bool,
}

impl TagStyle {
    pub const fn plain(color: Color) -> Self {
        Self {
            color,
            bold: false,
            dimmed: false,
        }
    }

    pub const fn bold(color: Color) -> Self {
        Self {
            color,
            bold: true,
            dimmed: false,
        }
    }

    pub const fn dim(color: Color) -> Self {
        Self {
            color,
            bold: false,
            dimmed: true,
        }
    }

    /// Apply the style to a piece of text.
    pub fn paint(&self, text: &str) -> ColoredString {
        let mut s = text.color(self.color);
        if self.bold {
            s = s.bold();
        }
        if self.dimmed {
            s = s.dimmed();
        }
        s
    }
}

/// Style used when neither the tag nor the `log` fallback is present.
const NEUTRAL: TagStyle = TagStyle::plain(Color::White);

/// Named palette mapping tags to styles.
///
/// Entries may omit tags; `resolve` falls back to the palette's `log`
/// entry, then to a neutral default. It never fails.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    entries: &'static [(Tag, TagStyle)],
}

impl Theme {
    /// Look up a theme by name, falling back to `default` for unknown
    /// names. Never errors.
    pub fn named(name: &str) -> &'static Theme {
        THEMES
            .get(name)
            .copied()
            .unwrap_or_else(|| THEMES.get(DEFAULT_THEME).copied().unwrap_or(&DEFAULT))
    }

    /// Names of all built-in palettes.
    pub fn available() -> Vec<&'static str> {
        let mut names: Vec<_> = THEMES.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolve a tag to a style, with the fallback chain
    /// tag -> log entry -> neutral.
    pub fn resolve(&self, tag: Tag) -> TagStyle {
        self.lookup(tag)
            .or_else(|| self.lookup(Tag::Log))
            .unwrap_or(NEUTRAL)
    }

    /// Resolve and apply in one step.
    pub fn paint(&self, tag: Tag, text: &str) -> ColoredString {
        self.resolve(tag).paint(text)
    }

    fn lookup(&self, tag: Tag) -> Option<TagStyle> {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, s)| *s)
    }
}

pub const DEFAULT_THEME: &str = "default";

static DEFAULT: Theme = Theme {
    name: "default",
    entries: &[
        (Tag::Log, TagStyle::plain(Color::White)),
        (Tag::Kernel, TagStyle::plain(Color::Green)),
        (Tag::Async, TagStyle::plain(Color::Cyan)),
        (Tag::Thought, TagStyle::plain(Color::Yellow)),
        (Tag::Error, TagStyle::plain(Color::Red)),
        (Tag::Success, TagStyle::plain(Color::Green)),
        (Tag::Warning, TagStyle::plain(Color::Yellow)),
        (Tag::Heartbeat, TagStyle::plain(Color::Green)),
        (Tag::Network, TagStyle::plain(Color::Blue)),
        (Tag::Cpu, TagStyle::plain(Color::Yellow)),
        (Tag::Memory, TagStyle::plain(Color::Cyan)),
        (Tag::Security, TagStyle::plain(Color::Magenta)),
        (Tag::Dream, TagStyle::plain(Color::Magenta)),
        (Tag::Animation, TagStyle::plain(Color::Cyan)),
        (Tag::Critical, TagStyle::bold(Color::Red)),
        (Tag::Info, TagStyle::dim(Color::White)),
        (Tag::Debug, TagStyle::plain(Color::BrightBlack)),
    ],
};

static MATRIX: Theme = Theme {
    name: "matrix",
    entries: &[
        (Tag::Log, TagStyle::plain(Color::Green)),
        (Tag::Kernel, TagStyle::plain(Color::BrightGreen)),
        (Tag::Async, TagStyle::dim(Color::Green)),
        (Tag::Thought, TagStyle::bold(Color::BrightGreen)),
        (Tag::Error, TagStyle::plain(Color::Red)),
        (Tag::Success, TagStyle::bold(Color::Green)),
        (Tag::Warning, TagStyle::dim(Color::Yellow)),
        (Tag::Heartbeat, TagStyle::bold(Color::Green)),
        (Tag::Network, TagStyle::plain(Color::Green)),
        (Tag::Cpu, TagStyle::dim(Color::Green)),
        (Tag::Memory, TagStyle::plain(Color::BrightGreen)),
        (Tag::Security, TagStyle::plain(Color::Red)),
        (Tag::Dream, TagStyle::dim(Color::Green)),
        (Tag::Animation, TagStyle::plain(Color::BrightGreen)),
        (Tag::Critical, TagStyle::bold(Color::Red)),
        (Tag::Info, TagStyle::dim(Color::Green)),
        (Tag::Debug, TagStyle::plain(Color::BrightBlack)),
    ],
};

static CYBERPUNK: Theme = Theme {
    name: "cyberpunk",
    entries: &[
        (Tag::Log, TagStyle::plain(Color::BrightCyan)),
        (Tag::Kernel, TagStyle::plain(Color::BrightMagenta)),
        (Tag::Async, TagStyle::plain(Color::BrightYellow)),
        (Tag::Thought, TagStyle::plain(Color::BrightRed)),
        (Tag::Error, TagStyle::bold(Color::Red)),
        (Tag::Success, TagStyle::plain(Color::BrightGreen)),
        (Tag::Warning, TagStyle::plain(Color::BrightYellow)),
        (Tag::Heartbeat, TagStyle::plain(Color::BrightMagenta)),
        (Tag::Network, TagStyle::plain(Color::BrightBlue)),
        (Tag::Cpu, TagStyle::plain(Color::BrightYellow)),
        (Tag::Memory, TagStyle::plain(Color::BrightCyan)),
        (Tag::Security, TagStyle::plain(Color::BrightRed)),
        (Tag::Dream, TagStyle::plain(Color::BrightMagenta)),
        (Tag::Animation, TagStyle::plain(Color::BrightCyan)),
        (Tag::Critical, TagStyle::bold(Color::BrightRed)),
        (Tag::Info, TagStyle::dim(Color::BrightWhite)),
        (Tag::Debug, TagStyle::plain(Color::BrightBlack)),
    ],
};

static RETRO: Theme = Theme {
    name: "retro",
    entries: &[
        (Tag::Log, TagStyle::plain(Color::Yellow)),
        (Tag::Kernel, TagStyle::plain(Color::Green)),
        (Tag::Async, TagStyle::plain(Color::Cyan)),
        (Tag::Thought, TagStyle::plain(Color::Magenta)),
        (Tag::Error, TagStyle::plain(Color::Red)),
        (Tag::Success, TagStyle::plain(Color::Green)),
        (Tag::Warning, TagStyle::plain(Color::Yellow)),
        (Tag::Heartbeat, TagStyle::plain(Color::Green)),
        (Tag::Network, TagStyle::plain(Color::Blue)),
        (Tag::Dream, TagStyle::plain(Color::Magenta)),
        (Tag::Animation, TagStyle::plain(Color::Cyan)),
        (Tag::Critical, TagStyle::bold(Color::Red)),
        (Tag::Info, TagStyle::plain(Color::White)),
        (Tag::Debug, TagStyle::plain(Color::BrightBlack)),
    ],
};

// Minimal deliberately omits most tags and leans on the log fallback.
static MINIMAL: Theme = Theme {
    name: "minimal",
    entries: &[
        (Tag::Log, TagStyle::plain(Color::White)),
        (Tag::Error, TagStyle::plain(Color::Red)),
        (Tag::Critical, TagStyle::plain(Color::Red)),
        (Tag::Info, TagStyle::dim(Color::White)),
        (Tag::Debug, TagStyle::dim(Color::White)),
    ],
};

static THEMES: Lazy<HashMap<&'static str, &'static Theme>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for theme in [&DEFAULT, &MATRIX, &CYBERPUNK, &RETRO, &MINIMAL] {
        m.insert(theme.name, theme);
    }
    m
});
