//! Terminal renderer.
//!
//! Turns (text, tag, timing) into terminal output: instant lines,
//! character-by-character typing, and a small library of single-line
//! animations. All delays are divided by the configured speed factor.
//! Frame generation is split into pure functions so the visuals are
//! testable without a terminal.
//!
//! When the sink is not a live terminal the animations degrade to one
//! sequential completion line each; ordering is preserved and nothing
//! fails.

use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

use crate::config::RunConfig;
use crate::rng::StoryRng;
use crate::sink::OutputSink;
use crate::theme::{Tag, Theme};

/// Animation frames per second at speed 1.0.
pub const FRAME_RATE: f64 = 10.0;

/// Base tick between animation frames.
const FRAME_TICK: Duration = Duration::from_millis(100);

/// Process start, for kernel-style uptime stamps.
static START: Lazy<Instant> = Lazy::new(Instant::now);

/// Scale a base delay by the speed factor. The factor is clamped at
/// configuration time, so this never divides by zero.
pub fn scaled_delay(base: Duration, speed: f64) -> Duration {
    base.div_f64(speed)
}

/// Wall-clock stamp: `[2026-08-28 14:03:07.123]`.
pub fn timestamp() -> String {
    format!("[{}]", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
}

/// Kernel-style stamp: seconds of uptime with microsecond digits.
pub fn kernel_timestamp() -> String {
    format!("[{:>12.6}]", START.elapsed().as_secs_f64())
}

/// Which stamp a rendered line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    Wall,
    Kernel,
    None,
}

impl Stamp {
    pub fn prefix(self) -> String {
        match self {
            Stamp::Wall => format!("{} ", timestamp()),
            Stamp::Kernel => format!("{} ", kernel_timestamp()),
            Stamp::None => String::new(),
        }
    }
}

/// Multi-frame animation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Spinner,
    Dots,
    Progress,
    Bounce,
    Wave,
    Matrix,
    Glitch,
}

// ─────────────────────────────────────────────────────────────────────
// Pure frame generators
// ─────────────────────────────────────────────────────────────────────

const SPINNER_GLYPHS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const WAVE_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const GLITCH_GLYPHS: [char; 8] = ['░', '▒', '▓', '█', '▄', '▀', '▐', '▌'];
const MATRIX_CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*";

pub fn spinner_frame(i: u64) -> &'static str {
    SPINNER_GLYPHS[(i as usize) % SPINNER_GLYPHS.len()]
}

pub fn dots_frame(i: u64) -> String {
    ".".repeat(((i as usize) % 20) + 1)
}

/// `[████░░░░] 42%`. The last frame is always a full bar at 100%.
pub fn progress_frame(i: u64, frames: u64, width: usize) -> String {
    let frames = frames.max(1);
    let step = (i + 1).min(frames);
    let filled = (width as u64 * step / frames) as usize;
    let percent = 100 * step / frames;
    format!(
        "[{}{}] {:3}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        percent
    )
}

/// A marker bouncing between the ends of the track.
pub fn bounce_frame(i: u64, width: usize) -> String {
    let width = width.max(2);
    let period = 2 * (width - 1) as u64;
    let p = i % period;
    let pos = if p < width as u64 {
        p as usize
    } else {
        (period - p) as usize
    };
    let mut track = vec![' '; width];
    track[pos] = '●';
    format!("[{}]", track.iter().collect::<String>())
}

/// Sine wave drawn with block elements.
pub fn wave_frame(i: u64, width: usize) -> String {
    (0..width)
        .map(|pos| {
            let phase = (pos as f64 + i as f64 * 2.0) * 0.3;
            let level = ((phase.sin() + 1.0) / 2.0 * 7.0).round() as usize;
            WAVE_GLYPHS[level.min(WAVE_GLYPHS.len() - 1)]
        })
        .collect()
}

/// A line of random matrix noise.
pub fn matrix_frame(rng: &mut StoryRng, width: usize) -> String {
    let chars: Vec<char> = MATRIX_CHARSET.chars().collect();
    (0..width)
        .map(|_| *rng.pick(&chars).unwrap_or(&'#'))
        .collect()
}

/// Corrupted variant of `text`; roughly `0.1 * intensity` of the
/// characters are replaced with block glyphs. Length is preserved.
pub fn glitch_frame(rng: &mut StoryRng, text: &str, intensity: u32) -> String {
    let p = 0.1 * f64::from(intensity);
    text.chars()
        .map(|c| {
            if rng.chance(p) {
                *rng.pick(&GLITCH_GLYPHS).unwrap_or(&'░')
            } else {
                c
            }
        })
        .collect()
}

/// Track width for bar-style animations, adapted to the terminal.
fn bar_width(animated: bool) -> usize {
    if animated {
        crossterm::terminal::size()
            .map(|(cols, _)| (cols as usize).saturating_sub(50).clamp(10, 30))
            .unwrap_or(20)
    } else {
        20
    }
}

// ─────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────

/// Synchronous renderer over the shared sink. Holds the theme and
/// speed by value; both are fixed for the process lifetime.
pub struct Renderer {
    theme: &'static Theme,
    speed: f64,
    sink: OutputSink,
}

impl Renderer {
    pub fn new(cfg: &RunConfig, sink: OutputSink) -> Self {
        Self {
            theme: Theme::named(&cfg.theme),
            speed: RunConfig::clamp_speed(cfg.speed),
            sink,
        }
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    pub fn sink(&self) -> &OutputSink {
        &self.sink
    }

    fn delay(&self, base: Duration) {
        let d = scaled_delay(base, self.speed);
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }

    /// One write, no delay. Used for banners and logos.
    pub fn instant(&self, text: &str, tag: Tag) {
        let styled = self.theme.paint(tag, text).to_string();
        self.sink.line(&styled, text);
    }

    /// Character-by-character typing with per-char jitter. Punctuation
    /// types slower, spaces faster. The sink stays locked for the
    /// whole line so concurrent writers cannot split it.
    pub fn typed(&self, rng: &mut StoryRng, text: &str, tag: Tag, per_char: Duration, stamp: Stamp) {
        let style = self.theme.resolve(tag);
        let display = format!("{}{}", stamp.prefix(), text);

        let mut w = self.sink.lock();
        for c in display.chars() {
            w.chunk(&style.paint(&c.to_string()).to_string());

            let mut d = rng.jitter(per_char, 0.4);
            if ".,!?;:".contains(c) {
                d *= 3;
            } else if c == ' ' {
                d /= 2;
            }
            let d = scaled_delay(d, self.speed);
            if !d.is_zero() {
                std::thread::sleep(d);
            }
        }
        w.end_line(text);
    }

    /// Looping single-line animation for roughly `duration` seconds,
    /// then a completion mark and newline. Frame count is bounded by
    /// `duration * FRAME_RATE`; the loop always terminates.
    pub fn animation(
        &self,
        rng: &mut StoryRng,
        label: &str,
        duration: Duration,
        tag: Tag,
        kind: AnimationKind,
    ) {
        let style = self.theme.resolve(tag);
        let frames = (duration.as_secs_f64() * FRAME_RATE).round() as u64;
        let width = bar_width(self.sink.is_animated());
        let prefix = format!("{} {label}", timestamp());

        let mut w = self.sink.lock();

        if self.sink.is_animated() {
            for i in 0..frames {
                let frame = match kind {
                    AnimationKind::Spinner => spinner_frame(i).to_string(),
                    AnimationKind::Dots => dots_frame(i),
                    AnimationKind::Progress => progress_frame(i, frames, width),
                    AnimationKind::Bounce => bounce_frame(i, width),
                    AnimationKind::Wave => wave_frame(i, width),
                    AnimationKind::Matrix => matrix_frame(rng, width),
                    AnimationKind::Glitch => glitch_frame(rng, label, 2),
                };
                w.carriage_return();
                if kind == AnimationKind::Glitch {
                    w.chunk(&style.paint(&frame).to_string());
                } else {
                    w.chunk(&style.paint(&format!("{prefix} {frame}")).to_string());
                }
                std::thread::sleep(scaled_delay(FRAME_TICK, self.speed));
            }
            w.carriage_return();
        } else {
            // Degraded: keep the pacing, skip the cursor control
            std::thread::sleep(scaled_delay(
                Duration::from_millis(frames.saturating_mul(100)),
                self.speed,
            ));
        }

        // One logical completed line per animation
        let (styled_done, plain_done) = if kind == AnimationKind::Glitch {
            (self.theme.paint(Tag::Log, label).to_string(), label.to_string())
        } else {
            let done = format!("{prefix} ✓");
            (style.paint(&done).to_string(), format!("{label} ✓"))
        };
        w.chunk(&styled_done);
        w.end_line(&plain_done);
    }

    /// Dim -> normal -> bright -> normal -> dim pulsing of a fixed line.
    pub fn breathing(&self, text: &str, cycles: u32, tag: Tag) {
        // (dimmed, bold) per pulse step
        const PULSE: [(bool, bool); 5] =
            [(true, false), (false, false), (false, true), (false, false), (true, false)];

        let base = self.theme.resolve(tag);
        let display = format!("{} {text}", timestamp());

        let mut w = self.sink.lock();
        if self.sink.is_animated() {
            for _ in 0..cycles {
                for (dimmed, bold) in PULSE {
                    let mut style = base;
                    style.dimmed = dimmed;
                    style.bold = bold;
                    w.carriage_return();
                    w.chunk(&style.paint(&display).to_string());
                    std::thread::sleep(scaled_delay(Duration::from_millis(120), self.speed));
                }
            }
            w.carriage_return();
        } else {
            std::thread::sleep(scaled_delay(
                Duration::from_millis(u64::from(cycles) * 600),
                self.speed,
            ));
        }
        w.chunk(&base.paint(&display).to_string());
        w.end_line(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::OutputSink;

    fn fast_cfg() -> RunConfig {
        RunConfig {
            speed: 100_000.0,
            ..RunConfig::default()
        }
    }

    #[test]
    fn scaled_delay_inverse_in_speed() {
        let base = Duration::from_millis(100);
        assert_eq!(scaled_delay(base, 2.0), Duration::from_millis(50));
        assert_eq!(scaled_delay(base, 0.5), Duration::from_millis(200));
        // Total time of an n-beat sequence scales as 1/s
        let total_s1: Duration = (0..10).map(|_| scaled_delay(base, 1.0)).sum();
        let total_s4: Duration = (0..10).map(|_| scaled_delay(base, 4.0)).sum();
        assert_eq!(total_s1, total_s4 * 4);
    }

    #[test]
    fn timestamps_are_monotonic() {
        let a = timestamp();
        let b = timestamp();
        // Fixed-width zero-padded format compares lexicographically
        assert!(a <= b);

        let parse = |s: &str| -> f64 {
            s.trim_start_matches('[')
                .trim_end_matches(']')
                .trim()
                .parse()
                .unwrap()
        };
        let ka = parse(&kernel_timestamp());
        let kb = parse(&kernel_timestamp());
        assert!(ka <= kb);
    }

    #[test]
    fn progress_last_frame_is_full() {
        for frames in [1u64, 7, 20, 100] {
            let last = progress_frame(frames - 1, frames, 10);
            assert!(last.contains("100%"), "frames={frames}: {last}");
            assert!(last.contains(&"█".repeat(10)));
        }
    }

    #[test]
    fn progress_zero_duration_is_safe() {
        // frames=0 never renders, but the generator must not divide by zero
        let frame = progress_frame(0, 0, 10);
        assert!(frame.contains("100%"));
    }

    #[test]
    fn wave_frame_has_requested_width() {
        for i in 0..50 {
            assert_eq!(wave_frame(i, 24).chars().count(), 24);
        }
    }

    #[test]
    fn bounce_stays_on_track() {
        for i in 0..200 {
            let frame = bounce_frame(i, 16);
            assert_eq!(frame.chars().count(), 18); // brackets + track
            assert_eq!(frame.chars().filter(|c| *c == '●').count(), 1);
        }
    }

    #[test]
    fn spinner_cycles() {
        assert_eq!(spinner_frame(0), spinner_frame(10));
        assert_ne!(spinner_frame(0), spinner_frame(1));
    }

    #[test]
    fn glitch_preserves_length() {
        let mut rng = StoryRng::new(42);
        let text = "neural lattice online";
        for intensity in 0..5 {
            let frame = glitch_frame(&mut rng, text, intensity);
            assert_eq!(frame.chars().count(), text.chars().count());
        }
        // Intensity 0 never corrupts
        assert_eq!(glitch_frame(&mut rng, text, 0), text);
    }

    #[test]
    fn matrix_frame_draws_from_charset() {
        let mut rng = StoryRng::new(1);
        let frame = matrix_frame(&mut rng, 30);
        assert_eq!(frame.chars().count(), 30);
        assert!(frame.chars().all(|c| MATRIX_CHARSET.contains(c)));
    }

    #[test]
    fn typed_emits_one_plain_line() {
        let (sink, lines) = OutputSink::capture();
        let renderer = Renderer::new(&fast_cfg(), sink);
        let mut rng = StoryRng::new(0);
        renderer.typed(
            &mut rng,
            "systemd: hello",
            Tag::Log,
            Duration::from_millis(3),
            Stamp::Wall,
        );
        let lines = lines.lock();
        assert_eq!(*lines, vec!["systemd: hello".to_string()]);
    }

    #[test]
    fn animation_terminates_and_lands_on_fresh_line() {
        let (sink, lines) = OutputSink::capture();
        let renderer = Renderer::new(&fast_cfg(), sink);
        let mut rng = StoryRng::new(0);

        for kind in [
            AnimationKind::Spinner,
            AnimationKind::Dots,
            AnimationKind::Progress,
            AnimationKind::Bounce,
            AnimationKind::Wave,
            AnimationKind::Matrix,
        ] {
            renderer.animation(
                &mut rng,
                "loading",
                Duration::from_secs(2),
                Tag::Animation,
                kind,
            );
        }
        // Zero duration is also bounded
        renderer.animation(
            &mut rng,
            "instant",
            Duration::ZERO,
            Tag::Animation,
            AnimationKind::Spinner,
        );

        let lines = lines.lock();
        assert_eq!(lines.len(), 7);
        assert!(lines[..6].iter().all(|l| l == "loading ✓"));
        assert_eq!(lines[6], "instant ✓");
    }

    #[test]
    fn glitch_animation_settles_on_clean_text() {
        let (sink, lines) = OutputSink::capture();
        let renderer = Renderer::new(&fast_cfg(), sink);
        let mut rng = StoryRng::new(0);
        renderer.animation(
            &mut rng,
            "ANOMALY DETECTED",
            Duration::from_millis(500),
            Tag::Error,
            AnimationKind::Glitch,
        );
        assert_eq!(*lines.lock(), vec!["ANOMALY DETECTED".to_string()]);
    }

    #[test]
    fn breathing_returns_and_prints_once() {
        let (sink, lines) = OutputSink::capture();
        let renderer = Renderer::new(&fast_cfg(), sink);
        renderer.breathing("pulse", 2, Tag::Animation);
        assert_eq!(*lines.lock(), vec!["pulse".to_string()]);
    }
}
