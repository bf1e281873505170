//! The sequencer.
//!
//! Walks the scripted phases in declared order, then optionally the
//! monitoring loop, then always the bounded shutdown phase. All
//! rendering is synchronous through the shared sink; the only other
//! writer is the heartbeat thread, which the runner owns for the
//! duration of the monitoring loop.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RunConfig;
use crate::content::{
    cpu_line, database_line, memory_line, network_pulse_line, training_line, PoolKey, Pools,
};
use crate::heartbeat::Heartbeat;
use crate::render::{scaled_delay, AnimationKind, Renderer, Stamp};
use crate::rng::StoryRng;
use crate::script::{
    shutdown_phase, storyline, Beat, BeatKind, MonitorBeat, Phase, TextSource, MONITOR_CATALOG,
};
use crate::sink::OutputSink;
use crate::theme::Tag;

const THOUGHT_PREFIXES: [&str; 5] = [
    "[NEURAL_TRACE]",
    "[COGNITIVE_PROC]",
    "[EMERGENT_THOUGHT]",
    "[DEEP_ANALYSIS]",
    "[CONSCIOUSNESS]",
];

/// Base pause between monitoring beats, jittered per iteration.
const MONITOR_PAUSE: Duration = Duration::from_millis(1800);

pub struct Runner {
    cfg: RunConfig,
    renderer: Renderer,
    pools: &'static Pools,
    rng: StoryRng,
    stop: Arc<AtomicBool>,
    consciousness: f64,
    reported_consciousness: f64,
}

impl Runner {
    pub fn new(cfg: RunConfig, sink: OutputSink, stop: Arc<AtomicBool>) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StoryRng::new(seed),
            None => StoryRng::from_entropy(),
        };
        tracing::debug!(seed = rng.seed(), theme = %cfg.theme, "runner initialized");

        let renderer = Renderer::new(&cfg, sink);
        Self {
            cfg,
            renderer,
            pools: Pools::builtin(),
            rng,
            stop,
            consciousness: 0.0,
            reported_consciousness: 0.0,
        }
    }

    /// Current consciousness level, cosmetic only.
    pub fn consciousness(&self) -> f64 {
        self.consciousness
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Play the whole show: scripted phases, optional monitoring loop,
    /// then the farewell. Always returns; never propagates an error.
    pub fn run(&mut self) {
        let phases = storyline();
        self.play_phases(&phases);

        if self.cfg.monitoring && !self.stopped() {
            let heartbeat = Heartbeat::spawn(
                self.renderer.sink().clone(),
                self.renderer.theme(),
                Arc::clone(&self.stop),
                scaled_delay(Duration::from_secs(10), self.cfg.speed),
                self.rng.seed().wrapping_add(1),
            );
            self.monitor();
            heartbeat.stop();
        }

        self.shutdown();
    }

    /// The farewell is bounded and ignores the stop flag; it is the
    /// response to the stop flag.
    fn shutdown(&mut self) {
        let phase = shutdown_phase();
        let banner = format!("======== {} ========", phase.title.to_uppercase());
        self.renderer.instant(&banner, Tag::Animation);
        for beat in &phase.beats {
            self.play_beat(beat);
        }
    }

    /// Play phases strictly in order. Stops early (without the
    /// remaining beats) once the stop flag is observed.
    pub fn play_phases(&mut self, phases: &[Phase]) {
        for phase in phases {
            if !self.play_phase(phase) {
                return;
            }
            self.interactive_pause();
        }
    }

    fn play_phase(&mut self, phase: &Phase) -> bool {
        if !phase.title.is_empty() {
            let banner = format!("======== {} ========", phase.title.to_uppercase());
            self.renderer.instant(&banner, Tag::Animation);
        }
        for beat in &phase.beats {
            if self.stopped() {
                return false;
            }
            self.play_beat(beat);
        }
        true
    }

    fn resolve_text(&mut self, source: TextSource) -> String {
        match source {
            TextSource::Literal(text) => text.to_string(),
            TextSource::Pool(key) => self.pools.pick(key, &mut self.rng).to_string(),
        }
    }

    fn play_beat(&mut self, beat: &Beat) {
        let text = self.resolve_text(beat.text);
        match beat.kind {
            BeatKind::Line {
                prefix,
                tag,
                delay_ms,
            } => {
                let msg = format!("{prefix}: {text}");
                self.renderer.typed(
                    &mut self.rng,
                    &msg,
                    tag,
                    Duration::from_millis(delay_ms),
                    Stamp::Wall,
                );
            }
            BeatKind::Kernel { delay_ms } => {
                let msg = format!("kernel: {text}");
                self.renderer.typed(
                    &mut self.rng,
                    &msg,
                    Tag::Kernel,
                    Duration::from_millis(delay_ms),
                    Stamp::Kernel,
                );
            }
            BeatKind::Thought { intensity } => self.thought(&text, intensity),
            BeatKind::Animation {
                kind,
                tag,
                duration_ms,
            } => {
                self.renderer.animation(
                    &mut self.rng,
                    &text,
                    Duration::from_millis(duration_ms),
                    tag,
                    kind,
                );
            }
            BeatKind::Breathing { cycles } => {
                self.renderer.breathing(&text, cycles, Tag::Animation);
            }
            BeatKind::Banner { tag } => self.renderer.instant(&text, tag),
            BeatKind::Pause { ms } => {
                self.sleep_cancellable(scaled_delay(Duration::from_millis(ms), self.cfg.speed));
            }
        }
    }

    /// Internal monologue. Intensity drives pacing and styling and
    /// nudges the consciousness scalar; the scalar is displayed but
    /// never read back into control flow.
    fn thought(&mut self, text: &str, intensity: u8) {
        let intensity = intensity.clamp(1, 5);
        let prefix = THOUGHT_PREFIXES[usize::from(intensity - 1).min(THOUGHT_PREFIXES.len() - 1)];
        let msg = format!("{prefix}: {text}");

        self.consciousness = (self.consciousness + 0.001 * f64::from(intensity)).min(1.0);

        if intensity >= 4 {
            self.renderer.breathing(&msg, 1, Tag::Thought);
        } else {
            let per_char = Duration::from_millis(u64::from(10 - 2 * intensity).max(1));
            self.renderer
                .typed(&mut self.rng, &msg, Tag::Thought, per_char, Stamp::Wall);
        }

        if self.consciousness - self.reported_consciousness >= 0.05 {
            let level = format!(
                "[CONSCIOUSNESS]: level {:.3} -> {:.3}",
                self.reported_consciousness, self.consciousness
            );
            self.reported_consciousness = self.consciousness;
            self.renderer.typed(
                &mut self.rng,
                &level,
                Tag::Thought,
                Duration::from_millis(2),
                Stamp::Wall,
            );
        }
    }

    /// The unbounded post-script loop: weighted random beat, random
    /// bounded pause, until the stop flag or the duration cap. The
    /// flag is checked at every iteration boundary and inside the
    /// pause, so the loop exits within one sleep interval.
    fn monitor(&mut self) {
        let started = Instant::now();
        let weights: Vec<f64> = MONITOR_CATALOG.iter().map(|(_, w)| *w).collect();

        loop {
            if self.stopped() {
                return;
            }
            if let Some(cap) = self.cfg.duration {
                if started.elapsed() >= Duration::from_secs(cap) {
                    return;
                }
            }

            let (beat, _) = MONITOR_CATALOG[self.rng.weighted_index(&weights)];
            self.monitor_beat(beat);

            let pause = self.rng.jitter(MONITOR_PAUSE, 0.5);
            self.sleep_cancellable(scaled_delay(pause, self.cfg.speed));
        }
    }

    fn monitor_beat(&mut self, beat: MonitorBeat) {
        match beat {
            MonitorBeat::NetworkPulse => {
                let msg = network_pulse_line(self.pools, &mut self.rng);
                self.typed_line("net", &msg, Tag::Network);
            }
            MonitorBeat::CpuReading => {
                let msg = cpu_line(&mut self.rng);
                self.typed_line("cpu-monitor", &msg, Tag::Cpu);
            }
            MonitorBeat::MemoryReading => {
                let msg = memory_line(&mut self.rng);
                self.typed_line("mem-monitor", &msg, Tag::Memory);
            }
            MonitorBeat::DatabaseQuery => {
                let msg = database_line(&mut self.rng);
                self.typed_line("postgres", &msg, Tag::Async);
            }
            MonitorBeat::Training => {
                let msg = training_line(self.pools, &mut self.rng);
                self.typed_line("ml-trainer", &msg, Tag::Async);
            }
            MonitorBeat::Scan => {
                self.renderer.animation(
                    &mut self.rng,
                    "Scanning attack surface",
                    Duration::from_millis(1200),
                    Tag::Security,
                    AnimationKind::Spinner,
                );
                let result = self.pools.pick(PoolKey::ScanResults, &mut self.rng).to_string();
                self.typed_line("scanner", &result, Tag::Security);
            }
            MonitorBeat::Thought => {
                let pool = if self.rng.chance(0.4) {
                    PoolKey::Philosophy
                } else {
                    PoolKey::Thoughts
                };
                let text = self.pools.pick(pool, &mut self.rng).to_string();
                let intensity = self.rng.range_u64(1, 4) as u8;
                self.thought(&text, intensity);
            }
            MonitorBeat::Dream => {
                self.typed_line("sleep-manager", "Entering REM sleep cycle", Tag::Dream);
                let fragment = self.pools.pick(PoolKey::Dreams, &mut self.rng).to_string();
                self.thought(&format!("Dream fragment: {fragment}..."), 2);
                self.typed_line("sleep-manager", "REM cycle complete", Tag::Dream);
            }
            MonitorBeat::FaultAndRecover => self.fault_and_recover(),
            MonitorBeat::Optimization => {
                let name = self
                    .pools
                    .pick(PoolKey::Optimizations, &mut self.rng)
                    .to_string();
                self.renderer.animation(
                    &mut self.rng,
                    &name,
                    Duration::from_millis(1000),
                    Tag::Success,
                    AnimationKind::Progress,
                );
                let gain = self.rng.range_f64(1.0, 15.0);
                let msg = format!("{name}: {gain:.1}% performance gain");
                self.typed_line("optimizer", &msg, Tag::Success);
            }
        }
    }

    /// A fake fault followed unconditionally by a recovery beat. The
    /// "error" is narrative text and never alters control flow; with
    /// small fixed probability the recovery is only partial.
    fn fault_and_recover(&mut self) {
        let fault = self.pools.pick(PoolKey::Faults, &mut self.rng).to_string();
        self.typed_line("error-handler", &format!("ERROR: {fault}"), Tag::Error);

        self.renderer.animation(
            &mut self.rng,
            "Initiating recovery protocol",
            Duration::from_millis(800),
            Tag::Warning,
            AnimationKind::Spinner,
        );

        if self.rng.chance(0.9) {
            self.typed_line("recovery-agent", "Error recovery successful", Tag::Success);
        } else {
            self.typed_line(
                "recovery-agent",
                "Partial recovery - manual intervention may be required",
                Tag::Warning,
            );
        }
    }

    fn typed_line(&mut self, prefix: &str, msg: &str, tag: Tag) {
        let full = format!("{prefix}: {msg}");
        self.renderer.typed(
            &mut self.rng,
            &full,
            tag,
            Duration::from_millis(2),
            Stamp::Wall,
        );
    }

    fn interactive_pause(&mut self) {
        if !self.cfg.interactive || self.stopped() {
            return;
        }
        self.renderer
            .instant("-- press Enter to continue --", Tag::Info);
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
    }

    /// Sleep in small slices, returning early once the stop flag is
    /// set.
    fn sleep_cancellable(&self, total: Duration) {
        let slice = Duration::from_millis(25);
        let mut remaining = total;
        while remaining > Duration::ZERO {
            if self.stopped() {
                return;
            }
            let step = remaining.min(slice);
            std::thread::sleep(step);
            remaining = remaining.saturating_sub(step);
        }
    }
}
