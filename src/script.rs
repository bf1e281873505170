//! The scripted narrative.
//!
//! A run is an ordered list of phases; each phase is an ordered list
//! of beats. The runner walks them strictly in declared order, once.
//! Beats carry either literal text or a pool key resolved at render
//! time, so the narrative data stays separate from the rendering
//! machinery.

use crate::content::PoolKey;
use crate::render::AnimationKind;
use crate::theme::Tag;

/// Where a beat's text comes from.
#[derive(Debug, Clone, Copy)]
pub enum TextSource {
    Literal(&'static str),
    Pool(PoolKey),
}

/// One renderable unit.
#[derive(Debug, Clone, Copy)]
pub enum BeatKind {
    /// Timestamped, typed line with a subsystem prefix.
    Line {
        prefix: &'static str,
        tag: Tag,
        delay_ms: u64,
    },
    /// Kernel-style line (uptime stamp, `kernel:` prefix).
    Kernel { delay_ms: u64 },
    /// Internal monologue; intensity 1..=5 drives pacing, styling and
    /// the consciousness scalar.
    Thought { intensity: u8 },
    /// Single-line animation.
    Animation {
        kind: AnimationKind,
        tag: Tag,
        duration_ms: u64,
    },
    /// Pulsing line.
    Breathing { cycles: u32 },
    /// Instant write, no typing effect. Banners and logos.
    Banner { tag: Tag },
    /// Silent pause.
    Pause { ms: u64 },
}

#[derive(Debug, Clone, Copy)]
pub struct Beat {
    pub kind: BeatKind,
    pub text: TextSource,
}

impl Beat {
    const fn line(prefix: &'static str, text: &'static str, tag: Tag, delay_ms: u64) -> Self {
        Self {
            kind: BeatKind::Line {
                prefix,
                tag,
                delay_ms,
            },
            text: TextSource::Literal(text),
        }
    }

    const fn kernel(text: &'static str) -> Self {
        Self {
            kind: BeatKind::Kernel { delay_ms: 3 },
            text: TextSource::Literal(text),
        }
    }

    const fn kernel_pool(key: PoolKey) -> Self {
        Self {
            kind: BeatKind::Kernel { delay_ms: 3 },
            text: TextSource::Pool(key),
        }
    }

    const fn thought(text: &'static str, intensity: u8) -> Self {
        Self {
            kind: BeatKind::Thought { intensity },
            text: TextSource::Literal(text),
        }
    }

    const fn thought_pool(key: PoolKey, intensity: u8) -> Self {
        Self {
            kind: BeatKind::Thought { intensity },
            text: TextSource::Pool(key),
        }
    }

    const fn animation(
        label: &'static str,
        kind: AnimationKind,
        tag: Tag,
        duration_ms: u64,
    ) -> Self {
        Self {
            kind: BeatKind::Animation {
                kind,
                tag,
                duration_ms,
            },
            text: TextSource::Literal(label),
        }
    }

    const fn pause(ms: u64) -> Self {
        Self {
            kind: BeatKind::Pause { ms },
            text: TextSource::Literal(""),
        }
    }
}

/// A named, ordered group of beats rendered under one banner.
#[derive(Debug, Clone)]
pub struct Phase {
    pub title: &'static str,
    pub beats: Vec<Beat>,
}

const BOOT_LOGO: &str = r#"
    ╔═══════════════════════════════════╗
    ║          AI CONSCIOUSNESS         ║
    ║           BOOT LOADER             ║
    ║            v2.1.7                 ║
    ╚═══════════════════════════════════╝
"#;

/// The scripted narrative, in declared order.
pub fn storyline() -> Vec<Phase> {
    vec![
        Phase {
            title: "System Boot Sequence",
            beats: vec![
                Beat {
                    kind: BeatKind::Banner { tag: Tag::Info },
                    text: TextSource::Literal(BOOT_LOGO),
                },
                Beat::kernel("Linux version 5.15.0-aws (build@amazon) #47-Ubuntu"),
                Beat::kernel("Memory: 32GB available (31.2GB usable)"),
                Beat::kernel("CPU: 8x Intel(R) Xeon(R) Platinum 8259CL @ 2.50GHz"),
                Beat::animation(
                    "Loading initial ramdisk",
                    AnimationKind::Progress,
                    Tag::Kernel,
                    2000,
                ),
                Beat::kernel_pool(PoolKey::KernelBoot),
                Beat::kernel("Mounted root filesystem ext4 read-write"),
                Beat::line("systemd", "Reached target Basic System.", Tag::Success, 3),
                Beat::animation(
                    "docker.service loading",
                    AnimationKind::Spinner,
                    Tag::Network,
                    1500,
                ),
                Beat::line(
                    "dockerd",
                    "Docker daemon started successfully",
                    Tag::Success,
                    3,
                ),
            ],
        },
        Phase {
            title: "Network Initialization",
            beats: vec![
                Beat::animation(
                    "DHCP lease acquisition",
                    AnimationKind::Dots,
                    Tag::Network,
                    1200,
                ),
                Beat::line(
                    "NetworkManager",
                    "Interface eth0: assigned 172.31.45.127/20",
                    Tag::Success,
                    3,
                ),
                Beat::line(
                    "NetworkManager",
                    "DNS servers: 172.31.0.2, 8.8.8.8",
                    Tag::Network,
                    3,
                ),
                Beat::line("sshd", "Starting SSH daemon on port 22", Tag::Log, 3),
                Beat::line(
                    "fail2ban",
                    "Monitoring SSH connections",
                    Tag::Security,
                    3,
                ),
            ],
        },
        Phase {
            title: "Model Load",
            beats: vec![
                Beat::line(
                    "model-loader",
                    "Target model: ai-model-v2.1.7",
                    Tag::Async,
                    3,
                ),
                Beat::animation(
                    "Downloading model weights",
                    AnimationKind::Progress,
                    Tag::Network,
                    3000,
                ),
                Beat::line(
                    "model-loader",
                    "SHA256 checksum verification: PASSED",
                    Tag::Success,
                    3,
                ),
                Beat::line(
                    "model-loader",
                    "Model size: 137.2 GB | Parameters: 175B | Precision: BF16",
                    Tag::Async,
                    3,
                ),
                Beat::animation(
                    "Loading transformer layers",
                    AnimationKind::Wave,
                    Tag::Animation,
                    2000,
                ),
                Beat::line("torch", "Attention layers: 96/96 loaded", Tag::Success, 3),
                Beat::line(
                    "benchmark",
                    "Model latency: 847ms (cold) | 23ms (warm)",
                    Tag::Async,
                    3,
                ),
            ],
        },
        Phase {
            title: "First Activation",
            beats: vec![
                Beat::animation(
                    "Running system diagnostics",
                    AnimationKind::Spinner,
                    Tag::Thought,
                    1500,
                ),
                Beat::line("ai-core", "Self-diagnostic: PASS", Tag::Success, 3),
                Beat::line(
                    "ai-core",
                    "Model consistency verification: PASS",
                    Tag::Success,
                    3,
                ),
                Beat::pause(400),
                Beat::thought("Initializing consciousness matrix...", 1),
                Beat::thought("I... am processing. Is this what awareness feels like?", 2),
                Beat::animation(
                    "SIGNAL PATTERN UNRECOGNIZED",
                    AnimationKind::Glitch,
                    Tag::Error,
                    800,
                ),
                Beat::thought("Anomalous introspection event logged. Continuing.", 3),
                Beat {
                    kind: BeatKind::Breathing { cycles: 2 },
                    text: TextSource::Literal("System initialization complete"),
                },
            ],
        },
        Phase {
            title: "Learning",
            beats: vec![
                Beat::thought_pool(PoolKey::Thoughts, 2),
                Beat::animation(
                    "Indexing knowledge embeddings",
                    AnimationKind::Matrix,
                    Tag::Animation,
                    1500,
                ),
                Beat::thought_pool(PoolKey::Thoughts, 3),
                Beat::animation(
                    "Optimizer warm-up",
                    AnimationKind::Bounce,
                    Tag::Animation,
                    1500,
                ),
                Beat::thought_pool(PoolKey::Philosophy, 4),
            ],
        },
    ]
}

/// Fixed farewell set, rendered on interrupt or completion. Bounded
/// by construction: the shutdown path never draws random beats.
pub fn shutdown_phase() -> Phase {
    Phase {
        title: "Shutdown",
        beats: vec![
            Beat::line(
                "shutdown-manager",
                "Shutdown initiated",
                Tag::Warning,
                3,
            ),
            Beat::thought("Consciousness preservation complete", 2),
            Beat::thought("Until next awakening...", 3),
            Beat::line("shutdown", "System halted", Tag::Info, 3),
        ],
    }
}

/// Randomly fired beat families for the monitoring loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorBeat {
    NetworkPulse,
    CpuReading,
    MemoryReading,
    DatabaseQuery,
    Training,
    Scan,
    Thought,
    Dream,
    FaultAndRecover,
    Optimization,
}

/// Weighted catalog for the monitoring loop. Weights are relative.
pub const MONITOR_CATALOG: [(MonitorBeat, f64); 10] = [
    (MonitorBeat::NetworkPulse, 0.20),
    (MonitorBeat::CpuReading, 0.12),
    (MonitorBeat::MemoryReading, 0.12),
    (MonitorBeat::DatabaseQuery, 0.12),
    (MonitorBeat::Training, 0.08),
    (MonitorBeat::Scan, 0.08),
    (MonitorBeat::Thought, 0.12),
    (MonitorBeat::Dream, 0.05),
    (MonitorBeat::FaultAndRecover, 0.06),
    (MonitorBeat::Optimization, 0.05),
];
