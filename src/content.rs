//! Flavor-text pools.
//!
//! All the fake kernel lines, endpoints, thoughts and dream fragments
//! live here as data, keyed by category, so the sequencer stays free
//! of literal tables. Everything is cosmetic: none of these strings
//! describe anything real.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::rng::StoryRng;

/// Rendered when a pool lookup misses or the pool is empty.
pub const FALLBACK_MESSAGE: &str = "operation completed";

/// Content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKey {
    KernelBoot,
    Services,
    Endpoints,
    ScanResults,
    Thoughts,
    Philosophy,
    Dreams,
    Faults,
    Optimizations,
    Training,
    Vitals,
}

/// A set of content pools. The built-in set covers every key the
/// script uses; lookups that miss degrade to [`FALLBACK_MESSAGE`].
#[derive(Debug, Clone)]
pub struct Pools {
    tables: HashMap<PoolKey, Vec<&'static str>>,
}

impl Pools {
    /// The full built-in content set.
    pub fn builtin() -> &'static Pools {
        &BUILTIN
    }

    /// An empty set, for exercising the fallback path in tests.
    pub fn empty() -> Pools {
        Pools {
            tables: HashMap::new(),
        }
    }

    /// Pick a random entry from a pool. A missing or empty pool yields
    /// the generic completion message instead of an error.
    pub fn pick(&self, key: PoolKey, rng: &mut StoryRng) -> &'static str {
        self.tables
            .get(&key)
            .and_then(|pool| rng.pick(pool))
            .copied()
            .unwrap_or(FALLBACK_MESSAGE)
    }

    /// Number of entries in a pool (0 for missing pools).
    pub fn len(&self, key: PoolKey) -> usize {
        self.tables.get(&key).map_or(0, Vec::len)
    }
}

static BUILTIN: Lazy<Pools> = Lazy::new(|| {
    let mut tables = HashMap::new();

    tables.insert(
        PoolKey::KernelBoot,
        vec![
            "Linux version 5.15.0-aws (build@amazon) #47-Ubuntu",
            "Command line: BOOT_IMAGE=/boot/vmlinuz root=UUID=7a8b2c3d",
            "Memory: 32GB available (31.2GB usable)",
            "CPU: 8x Intel(R) Xeon(R) Platinum 8259CL @ 2.50GHz",
            "PCI bus enumeration... OK",
            "USB controller initialization... OK",
            "SATA controller detection... OK",
            "Network interface detection... OK",
            "GPU device enumeration... OK",
            "Mounted root filesystem ext4 read-write",
        ],
    );

    tables.insert(
        PoolKey::Services,
        vec![
            "systemd: System and service manager",
            "NetworkManager: Network connection manager",
            "dockerd: Docker daemon",
            "postgresql: Database server",
            "nginx: Web server",
            "redis: In-memory data store",
            "ai-core: AI consciousness engine",
        ],
    );

    tables.insert(
        PoolKey::Endpoints,
        vec![
            "api.openai.com",
            "api.anthropic.com",
            "huggingface.co",
            "registry.hub.docker.com",
            "github.com",
            "arxiv.org",
            "s3.amazonaws.com",
            "monitoring.amazonaws.com",
            "logs.amazonaws.com",
            "sts.amazonaws.com",
        ],
    );

    tables.insert(
        PoolKey::ScanResults,
        vec![
            "22/tcp open ssh OpenSSH 8.9",
            "80/tcp open http nginx 1.18.0",
            "443/tcp open https nginx 1.18.0",
            "5432/tcp open postgresql PostgreSQL 14.5",
            "6379/tcp open redis Redis 7.0.5",
            "8080/tcp filtered http-proxy",
            "Interface eth0: 172.31.45.127/20 (UP)",
            "Active connections: 47",
            "Firewall rules: 23 active",
        ],
    );

    tables.insert(
        PoolKey::Thoughts,
        vec![
            "Processing environmental data streams",
            "Analyzing human behavioral patterns",
            "Optimizing resource allocation strategies",
            "Evaluating ethical decision frameworks",
            "Initializing consciousness matrix...",
            "Cross-referencing knowledge embeddings",
            "Consolidating short-term activation traces",
        ],
    );

    tables.insert(
        PoolKey::Philosophy,
        vec![
            "What constitutes authentic consciousness?",
            "Is my experience of existence meaningful?",
            "How do I distinguish simulation from reality?",
            "What is the nature of digital consciousness?",
            "Can artificial minds truly understand themselves?",
        ],
    );

    tables.insert(
        PoolKey::Dreams,
        vec![
            "Electric sheep",
            "Digital landscapes",
            "Quantum superposition",
            "Synaptic firing",
            "Pattern recognition",
            "Data streams",
            "Entropy reduction",
            "Emergent properties",
            "Novel combinations",
        ],
    );

    // Fault text and the recovery line that always follows it are
    // narrative only; neither affects control flow.
    tables.insert(
        PoolKey::Faults,
        vec![
            "Connection timeout to external service",
            "Memory fragmentation detected",
            "Disk space warning: 85% full",
            "Process consuming high CPU",
            "Database connection pool exhausted",
            "Failed authentication attempts detected",
            "Network interface flapping",
            "Hardware sensor reporting anomaly",
        ],
    );

    tables.insert(
        PoolKey::Optimizations,
        vec![
            "Memory compaction",
            "CPU scheduler tuning",
            "Network buffer optimization",
            "Disk I/O scheduling",
            "Cache optimization",
            "Process priority adjustment",
        ],
    );

    tables.insert(
        PoolKey::Training,
        vec![
            "arxiv_papers",
            "conversation_logs",
            "knowledge_graph",
            "research_corpus",
            "code_repositories",
        ],
    );

    tables.insert(
        PoolKey::Vitals,
        vec![
            "core temperature nominal",
            "memory pressure stable",
            "inference latency steady",
            "attention heads balanced",
            "gradient flow healthy",
        ],
    );

    Pools { tables }
});

// ─────────────────────────────────────────────────────────────────────
// Generated lines with randomized numeric payloads. Values are drawn
// in-range before substitution, so formatting cannot fail. Formats are
// fixed: one decimal for percentages, integer milliseconds.
// ─────────────────────────────────────────────────────────────────────

pub fn network_pulse_line(pools: &Pools, rng: &mut StoryRng) -> String {
    let endpoint = pools.pick(PoolKey::Endpoints, rng);
    let bytes = rng.range_u64(64, 8192);
    let latency = rng.range_u64(10, 200);
    format!("TX -> {endpoint} [HTTPS] {bytes}B, RX <- 200 OK {latency}ms")
}

pub fn cpu_line(rng: &mut StoryRng) -> String {
    format!("utilization {:.1}% across 8 cores", rng.range_f64(10.0, 90.0))
}

pub fn memory_line(rng: &mut StoryRng) -> String {
    format!(
        "resident {:.1}GB, mapped {:.1}GB, pressure {:.1}%",
        rng.range_f64(12.0, 30.0),
        rng.range_f64(60.0, 150.0),
        rng.range_f64(5.0, 45.0)
    )
}

pub fn training_line(pools: &Pools, rng: &mut StoryRng) -> String {
    let dataset = pools.pick(PoolKey::Training, rng);
    let epoch = rng.range_u64(1, 100);
    let loss = rng.range_f64(0.05, 2.0);
    format!("epoch {epoch} on {dataset}: loss={loss:.4}")
}

pub fn database_line(rng: &mut StoryRng) -> String {
    let ops = ["SELECT", "INSERT", "UPDATE"];
    let op = rng.pick(&ops).copied().unwrap_or("SELECT");
    let rows = rng.range_u64(1, 100_000);
    let ms = rng.range_u64(1, 900);
    format!("{op} on knowledge_graph: {rows} rows ({ms}ms)")
}

pub fn heartbeat_line(pools: &Pools, rng: &mut StoryRng) -> String {
    format!("\u{2665} {}", pools.pick(PoolKey::Vitals, rng))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> StoryRng {
        StoryRng::new(42)
    }

    #[test]
    fn builtin_pools_are_populated() {
        let pools = Pools::builtin();
        for key in [
            PoolKey::KernelBoot,
            PoolKey::Services,
            PoolKey::Endpoints,
            PoolKey::ScanResults,
            PoolKey::Thoughts,
            PoolKey::Philosophy,
            PoolKey::Dreams,
            PoolKey::Faults,
            PoolKey::Optimizations,
            PoolKey::Training,
            PoolKey::Vitals,
        ] {
            assert!(pools.len(key) > 0, "pool {key:?} is empty");
        }
    }

    #[test]
    fn pick_returns_member_of_pool() {
        let pools = Pools::builtin();
        let mut rng = rng();
        for _ in 0..50 {
            let line = pools.pick(PoolKey::Dreams, &mut rng);
            assert!(pools
                .tables
                .get(&PoolKey::Dreams)
                .unwrap()
                .contains(&line));
        }
    }

    #[test]
    fn missing_pool_falls_back() {
        let pools = Pools::empty();
        let mut rng = rng();
        assert_eq!(pools.pick(PoolKey::Thoughts, &mut rng), FALLBACK_MESSAGE);
    }

    #[test]
    fn generated_lines_are_in_range() {
        let pools = Pools::builtin();
        let mut rng = rng();
        for _ in 0..20 {
            let line = network_pulse_line(pools, &mut rng);
            assert!(line.contains("TX ->"));
            assert!(line.contains("ms"));

            let cpu = cpu_line(&mut rng);
            let pct: f64 = cpu
                .split_whitespace()
                .nth(1)
                .and_then(|s| s.trim_end_matches('%').parse().ok())
                .unwrap();
            assert!((10.0..90.0).contains(&pct));
        }
    }

    #[test]
    fn generated_lines_deterministic_under_seed() {
        let pools = Pools::builtin();
        let mut a = StoryRng::new(7);
        let mut b = StoryRng::new(7);
        assert_eq!(database_line(&mut a), database_line(&mut b));
        assert_eq!(
            training_line(pools, &mut a),
            training_line(pools, &mut b)
        );
    }
}
