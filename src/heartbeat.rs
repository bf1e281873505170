//! Background heartbeat.
//!
//! A separate thread that prints a periodic status line through the
//! shared sink while the monitoring loop runs. It polls both the
//! global stop flag (Ctrl-C) and its own local flag (monitoring loop
//! finished) at every interval, so it exits within one tick of either.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::content::{heartbeat_line, Pools};
use crate::render::Stamp;
use crate::rng::StoryRng;
use crate::sink::OutputSink;
use crate::theme::{Tag, Theme};

pub struct Heartbeat {
    local_stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Heartbeat {
    /// Spawn the heartbeat thread. `interval` is already speed-scaled
    /// by the caller.
    pub fn spawn(
        sink: OutputSink,
        theme: &'static Theme,
        global_stop: Arc<AtomicBool>,
        interval: Duration,
        seed: u64,
    ) -> Self {
        let local_stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&local_stop);

        let handle = std::thread::spawn(move || {
            let mut rng = StoryRng::new(seed);
            let pools = Pools::builtin();
            let style = theme.resolve(Tag::Heartbeat);

            loop {
                // Sleep in small slices so a stop request is honored
                // within one interval.
                let mut remaining = interval;
                let slice = Duration::from_millis(25);
                while remaining > Duration::ZERO {
                    if global_stop.load(Ordering::Relaxed) || thread_stop.load(Ordering::Relaxed) {
                        return;
                    }
                    let step = remaining.min(slice);
                    std::thread::sleep(step);
                    remaining = remaining.saturating_sub(step);
                }
                if global_stop.load(Ordering::Relaxed) || thread_stop.load(Ordering::Relaxed) {
                    return;
                }

                let msg = format!("heartbeat: {}", heartbeat_line(pools, &mut rng));
                let display = format!("{}{}", Stamp::Wall.prefix(), msg);
                sink.line(&style.paint(&display).to_string(), &msg);
            }
        });

        Self { local_stop, handle }
    }

    /// Signal the thread and wait for it to finish.
    pub fn stop(self) {
        self.local_stop.store(true, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}
