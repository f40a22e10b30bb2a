//! Timing
//!
//! Wall-clock durations come from `std::time::Instant`, which is monotonic.
//! The hardware tick counter (RDTSCP on x86_64, CNTVCT_EL0 on AArch64) is
//! read alongside it for cycle counts; it is 0 on other targets.

use std::time::{Duration, Instant};

// ─── Inline cycle counter helpers ────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_cycles() -> u64 {
    // SAFETY: RDTSCP is available on every x86_64 CPU this harness targets.
    unsafe {
        let mut _aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut _aux)
    }
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_cycles() -> u64 {
    0
}

/// Whether this platform provides real cycle counters.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

// ─── Timer ───────────────────────────────────────────────────────────────────

/// Timer for a single execution unit
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
    cycles_start: u64,
}

impl Timer {
    /// Record the start mark
    #[inline(always)]
    pub fn start() -> Self {
        let cycles_start = read_cycles();
        Self {
            start: Instant::now(),
            cycles_start,
        }
    }

    /// Elapsed duration and cycles since [`Timer::start`]
    #[inline(always)]
    pub fn stop(&self) -> (Duration, u64) {
        let elapsed = self.start.elapsed();
        let cycles = read_cycles().saturating_sub(self.cycles_start);
        (elapsed, cycles)
    }
}

/// Outcome of [`measure`]
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement<T> {
    /// Time between the start and end marks
    pub duration: Duration,
    /// Cycle-counter ticks over the same span
    pub cycles: u64,
    /// Whatever the unit returned
    pub value: T,
}

/// Invoke `unit` exactly once between two monotonic marks.
#[inline]
pub fn measure<T, F>(unit: F) -> Measurement<T>
where
    F: FnOnce() -> T,
{
    let timer = Timer::start();
    let value = std::hint::black_box(unit());
    let (duration, cycles) = timer.stop();
    Measurement {
        duration,
        cycles,
        value,
    }
}

// ─── Process resources ───────────────────────────────────────────────────────

/// Peak resident set size of this process in KiB, if the OS reports it.
#[cfg(unix)]
pub fn peak_rss_kb() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // SAFETY: getrusage only writes into the provided struct.
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // SAFETY: rc == 0 means the struct was filled in.
    let max_rss = unsafe { usage.assume_init() }.ru_maxrss;
    let max_rss = u64::try_from(max_rss).ok()?;

    // macOS reports bytes, Linux and the BSDs report KiB
    if cfg!(target_os = "macos") {
        Some(max_rss / 1024)
    } else {
        Some(max_rss)
    }
}

/// Peak resident set size of this process in KiB, if the OS reports it.
#[cfg(not(unix))]
pub fn peak_rss_kb() -> Option<u64> {
    None
}

/// Pin the current thread to a specific core
///
/// Avoids core migrations that skew cycle counts between iterations.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu, set_ref);

        let result = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// Pin the current thread to a specific core
///
/// Not supported on this platform; always succeeds without pinning.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let (elapsed, _cycles) = timer.stop();

        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn test_measure_invokes_once_and_returns_value() {
        let mut calls = 0;
        let m = measure(|| {
            calls += 1;
            Some("fib()".to_string())
        });
        assert_eq!(calls, 1);
        assert_eq!(m.value.as_deref(), Some("fib()"));
    }

    #[test]
    fn test_measure_spans_the_unit() {
        let m = measure(|| std::thread::sleep(Duration::from_millis(2)));
        assert!(m.duration >= Duration::from_millis(1));
    }

    #[test]
    fn test_cycle_counter() {
        if HAS_CYCLE_COUNTER {
            let a = read_cycles();
            let b = read_cycles();
            assert!(b >= a, "cycle counter should be monotonic");
        }
    }

    #[test]
    fn test_peak_rss_never_shrinks() {
        if let (Some(before), Some(after)) = (peak_rss_kb(), peak_rss_kb()) {
            assert!(after >= before);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_peak_rss_is_reported() {
        assert!(peak_rss_kb().is_some_and(|kb| kb > 0));
    }
}
