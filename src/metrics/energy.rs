//! Two-point energy estimation around a single operation.
//!
//! Power is sampled once before and once after the operation and the energy
//! is reported as `((p_before + p_after) / 2) * latency`. This is a
//! trapezoid over two points, not an integral of the power curve: short
//! spikes inside the interval are invisible. Trials measured this way are
//! comparable with each other, which is all the search ranking relies on.

use std::time::Duration;

use crate::backend::PowerSource;
use crate::error::Result;
use crate::metrics::clock::Clock;

/// Output of an instrumented operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Measured<T> {
    pub value: T,
    pub latency_s: f64,
    pub energy_j: f64,
}

/// Tokens per joule, or 0 when no energy was recorded.
pub fn tokens_per_joule(tokens: usize, energy_j: f64) -> f64 {
    if energy_j > 0.0 {
        tokens as f64 / energy_j
    } else {
        0.0
    }
}

/// Brackets an operation with power samples and monotonic timestamps.
pub struct EnergySampler<'a> {
    source: Option<&'a dyn PowerSource>,
    clock: &'a dyn Clock,
}

impl<'a> EnergySampler<'a> {
    /// `source = None` means no telemetry: energy is always reported as 0.
    pub fn new(source: Option<&'a dyn PowerSource>, clock: &'a dyn Clock) -> Self {
        Self { source, clock }
    }

    pub fn has_power_source(&self) -> bool {
        self.source.is_some()
    }

    fn sample(&self) -> Result<Option<f64>> {
        match self.source {
            Some(source) => source.sample_watts().map(Some),
            None => Ok(None),
        }
    }

    /// Run `operation`, returning its value with latency and energy.
    ///
    /// Only the operation itself sits between the two timestamps; the power
    /// samples are taken outside the timed interval.
    pub fn measure<T>(&self, operation: impl FnOnce() -> Result<T>) -> Result<Measured<T>> {
        self.measure_interval(|clock| {
            let start = clock.now();
            let value = operation()?;
            Ok((value, clock.now().saturating_sub(start)))
        })
    }

    /// Like [`measure`](Self::measure), but `operation` reports the timed
    /// interval itself, using the sampler's clock or its own.
    ///
    /// Lets a wrapper exclude its own waiting (locks, worker handoff) from
    /// the latency while power is still sampled around the whole call.
    pub fn measure_interval<T>(
        &self,
        operation: impl FnOnce(&dyn Clock) -> Result<(T, Duration)>,
    ) -> Result<Measured<T>> {
        let power_before = self.sample()?;
        let (value, elapsed) = operation(self.clock)?;
        let power_after = self.sample()?;

        let latency_s = elapsed.as_secs_f64();
        let energy_j = match (power_before, power_after) {
            (Some(p0), Some(p1)) => ((p0 + p1) / 2.0) * latency_s,
            _ => 0.0,
        };

        Ok(Measured {
            value,
            latency_s,
            energy_j,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FixedPowerSource;
    use crate::error::EapoError;
    use assert_float_eq::assert_float_absolute_eq;
    use std::cell::Cell;
    use std::time::Duration;

    /// Advances by a fixed step on every read.
    struct StepClock {
        ticks: Cell<u64>,
        step_ms: u64,
    }

    impl Clock for StepClock {
        fn now(&self) -> Duration {
            let t = self.ticks.get();
            self.ticks.set(t + 1);
            Duration::from_millis(t * self.step_ms)
        }
    }

    /// Returns a scripted sequence of readings.
    struct ScriptedPower {
        readings: Vec<f64>,
        next: Cell<usize>,
    }

    impl PowerSource for ScriptedPower {
        fn sample_watts(&self) -> Result<f64> {
            let i = self.next.get();
            self.next.set(i + 1);
            Ok(self.readings[i])
        }
    }

    #[test]
    fn test_trapezoid_of_two_samples() {
        let clock = StepClock {
            ticks: Cell::new(0),
            step_ms: 2000,
        };
        let power = ScriptedPower {
            readings: vec![100.0, 200.0],
            next: Cell::new(0),
        };
        let sampler = EnergySampler::new(Some(&power), &clock);
        let measured = sampler.measure(|| Ok(7)).unwrap();

        assert_eq!(measured.value, 7);
        assert_float_absolute_eq!(measured.latency_s, 2.0);
        assert_float_absolute_eq!(measured.energy_j, 300.0);
    }

    #[test]
    fn test_no_power_source_gives_zero_energy() {
        let clock = StepClock {
            ticks: Cell::new(0),
            step_ms: 500,
        };
        let sampler = EnergySampler::new(None, &clock);
        let measured = sampler.measure(|| Ok("done")).unwrap();

        assert!(!sampler.has_power_source());
        assert_float_absolute_eq!(measured.latency_s, 0.5);
        assert_eq!(measured.energy_j, 0.0);
    }

    #[test]
    fn test_real_clock_latency_non_negative() {
        let clock = crate::metrics::MonotonicClock::new();
        let power = FixedPowerSource::new(50.0);
        let sampler = EnergySampler::new(Some(&power), &clock);
        let measured = sampler.measure(|| Ok(())).unwrap();

        assert!(measured.latency_s >= 0.0);
        assert!(measured.energy_j >= 0.0);
    }

    #[test]
    fn test_operation_error_propagates() {
        let clock = crate::metrics::MonotonicClock::new();
        let sampler = EnergySampler::new(None, &clock);
        let result: Result<Measured<()>> =
            sampler.measure(|| Err(EapoError::external("generator", "boom")));
        assert!(matches!(result, Err(EapoError::External { .. })));
    }

    #[test]
    fn test_reported_interval_replaces_clock_reads() {
        let clock = StepClock {
            ticks: Cell::new(0),
            step_ms: 1000,
        };
        let power = FixedPowerSource::new(10.0);
        let sampler = EnergySampler::new(Some(&power), &clock);
        let measured = sampler
            .measure_interval(|_| Ok(("ids", Duration::from_millis(250))))
            .unwrap();

        assert_eq!(measured.value, "ids");
        assert_float_absolute_eq!(measured.latency_s, 0.25);
        assert_float_absolute_eq!(measured.energy_j, 2.5);
        assert_eq!(clock.ticks.get(), 0);
    }

    #[test]
    fn test_tokens_per_joule_guards_zero() {
        assert_eq!(tokens_per_joule(100, 0.0), 0.0);
        assert_float_absolute_eq!(tokens_per_joule(100, 4.0), 25.0);
    }
}
