//! Automatic waveform measurements
//!
//! Computes the standard oscilloscope measurement set for one channel:
//! - Vmax, Vmin and peak-to-peak voltage
//! - Period and frequency from crossings of the signal mean
//! - 10-90% rise and fall time
//! - Duty cycle
//!
//! All functions are pure and never fail. Degenerate input (empty,
//! constant, or too few crossings) yields zero for the affected metrics;
//! a zero period, frequency, duty cycle or edge time means "undefined".
//!
//! The crossing-based metrics assume a clean, single-frequency signal.
//! Edge times only count transitions that jump the whole 10-90% band in a
//! single sample interval; slower edges do not contribute.

/// Lower threshold for edge timing, as a fraction of Vpp above Vmin
pub const EDGE_LOW_FRACTION: f64 = 0.10;

/// Upper threshold for edge timing, as a fraction of Vpp above Vmin
pub const EDGE_HIGH_FRACTION: f64 = 0.90;

/// Measurement set for one channel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurements {
    /// Peak-to-peak voltage
    pub vpp: f64,
    /// Maximum voltage
    pub vmax: f64,
    /// Minimum voltage
    pub vmin: f64,
    /// Frequency in Hz (0 when undefined)
    pub freq: f64,
    /// Period in seconds (0 when undefined)
    pub period: f64,
    /// Mean 10-90% rise time in seconds (0 when no edge was found)
    pub rise_time: f64,
    /// Mean 90-10% fall time in seconds (0 when no edge was found)
    pub fall_time: f64,
    /// Duty cycle in percent (0 when undefined)
    pub duty: f64,
}

impl Measurements {
    /// Whether a period (and therefore a frequency) was measured
    pub fn has_period(&self) -> bool {
        self.period > 0.0
    }

    /// Whether at least one rising edge was found
    pub fn has_rise_time(&self) -> bool {
        self.rise_time > 0.0
    }

    /// Whether at least one falling edge was found
    pub fn has_fall_time(&self) -> bool {
        self.fall_time > 0.0
    }

    /// Whether a duty cycle was measured
    pub fn has_duty(&self) -> bool {
        self.duty > 0.0
    }
}

/// Peak statistics over a time window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    /// Window start (the smaller bound)
    pub t_start: f64,
    /// Window end (the larger bound)
    pub t_end: f64,
    /// Maximum voltage inside the window
    pub vmax: f64,
    /// Minimum voltage inside the window
    pub vmin: f64,
    /// Peak-to-peak voltage inside the window
    pub vpp: f64,
    /// Number of samples inside the window
    pub count: usize,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn extrema(values: &[f64]) -> (f64, f64) {
    let vmax = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let vmin = values.iter().cloned().fold(f64::INFINITY, f64::min);
    (vmax, vmin)
}

/// Indices `i` where the signal crosses its mean between `i` and `i + 1`
///
/// A crossing is a flip of the sign bit of `v - mean`; a sample equal to
/// the mean counts as non-negative.
pub fn mean_crossings(voltage: &[f64]) -> Vec<usize> {
    let m = mean(voltage);
    voltage
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| (pair[0] - m).is_sign_negative() != (pair[1] - m).is_sign_negative())
        .map(|(i, _)| i)
        .collect()
}

/// Period from every other crossing (same polarity)
fn period_from_crossings(time: &[f64], crossings: &[usize]) -> f64 {
    if crossings.len() < 2 {
        return 0.0;
    }
    let same_polarity: Vec<f64> = crossings.iter().step_by(2).map(|&i| time[i]).collect();
    let deltas: Vec<f64> = same_polarity.windows(2).map(|w| w[1] - w[0]).collect();
    mean(&deltas)
}

/// Share of crossing intervals spent in the phase after the first crossing
fn duty_from_crossings(time: &[f64], crossings: &[usize]) -> f64 {
    if crossings.len() < 2 {
        return 0.0;
    }
    let intervals: Vec<f64> = crossings
        .windows(2)
        .map(|w| time[w[1]] - time[w[0]])
        .collect();
    let high_time: f64 = intervals.iter().step_by(2).sum();
    let total_time: f64 = intervals.iter().sum();
    if total_time > 0.0 {
        high_time / total_time * 100.0
    } else {
        0.0
    }
}

/// Mean durations of single-interval rising and falling edges
fn edge_times(time: &[f64], voltage: &[f64], vmin: f64, vpp: f64) -> (f64, f64) {
    if vpp <= 0.0 {
        return (0.0, 0.0);
    }
    let v10 = vmin + EDGE_LOW_FRACTION * vpp;
    let v90 = vmin + EDGE_HIGH_FRACTION * vpp;

    let mut rising = Vec::new();
    let mut falling = Vec::new();
    for i in 0..voltage.len().saturating_sub(1) {
        let dt = time[i + 1] - time[i];
        if voltage[i] <= v10 && voltage[i + 1] >= v90 {
            rising.push(dt);
        } else if voltage[i] >= v90 && voltage[i + 1] <= v10 {
            falling.push(dt);
        }
    }
    (mean(&rising), mean(&falling))
}

/// Compute the full measurement set for one channel
///
/// `time` and `voltage` are parallel arrays; if their lengths differ only
/// the common prefix is used.
pub fn measure(time: &[f64], voltage: &[f64]) -> Measurements {
    let n = time.len().min(voltage.len());
    let (time, voltage) = (&time[..n], &voltage[..n]);
    if n == 0 {
        return Measurements::default();
    }

    let (vmax, vmin) = extrema(voltage);
    let vpp = vmax - vmin;

    let crossings = mean_crossings(voltage);
    let period = period_from_crossings(time, &crossings);
    let freq = if period > 0.0 { 1.0 / period } else { 0.0 };
    let duty = duty_from_crossings(time, &crossings);
    let (rise_time, fall_time) = edge_times(time, voltage, vmin, vpp);

    Measurements {
        vpp,
        vmax,
        vmin,
        freq,
        period,
        rise_time,
        fall_time,
        duty,
    }
}

/// Peak statistics for samples with `t` between `a` and `b` inclusive
///
/// The bounds may be given in either order. Returns `None` when no sample
/// falls inside the window.
pub fn measure_region(time: &[f64], voltage: &[f64], a: f64, b: f64) -> Option<RegionStats> {
    let (t_start, t_end) = if a <= b { (a, b) } else { (b, a) };
    let selected: Vec<f64> = time
        .iter()
        .zip(voltage.iter())
        .filter(|(&t, _)| t >= t_start && t <= t_end)
        .map(|(_, &v)| v)
        .collect();
    if selected.is_empty() {
        return None;
    }
    let (vmax, vmin) = extrema(&selected);
    Some(RegionStats {
        t_start,
        t_end,
        vmax,
        vmin,
        vpp: vmax - vmin,
        count: selected.len(),
    })
}
