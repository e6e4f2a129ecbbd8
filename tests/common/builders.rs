//! Test data builders for creating captures

use std::f64::consts::TAU;
use std::fmt::Write;

/// Builder for synthetic oscilloscope exports
pub struct CaptureCsvBuilder {
    metadata: Vec<(String, String)>,
    sample_rate: f64,
    samples: usize,
    channels: Vec<(String, Box<dyn Fn(f64) -> f64>)>,
}

impl CaptureCsvBuilder {
    pub fn new(sample_rate: f64, samples: usize) -> Self {
        Self {
            metadata: vec![
                ("Model".to_string(), "TBS1052B".to_string()),
                ("Horizontal Units".to_string(), "s".to_string()),
                ("Vertical Units".to_string(), "V".to_string()),
            ],
            sample_rate,
            samples,
            channels: Vec::new(),
        }
    }

    pub fn metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }

    pub fn channel(mut self, name: &str, signal: impl Fn(f64) -> f64 + 'static) -> Self {
        self.channels.push((name.to_string(), Box::new(signal)));
        self
    }

    /// Square wave between 0 and `amplitude`, high for `duty` of each period
    pub fn square(self, name: &str, freq: f64, amplitude: f64, duty: f64) -> Self {
        self.channel(name, move |t| {
            let phase = (t * freq).rem_euclid(1.0);
            if phase < duty {
                amplitude
            } else {
                0.0
            }
        })
    }

    pub fn sine(self, name: &str, freq: f64, amplitude: f64) -> Self {
        self.channel(name, move |t| amplitude * (TAU * freq * t).sin())
    }

    pub fn time(&self, index: usize) -> f64 {
        index as f64 / self.sample_rate
    }

    pub fn build(self) -> String {
        let mut out = String::new();
        for (key, value) in &self.metadata {
            writeln!(out, "{},{}", key, value).unwrap();
        }
        let names: Vec<&str> = self.channels.iter().map(|(n, _)| n.as_str()).collect();
        writeln!(out, "TIME,{}", names.join(",")).unwrap();
        for i in 0..self.samples {
            let t = self.time(i);
            write!(out, "{:e}", t).unwrap();
            for (_, signal) in &self.channels {
                write!(out, ",{:e}", signal(t)).unwrap();
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_builder_layout() {
        let csv = CaptureCsvBuilder::new(1000.0, 3)
            .square("CH1", 100.0, 5.0, 0.5)
            .build();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Model,TBS1052B");
        assert_eq!(lines[3], "TIME,CH1");
        assert_eq!(lines.len(), 7);
    }
}
