/// Linear axis: limits, label, ticks, and the data-to-pixel map.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

/// Minor ticks per major interval.
const MINOR_DIVISIONS: usize = 5;

impl Axis {
    /// Axis with explicit limits and no ticks.
    pub fn fixed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            label: String::new(),
            tick_positions: Vec::new(),
            tick_labels: Vec::new(),
            minor_ticks: Vec::new(),
        }
    }

    /// Limits widened to whole multiples of a 1/2/5 step, ticks on every step.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (lo, hi, step) = nice_range(data_min, data_max, target_ticks);
        let steps = ((hi - lo) / step).round() as usize;

        let mut axis = Self::fixed(lo, hi);
        axis.tick_positions = (0..=steps).map(|i| lo + step * i as f64).collect();
        axis.tick_labels = axis.tick_positions.iter().map(|&v| format_tick(v, step)).collect();
        let minor_step = step / MINOR_DIVISIONS as f64;
        axis.minor_ticks = (1..steps * MINOR_DIVISIONS)
            .filter(|i| i % MINOR_DIVISIONS != 0)
            .map(|i| lo + minor_step * i as f64)
            .collect();
        axis
    }

    /// Auto-scale over the finite values, padding each side by `pad` of the span.
    /// No finite values gives a unit axis.
    pub fn from_data<I>(values: I, pad: f64, target_ticks: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut finite = values.into_iter().filter(|v| v.is_finite()).peekable();
        if finite.peek().is_none() {
            return Self::auto_linear(0.0, 1.0, target_ticks);
        }
        let (lo, hi) =
            finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let margin = (hi - lo) * pad;
        Self::auto_linear(lo - margin, hi + margin, target_ticks)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value onto `[px_min, px_max]` (pass them reversed for a y axis).
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        px_min + (value - self.min) / (self.max - self.min) * (px_max - px_min)
    }
}

fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let step = nice_step((data_max - data_min) / (target_ticks.max(2) - 1) as f64);
    ((data_min / step).floor() * step, (data_max / step).ceil() * step, step)
}

/// Round `rough` to 1, 2, 5, or 10 times a power of ten.
fn nice_step(rough: f64) -> f64 {
    let magnitude = 10.0_f64.powf(rough.abs().log10().floor());
    let mantissa = rough / magnitude;
    let nice = [(1.5, 1.0), (3.5, 2.0), (7.5, 5.0)]
        .iter()
        .find(|(limit, _)| mantissa <= *limit)
        .map_or(10.0, |&(_, n)| n);
    nice * magnitude
}

fn format_tick(value: f64, step: f64) -> String {
    // Snap values within rounding noise of zero so they never print as "-0".
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if step >= 1.0 {
        format!("{}", v.round() as i64)
    } else {
        let decimals = (-step.log10().floor()) as usize;
        format!("{v:.decimals$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_linear_covers_data() {
        let ax = Axis::auto_linear(0.3, 9.7, 6);
        assert!(ax.min <= 0.3);
        assert!(ax.max >= 9.7);
        assert_eq!(ax.tick_positions.len(), ax.tick_labels.len());
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("0"));
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::auto_linear(0.0, 100.0, 5);
        let px = ax.data_to_pixel(50.0, 0.0, 500.0);
        assert!((px - 250.0).abs() < 1.0);
    }

    #[test]
    fn negative_zero_is_not_printed() {
        let ax = Axis::auto_linear(-0.25, 0.25, 5);
        assert!(ax.tick_labels.iter().all(|l| l != "-0.0" && l != "-0.00"));
    }

    #[test]
    fn from_data_ignores_non_finite() {
        let ax = Axis::from_data([1.0, f64::NAN, 3.0], 0.05, 5);
        assert!(ax.min <= 1.0 && ax.max >= 3.0);
        let empty = Axis::from_data(std::iter::empty(), 0.05, 5);
        assert!(empty.max > empty.min);
    }

    #[test]
    fn nice_step_values() {
        assert!((nice_step(3.2) - 2.0).abs() < 1e-9);
        assert!((nice_step(0.7) - 0.5).abs() < 1e-9);
        assert!((nice_step(15.0) - 10.0).abs() < 1e-9);
        assert!((nice_step(4.5) - 5.0).abs() < 1e-9);
    }
}
