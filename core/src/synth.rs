use std::time::Duration;

use rand::Rng;

use crate::{
    clock::Timestamp,
    document::FsocData,
    metric::{Metric, ValueType},
    Error,
};

const DEFAULT_MIN: f64 = 0.0;
const DEFAULT_MAX: f64 = 100.0;

/**
Fills in data points for metrics that don't have any, using their hints.

A `value` hint produces a constant value. Otherwise values are drawn uniformly
from `min..=max`, which default to `0` and `100`. Points are contiguous and
the last one ends at the time of synthesis.
*/
#[derive(Debug, Clone)]
pub struct Synthesizer {
    points: usize,
    interval: Duration,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Synthesizer {
            points: 1,
            interval: Duration::from_secs(60),
        }
    }
}

impl Synthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /**
    The number of points to synthesize per metric.
    */
    pub fn points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /**
    The time covered by each synthesized point.
    */
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /**
    Synthesize points for every metric in the document without any.

    Returns the number of metrics that were filled.
    */
    pub fn fill(&self, data: &mut FsocData, now: Timestamp, rng: &mut impl Rng) -> Result<usize, Error> {
        let mut filled = 0;

        for entity in &mut data.melt {
            for metric in &mut entity.metrics {
                if metric.data_points.is_empty() {
                    self.fill_metric(metric, now, rng)?;
                    filled += 1;
                }
            }
        }

        Ok(filled)
    }

    pub fn fill_metric(
        &self,
        metric: &mut Metric,
        now: Timestamp,
        rng: &mut impl Rng,
    ) -> Result<(), Error> {
        let source = ValueSource::from_hints(metric)?;

        let step = u64::try_from(self.interval.as_nanos()).unwrap_or(u64::MAX);
        let now = now.to_unix_nanos();
        let mut start = now.saturating_sub(step.saturating_mul(self.points as u64));

        for _ in 0..self.points {
            let end = start.saturating_add(step).min(now);

            let mut value = source.next(rng);
            if metric.value_type == ValueType::Long {
                value = value.round();
            }

            metric.add_data_point(start, end, value);
            start = end;
        }

        Ok(())
    }
}

enum ValueSource {
    Constant(f64),
    Uniform { min: f64, max: f64 },
}

impl ValueSource {
    fn from_hints(metric: &Metric) -> Result<Self, Error> {
        let parse = |hint: &Option<String>, name: &str| -> Result<Option<f64>, Error> {
            hint.as_deref()
                .map(|hint| {
                    let value = hint.trim().parse::<f64>().map_err(|e| {
                        Error::new(
                            format!("invalid `{name}` hint on `{}`", metric.type_name),
                            e,
                        )
                    })?;

                    if !value.is_finite() {
                        return Err(Error::msg(format_args!(
                            "`{name}` hint {value} on `{}` is not a finite number",
                            metric.type_name
                        )));
                    }

                    Ok(value)
                })
                .transpose()
        };

        if let Some(value) = parse(&metric.value, "value")? {
            return Ok(ValueSource::Constant(value));
        }

        let min = parse(&metric.min, "min")?.unwrap_or(DEFAULT_MIN);
        let max = parse(&metric.max, "max")?.unwrap_or(DEFAULT_MAX.max(min));

        if min > max {
            return Err(Error::msg(format_args!(
                "`min` hint {min} is greater than `max` hint {max} on `{}`",
                metric.type_name
            )));
        }

        if !(max - min).is_finite() {
            return Err(Error::msg(format_args!(
                "the range of `min` hint {min} and `max` hint {max} on `{}` is too large",
                metric.type_name
            )));
        }

        Ok(ValueSource::Uniform { min, max })
    }

    fn next(&self, rng: &mut impl Rng) -> f64 {
        match *self {
            ValueSource::Constant(value) => value,
            ValueSource::Uniform { min, max } if min == max => min,
            ValueSource::Uniform { min, max } => rng.gen_range(min..=max),
        }
    }
}
