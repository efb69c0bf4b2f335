use std::fmt::Display;

/// Summary of a stream of counts.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub total: usize,
    pub min: usize,
    pub max: usize,
}

impl Stats {
    pub fn single(v: usize) -> Self {
        Stats {
            count: 1,
            total: v,
            min: v,
            max: v,
        }
    }

    pub fn add_sample(&mut self, value: usize) {
        *self = self.merge(&Self::single(value));
    }

    pub fn merge(&self, other: &Self) -> Self {
        Stats {
            count: self.count + other.count,
            total: self.total + other.total,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total as f64 / self.count as f64
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            count: 0,
            total: 0,
            min: usize::MAX,
            max: 0,
        }
    }
}

impl FromIterator<usize> for Stats {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut stats = Stats::default();
        stats.extend(iter);
        stats
    }
}

impl Extend<usize> for Stats {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        iter.into_iter().for_each(|v| self.add_sample(v));
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "no samples");
        }
        write!(
            f,
            "{} - {}; avg {:.1}; total {}; {} samples",
            self.min,
            self.max,
            self.mean(),
            self.total,
            self.count
        )
    }
}
