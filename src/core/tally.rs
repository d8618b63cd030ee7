use std::fmt;

/// Error counts per severity, kept in the order severities were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeverityTally {
    counts: Vec<(String, usize)>,
}

impl SeverityTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, severity: &str) {
        match self.counts.iter_mut().find(|(s, _)| s == severity) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((severity.to_string(), 1)),
        }
    }

    pub fn get(&self, severity: &str) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| s == severity)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(s, n)| (s.as_str(), *n))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// `2 warning(s), 1 error(s)`
impl fmt::Display for SeverityTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (severity, n)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{n} {severity}(s)")?;
        }
        Ok(())
    }
}
