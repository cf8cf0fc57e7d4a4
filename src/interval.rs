use std::fmt;

use serde::Serialize;

use crate::error::ParseError;

/// A range of sequence or genomic positions
///
/// By convention, start and stop are zero-based.
/// The start position is always inclusive and the stop position is always exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: usize, // inclusive
    pub stop: usize,  // exclusive
}

impl Interval {
    pub fn new(start: usize, stop: usize) -> Result<Interval, ParseError> {
        if stop < start {
            Err(ParseError::somewhere(
                "low < high",
                format!("{}>={}", start, stop),
            ))
        } else {
            Ok(Interval { start, stop })
        }
    }

    pub fn parse(range: &str) -> Result<Interval, ParseError> {
        let parts: Vec<&str> = range.split('-').collect();
        if parts.len() != 2 {
            return Err(ParseError::somewhere("start-stop", range.to_string()));
        }

        let start = parts[0]
            .trim()
            .parse::<usize>()
            .map_err(|_| ParseError::somewhere("usize", parts[0].to_string()))?;
        let stop = parts[1]
            .trim()
            .parse::<usize>()
            .map_err(|_| ParseError::somewhere("usize", parts[1].to_string()))?;
        if stop <= start {
            Err(ParseError::somewhere("start<stop", range.to_string()))
        } else {
            Interval::new(start, stop)
        }
    }

    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.stop == self.start
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)
    }
}

/// A range on a named chromosome, written as `chromosome:start-stop`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locus {
    pub chromosome: String,
    pub range: Interval,
}

impl Locus {
    pub fn parse(text: &str) -> Result<Locus, ParseError> {
        // chromosome names may themselves contain ':' (e.g. HLA contigs), so split on the last one
        match text.trim().rsplit_once(':') {
            Some((chromosome, range)) if !chromosome.is_empty() => Ok(Locus {
                chromosome: chromosome.to_string(),
                range: Interval::parse(range)?,
            }),
            _ => Err(ParseError::somewhere(
                "chromosome:start-end",
                text.to_string(),
            )),
        }
    }

    /// Midpoint of the range, used to center a density window on the locus
    pub fn center(&self) -> usize {
        self.range.start + self.range.len() / 2
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chromosome, self.range)
    }
}
