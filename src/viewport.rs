use std::cmp::min;
use std::iter::{IntoIterator, Iterator};

use serde::Serialize;

use crate::interval::Interval;
use crate::sequence::Sequence;
use crate::Nucleotide;

/// The visible part of a long sequence in the paginated 2D view
///
/// Invariant: `0 <= start <= max(0, len - size)` for the sequence length it is used with.
/// Navigation moves by half a window so that neighbouring pages share context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub start: usize,
    pub size: usize,
}

impl Viewport {
    /// A viewport at the beginning of the sequence. A size of 0 is bumped to 1.
    pub fn new(size: usize) -> Self {
        Self {
            start: 0,
            size: size.max(1),
        }
    }

    /// The visible range `[start, min(start + size, len))`
    pub fn window(&self, sequence_length: usize) -> Interval {
        window(sequence_length, self.start, self.size)
    }

    pub fn visible<'a>(&self, sequence: &'a Sequence) -> &'a [Nucleotide] {
        let range = self.window(sequence.len());
        &sequence.as_slice()[range.start..range.stop]
    }

    pub fn next(&mut self, sequence_length: usize) {
        self.start = next(self.start, self.size, sequence_length);
    }

    pub fn previous(&mut self) {
        self.start = previous(self.start, self.size);
    }

    pub fn reset(&mut self) {
        self.start = 0;
    }

    pub fn is_at_end(&self, sequence_length: usize) -> bool {
        self.start >= last_start(sequence_length, self.size)
    }
}

fn step(size: usize) -> usize {
    (size / 2).max(1)
}

fn last_start(sequence_length: usize, size: usize) -> usize {
    sequence_length.saturating_sub(size)
}

/// Clamp a requested window onto a sequence of `sequence_length`
pub fn window(sequence_length: usize, start: usize, size: usize) -> Interval {
    let start = min(start, last_start(sequence_length, size));
    Interval {
        start,
        stop: min(start + size, sequence_length),
    }
}

/// Start of the page after `current`, never past `max(0, len - size)`
pub fn next(current: usize, size: usize, sequence_length: usize) -> usize {
    min(current + step(size), last_start(sequence_length, size))
}

/// Start of the page before `current`, never below 0
pub fn previous(current: usize, size: usize) -> usize {
    current.saturating_sub(step(size))
}

/// Iterates over every page of a sequence, from the first window to the clamped last one
pub struct ViewportSlider {
    sequence_length: usize,
    size: usize,
}

impl ViewportSlider {
    pub fn new(sequence_length: usize, size: usize) -> Self {
        Self {
            sequence_length,
            size: size.max(1),
        }
    }
}

pub struct ViewportSliderIterator {
    slider: ViewportSlider,
    offset: Option<usize>,
}

impl IntoIterator for ViewportSlider {
    type Item = Interval;
    type IntoIter = ViewportSliderIterator;
    fn into_iter(self) -> Self::IntoIter {
        ViewportSliderIterator {
            slider: self,
            offset: Some(0),
        }
    }
}

impl Iterator for ViewportSliderIterator {
    type Item = Interval;

    fn next(&mut self) -> Option<Self::Item> {
        let slider = &self.slider;
        let offset = self.offset?; // None: iterator exhausted
        let result = window(slider.sequence_length, offset, slider.size);
        let following = next(offset, slider.size, slider.sequence_length);
        self.offset = if following == offset {
            None
        } else {
            Some(following)
        };
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_steps_reach_the_clamped_end() {
        let mut viewport = Viewport::new(100);
        let len = 250;
        viewport.next(len);
        assert_eq!(viewport.start, 50);
        viewport.next(len);
        assert_eq!(viewport.start, 100);
        viewport.next(len);
        assert_eq!(viewport.start, 150);
        assert_eq!(viewport.window(len), Interval { start: 150, stop: 250 });
        assert!(viewport.is_at_end(len));

        viewport.next(len);
        assert_eq!(viewport.start, 150);
    }

    #[test]
    fn test_next_reaches_a_fixed_point() {
        for len in 0..40 {
            for size in 1..12 {
                let mut start = 0;
                for _ in 0..100 {
                    start = next(start, size, len);
                }
                let expected = len.saturating_sub(size);
                assert_eq!(start, expected, "len={} size={}", len, size);
                assert_eq!(next(start, size, len), expected);
            }
        }
    }

    #[test]
    fn test_previous_clamps_at_zero() {
        let mut viewport = Viewport::new(10);
        viewport.previous();
        assert_eq!(viewport.start, 0);
        viewport.start = 7;
        viewport.previous();
        assert_eq!(viewport.start, 2);
        viewport.previous();
        assert_eq!(viewport.start, 0);
    }

    #[test]
    fn test_window_on_short_sequence() {
        assert_eq!(window(30, 0, 100), Interval { start: 0, stop: 30 });
        assert_eq!(window(0, 5, 100), Interval { start: 0, stop: 0 });
        assert_eq!(window(250, 200, 100), Interval { start: 150, stop: 250 });
    }

    #[test]
    fn test_visible_slice() {
        let seq = Sequence::parse("ACGTACGTAC").unwrap();
        let mut viewport = Viewport::new(4);
        viewport.next(seq.len());
        let visible: String = viewport.visible(&seq).iter().map(|b| b.name()).collect();
        assert_eq!(visible, "GTAC");
    }

    #[test]
    fn test_viewport_slider() {
        let windows: Vec<Interval> = ViewportSlider::new(250, 100).into_iter().collect();
        assert_eq!(
            windows,
            vec![
                Interval { start: 0, stop: 100 },
                Interval { start: 50, stop: 150 },
                Interval { start: 100, stop: 200 },
                Interval { start: 150, stop: 250 },
            ]
        );
        let windows: Vec<Interval> = ViewportSlider::new(0, 100).into_iter().collect();
        assert_eq!(windows, vec![Interval { start: 0, stop: 0 }]);
    }
}
