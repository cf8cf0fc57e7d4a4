use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::color::{ColorMap, Rgb};
use crate::sequence::Sequence;
use crate::Nucleotide;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Shape of the rendered double helix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelixParams {
    pub turns: f32,
    pub radius: f32,
    /// Extent along the helix axis (y)
    pub height: f32,
    /// Short sequences are stretched over at least this many points per strand
    pub minimum_segments: usize,
    /// Peak radial displacement around an edit at full progress
    pub perturbation_magnitude: f32,
}

impl Default for HelixParams {
    fn default() -> Self {
        Self {
            turns: 2.0,
            radius: 2.0,
            height: 10.0,
            minimum_segments: 20,
            perturbation_magnitude: 0.3,
        }
    }
}

/// The edit currently shown on the helix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEdit {
    pub position: usize,
    pub target_base: Nucleotide,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HelixGeometry {
    pub strand_a: Vec<Point3>,
    pub strand_b: Vec<Point3>,
    pub colors_a: Vec<Rgb>,
    pub colors_b: Vec<Rgb>,
    /// Point index the active edit maps to, if any
    pub edit_index: Option<usize>,
}

impl HelixGeometry {
    pub fn len(&self) -> usize {
        self.strand_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strand_a.is_empty()
    }
}

/// Half-width (in points) of the window around an edit that gets displaced
pub fn effect_range(point_count: usize) -> usize {
    ((point_count as f32 * 0.1).floor() as usize).max(3)
}

/// Radial displacement of point `index` for an edit at `edit_index`
///
/// Follows `sin(pi * (1 - d / range))` inside the effect range and is exactly zero outside it or
/// while `progress` is zero.
pub fn perturbation_offset(
    index: usize,
    edit_index: usize,
    point_count: usize,
    progress: f32,
    magnitude: f32,
) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    let range = effect_range(point_count);
    let distance = if index > edit_index {
        index - edit_index
    } else {
        edit_index - index
    };
    if distance > range {
        return 0.0;
    }
    (PI * (1.0 - distance as f32 / range as f32)).sin() * progress * magnitude
}

/// Builds double-helix point clouds for a sequence
///
/// `generate` is a pure function of its arguments; animation state is passed in as `progress`.
#[derive(Debug, Clone, Default)]
pub struct HelixGeometryGenerator {
    params: HelixParams,
    colors: ColorMap,
}

impl HelixGeometryGenerator {
    pub fn new(params: HelixParams, colors: ColorMap) -> Self {
        Self { params, colors }
    }

    pub fn params(&self) -> &HelixParams {
        &self.params
    }

    pub fn generate(
        &self,
        sequence: &Sequence,
        edit: Option<ActiveEdit>,
        progress: f64,
    ) -> HelixGeometry {
        let len = sequence.len();
        let n = len.max(self.params.minimum_segments);
        let progress = progress as f32;

        // the edit only shows once it is inside the sequence and the animation has started
        let edit = edit.filter(|e| e.position < len && progress > 0.0);
        let edit_index = edit.map(|e| (e.position * n + len - 1) / len);

        let mut geometry = HelixGeometry {
            strand_a: Vec::with_capacity(n),
            strand_b: Vec::with_capacity(n),
            colors_a: Vec::with_capacity(n),
            colors_b: Vec::with_capacity(n),
            edit_index,
        };

        for i in 0..n {
            let t = if n > 1 {
                i as f32 / (n - 1) as f32
            } else {
                0.0
            };
            let angle = 2.0 * PI * self.params.turns * t;
            let y = (t - 0.5) * self.params.height;
            let offset = match edit_index {
                Some(edit_index) => perturbation_offset(
                    i,
                    edit_index,
                    n,
                    progress,
                    self.params.perturbation_magnitude,
                ),
                None => 0.0,
            };
            let radius = self.params.radius + offset;
            geometry.strand_a.push(point_on_circle(angle, radius, y));
            geometry.strand_b.push(point_on_circle(angle + PI, radius, y));

            let (color_a, color_b) = if len == 0 {
                (self.colors.backbone, self.colors.backbone)
            } else {
                let sampled = i * len / n;
                match edit {
                    Some(e) if e.position == sampled => (
                        self.colors.color(e.target_base, true),
                        self.colors.color(e.target_base.complement(), true),
                    ),
                    _ => {
                        let base = sequence[sampled];
                        (
                            self.colors.color(base, false),
                            self.colors.color(base.complement(), false),
                        )
                    }
                }
            };
            geometry.colors_a.push(color_a);
            geometry.colors_b.push(color_b);
        }
        geometry
    }
}

fn point_on_circle(angle: f32, radius: f32, y: f32) -> Point3 {
    Point3 {
        x: radius * angle.cos(),
        y,
        z: radius * angle.sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const SEQ: &str = "ATGCGATCGATCGATCGATCGGCCAATTGGCCAATTGGCCAATTGGCC";

    fn generator() -> HelixGeometryGenerator {
        HelixGeometryGenerator::default()
    }

    #[test]
    fn test_strands_are_phase_shifted() {
        let seq = Sequence::parse(SEQ).unwrap();
        let geometry = generator().generate(&seq, None, 0.0);
        assert_eq!(geometry.len(), seq.len());
        assert_eq!(geometry.strand_b.len(), seq.len());
        for (a, b) in geometry.strand_a.iter().zip(&geometry.strand_b) {
            assert_approx_eq!(a.x, -b.x, 1e-4);
            assert_approx_eq!(a.z, -b.z, 1e-4);
            assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn test_colors_follow_bases_and_complements() {
        let seq = Sequence::parse(SEQ).unwrap();
        let map = ColorMap::default();
        let geometry = generator().generate(&seq, None, 0.5);
        for (i, base) in seq.iter().enumerate() {
            assert_eq!(geometry.colors_a[i], map.color(base, false));
            assert_eq!(geometry.colors_b[i], map.color(base.complement(), false));
        }
    }

    #[test]
    fn test_short_sequence_is_stretched_to_minimum_segments() {
        let seq = Sequence::parse("ACGT").unwrap();
        let geometry = generator().generate(&seq, None, 0.0);
        assert_eq!(geometry.len(), 20);
        let map = ColorMap::default();
        assert_eq!(geometry.colors_a[0], map.color(Nucleotide::A, false));
        assert_eq!(geometry.colors_a[19], map.color(Nucleotide::T, false));
    }

    #[test]
    fn test_empty_sequence_degrades_to_backbone() {
        let geometry = generator().generate(
            &Sequence::default(),
            Some(ActiveEdit {
                position: 0,
                target_base: Nucleotide::A,
            }),
            0.5,
        );
        assert_eq!(geometry.len(), 20);
        assert!(geometry.edit_index.is_none());
        let backbone = ColorMap::default().backbone;
        assert!(geometry.colors_a.iter().all(|c| *c == backbone));

        let nothing = HelixGeometryGenerator::new(
            HelixParams {
                minimum_segments: 0,
                ..HelixParams::default()
            },
            ColorMap::default(),
        )
        .generate(&Sequence::default(), None, 0.0);
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_perturbation_is_local() {
        for &n in &[10usize, 48, 100, 333] {
            let range = effect_range(n);
            for &progress in &[0.01f32, 0.5, 0.99] {
                for i in 0..n {
                    let edit = n / 2;
                    let offset = perturbation_offset(i, edit, n, progress, 0.3);
                    let distance = if i > edit { i - edit } else { edit - i };
                    if distance >= range {
                        assert_eq!(offset, 0.0, "n={} i={}", n, i);
                    } else if distance > 0 {
                        assert!(offset > 0.0);
                    }
                }
            }
        }
        assert_eq!(effect_range(10), 3);
        assert_eq!(effect_range(100), 10);
    }

    #[test]
    fn test_edit_moves_only_nearby_points() {
        let seq = Sequence::parse(SEQ).unwrap();
        let edit = ActiveEdit {
            position: 24,
            target_base: Nucleotide::C,
        };
        let plain = generator().generate(&seq, None, 0.0);
        let edited = generator().generate(&seq, Some(edit), 0.6);
        assert_eq!(edited.edit_index, Some(24));
        let range = effect_range(seq.len());
        for i in 0..seq.len() {
            let distance = if i > 24 { i - 24 } else { 24 - i };
            if distance > range {
                assert_eq!(plain.strand_a[i], edited.strand_a[i]);
                assert_eq!(plain.strand_b[i], edited.strand_b[i]);
            }
        }
        assert_ne!(plain.strand_a[22], edited.strand_a[22]);
    }

    #[test]
    fn test_edit_is_invisible_before_progress_starts() {
        let seq = Sequence::parse(SEQ).unwrap();
        let edit = ActiveEdit {
            position: 24,
            target_base: Nucleotide::C,
        };
        let plain = generator().generate(&seq, None, 0.0);
        let edited = generator().generate(&seq, Some(edit), 0.0);
        assert_eq!(plain, edited);
    }

    #[test]
    fn test_edit_shows_target_base_color() {
        let seq = Sequence::parse(SEQ).unwrap();
        let map = ColorMap::default();
        // position 24 is an A
        assert_eq!(seq[24], Nucleotide::A);
        let edit = ActiveEdit {
            position: 24,
            target_base: Nucleotide::C,
        };
        let geometry = generator().generate(&seq, Some(edit), 0.1);
        assert_eq!(geometry.colors_a[24], map.color(Nucleotide::C, true));
        assert_eq!(geometry.colors_b[24], map.color(Nucleotide::G, true));
        assert_eq!(geometry.colors_a[23], map.color(seq[23], false));
    }

    #[test]
    fn test_edit_on_stretched_sequence() {
        let seq = Sequence::parse("ACGTA").unwrap();
        let edit = ActiveEdit {
            position: 3,
            target_base: Nucleotide::C,
        };
        let geometry = generator().generate(&seq, Some(edit), 0.5);
        // 5 bases over 20 points: base 3 covers points 12..16
        assert_eq!(geometry.edit_index, Some(12));
        let map = ColorMap::default();
        for i in 12..16 {
            assert_eq!(geometry.colors_a[i], map.color(Nucleotide::C, true));
        }
        assert_eq!(geometry.colors_a[11], map.color(Nucleotide::G, false));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let seq = Sequence::parse(SEQ).unwrap();
        let edit = Some(ActiveEdit {
            position: 7,
            target_base: Nucleotide::G,
        });
        assert_eq!(
            generator().generate(&seq, edit, 0.37),
            generator().generate(&seq, edit, 0.37)
        );
    }
}
