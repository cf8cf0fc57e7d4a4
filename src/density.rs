use log::warn;
use serde::{Deserialize, Serialize};

/// A variant/SNP position on one chromosome, as shown in the locus browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub position: i64,
    pub chromosome: String,
    #[serde(default)]
    pub is_causal_candidate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// How many of `count` are causal candidates. They are counted like every other position
    /// and only tracked here for emphasis.
    pub causal_count: usize,
    /// Variants per kilobase, or plain `count` if the bin has zero width
    pub density: f64,
}

/// Occupancy histogram of `[center - window, center + window]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityHistogram {
    pub region_start: i64,
    pub region_end: i64,
    pub bin_width: f64,
    pub bins: Vec<DensityBin>,
    /// Causal candidates inside the region, sorted
    pub causal_positions: Vec<i64>,
}

impl DensityHistogram {
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_density(&self) -> f64 {
        self.bins.iter().map(|b| b.density).fold(0.0, f64::max)
    }
}

/// Bin the positions of all records that sit on `chromosome`
pub fn bin_chromosome(
    records: &[VariantRecord],
    chromosome: &str,
    center: i64,
    window: u64,
    bin_count: usize,
) -> DensityHistogram {
    let on_chromosome: Vec<&VariantRecord> = records
        .iter()
        .filter(|r| r.chromosome == chromosome)
        .collect();
    bin_records(&on_chromosome, center, window, bin_count)
}

/// Bin plain positions (none of them causal) around `center`
pub fn bin(positions: &[i64], center: i64, window: u64, bin_count: usize) -> DensityHistogram {
    let records: Vec<VariantRecord> = positions
        .iter()
        .map(|&position| VariantRecord {
            position,
            chromosome: String::new(),
            is_causal_candidate: false,
        })
        .collect();
    let refs: Vec<&VariantRecord> = records.iter().collect();
    bin_records(&refs, center, window, bin_count)
}

fn bin_records(
    records: &[&VariantRecord],
    center: i64,
    window: u64,
    bin_count: usize,
) -> DensityHistogram {
    let start = i128::from(center) - i128::from(window);
    let end = i128::from(center) + i128::from(window);
    let clamp = |x: i128| x.max(i64::MIN.into()).min(i64::MAX.into()) as i64;
    let mut histogram = DensityHistogram {
        region_start: clamp(start),
        region_end: clamp(end),
        bin_width: 0.0,
        bins: Vec::new(),
        causal_positions: Vec::new(),
    };
    if bin_count == 0 {
        return histogram;
    }
    if start < i128::from(i64::MIN) || end > i128::from(i64::MAX) {
        warn!(
            "Density window {} around {} does not fit genomic coordinates, skipping",
            window, center
        );
        return histogram;
    }
    let region_start = histogram.region_start;
    let region_end = histogram.region_end;

    // span < 2^64 here and bin_count <= usize::MAX, so span * bin_count fits in u128
    let span = 2 * u128::from(window);
    let bin_width = span as f64 / bin_count as f64;
    let mut counts = vec![0usize; bin_count];
    let mut causal_counts = vec![0usize; bin_count];

    for record in records {
        let position = record.position;
        if position < region_start || position > region_end {
            continue; // outside the region: excluded, not wrapped
        }
        let index = if span > 0 {
            // exact integer floor; the last bin is closed on both ends, so `region_end` lands in it
            let offset = (i128::from(position) - i128::from(region_start)) as u128;
            let raw = offset * bin_count as u128 / span;
            (raw as usize).min(bin_count - 1)
        } else {
            // every bin is [c, c); only the closed last bin can hold anything
            bin_count - 1
        };
        counts[index] += 1;
        if record.is_causal_candidate {
            causal_counts[index] += 1;
            histogram.causal_positions.push(position);
        }
    }
    histogram.causal_positions.sort_unstable();

    let kilobases = bin_width / 1000.0;
    histogram.bins = (0..bin_count)
        .map(|i| {
            let count = counts[i];
            DensityBin {
                start: region_start as f64 + i as f64 * bin_width,
                end: region_start as f64 + (i + 1) as f64 * bin_width,
                count,
                causal_count: causal_counts[i],
                density: if bin_width > 0.0 {
                    count as f64 / kilobases
                } else {
                    count as f64
                },
            }
        })
        .collect();
    histogram.bin_width = bin_width;
    histogram
}
