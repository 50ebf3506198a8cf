use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use log::{debug, trace};

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::config::QuantizerConfig;
use crate::error::{Result, ThemeError};
use crate::swatch::Swatch;

/// Histogram entry: every pixel whose channels share the same high bits.
/// Exact sums are kept so averages do not lose the dropped low bits.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    key: u32,
    count: u64,
    sums: [u64; 3],
    mean: [u8; 3],
}

/// A box in color space covering a contiguous run of buckets in the arena.
#[derive(Debug, Clone, Copy)]
struct ColorCube {
    lower: usize,
    upper: usize,
    min: [u8; 3],
    max: [u8; 3],
    population: u64,
}

/// Heap ordering for the split worklist: largest population first, then
/// widest box, then the earliest cube in the arena.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SplitRank {
    population: u64,
    volume: u32,
    index: Reverse<usize>,
}

/// Reduce the buffer to at most `max_colors` swatches by median cut.
///
/// Swatch populations always sum to the pixel count. The result is sorted by
/// population, largest first.
pub fn quantize(buffer: &PixelBuffer<'_>, config: &QuantizerConfig) -> Result<Vec<Swatch>> {
    config.validate()?;
    if buffer.is_empty() {
        return Err(ThemeError::EmptyInput);
    }

    let (buckets, cubes) = partition(buffer, config);

    let mut swatches: Vec<Swatch> = cubes.iter().map(|cube| cube.swatch(&buckets)).collect();
    swatches.sort_by(|a, b| {
        b.population()
            .cmp(&a.population())
            .then_with(|| a.color().cmp(&b.color()))
    });

    debug!(
        "quantized {} pixels ({} buckets) into {} swatches",
        buffer.len(),
        buckets.len(),
        swatches.len()
    );
    Ok(swatches)
}

fn partition(buffer: &PixelBuffer<'_>, config: &QuantizerConfig) -> (Vec<Bucket>, Vec<ColorCube>) {
    let mut buckets = build_histogram(buffer, config.bits_per_channel);
    let mut cubes = vec![ColorCube::new(&buckets, 0, buckets.len())];
    let mut worklist = BinaryHeap::new();
    if cubes[0].can_split() {
        worklist.push(cubes[0].rank(0));
    }

    while cubes.len() < config.max_colors {
        let Some(SplitRank {
            index: Reverse(index),
            ..
        }) = worklist.pop()
        else {
            break;
        };

        let Some((low, high)) = cubes[index].split(&mut buckets) else {
            continue;
        };
        trace!(
            "split cube {index}: {} + {} pixels",
            low.population,
            high.population
        );

        cubes[index] = low;
        cubes.push(high);
        for i in [index, cubes.len() - 1] {
            if cubes[i].can_split() {
                worklist.push(cubes[i].rank(i));
            }
        }
    }

    (buckets, cubes)
}

/// Bucket pixels by the top `bits` of each channel, ordered by bucket key.
fn build_histogram(buffer: &PixelBuffer<'_>, bits: u8) -> Vec<Bucket> {
    let shift = 8 - bits as u32;
    let mut histogram: HashMap<u32, (u64, [u64; 3])> = HashMap::new();

    for pixel in buffer.pixels() {
        let key = ((pixel.r as u32 >> shift) << (2 * bits as u32))
            | ((pixel.g as u32 >> shift) << bits as u32)
            | (pixel.b as u32 >> shift);
        let entry = histogram.entry(key).or_insert((0, [0; 3]));
        entry.0 += 1;
        entry.1[0] += pixel.r as u64;
        entry.1[1] += pixel.g as u64;
        entry.1[2] += pixel.b as u64;
    }

    let mut buckets: Vec<Bucket> = histogram
        .into_iter()
        .map(|(key, (count, sums))| Bucket {
            key,
            count,
            sums,
            mean: sums.map(|sum| rounded_mean(sum, count)),
        })
        .collect();
    buckets.sort_unstable_by_key(|bucket| bucket.key);
    buckets
}

fn rounded_mean(sum: u64, count: u64) -> u8 {
    (sum as f64 / count as f64).round() as u8
}

impl ColorCube {
    fn new(buckets: &[Bucket], lower: usize, upper: usize) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        let mut population = 0;
        for bucket in &buckets[lower..upper] {
            for channel in 0..3 {
                min[channel] = min[channel].min(bucket.mean[channel]);
                max[channel] = max[channel].max(bucket.mean[channel]);
            }
            population += bucket.count;
        }
        Self {
            lower,
            upper,
            min,
            max,
            population,
        }
    }

    /// More than one distinct color left inside.
    fn can_split(&self) -> bool {
        self.upper - self.lower > 1
    }

    fn range(&self, channel: usize) -> u32 {
        (self.max[channel] - self.min[channel]) as u32
    }

    fn volume(&self) -> u32 {
        (0..3).map(|channel| self.range(channel)).sum()
    }

    fn rank(&self, index: usize) -> SplitRank {
        SplitRank {
            population: self.population,
            volume: self.volume(),
            index: Reverse(index),
        }
    }

    /// Widest channel; red wins ties, then green.
    fn longest_channel(&self) -> usize {
        let mut best = 0;
        for channel in 1..3 {
            if self.range(channel) > self.range(best) {
                best = channel;
            }
        }
        best
    }

    /// Cut at the population median along the longest channel. Buckets with
    /// the same value on that channel stay on the same side; among the valid
    /// cut points the one leaving the most even halves wins.
    fn split(&self, buckets: &mut [Bucket]) -> Option<(ColorCube, ColorCube)> {
        let channel = self.longest_channel();
        let run = &mut buckets[self.lower..self.upper];
        run.sort_unstable_by_key(|bucket| (bucket.mean[channel], bucket.key));

        let mut left = 0u64;
        let mut best: Option<(u64, usize)> = None;
        for i in 1..run.len() {
            left += run[i - 1].count;
            if run[i - 1].mean[channel] == run[i].mean[channel] {
                continue;
            }
            let imbalance = left.abs_diff(self.population - left);
            if best.map_or(true, |(lowest, _)| imbalance < lowest) {
                best = Some((imbalance, i));
            }
        }

        let (_, at) = best?;
        let at = self.lower + at;
        Some((
            ColorCube::new(buckets, self.lower, at),
            ColorCube::new(buckets, at, self.upper),
        ))
    }

    fn swatch(&self, buckets: &[Bucket]) -> Swatch {
        let mut sums = [0u64; 3];
        for bucket in &buckets[self.lower..self.upper] {
            for channel in 0..3 {
                sums[channel] += bucket.sums[channel];
            }
        }
        let [r, g, b] = sums.map(|sum| rounded_mean(sum, self.population));
        Swatch::new(Color::new(r, g, b), self.population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::to_rgba_bytes;

    fn config(max_colors: usize) -> QuantizerConfig {
        QuantizerConfig {
            max_colors,
            ..QuantizerConfig::default()
        }
    }

    fn gradient_pixels() -> Vec<Color> {
        (0..24u32)
            .flat_map(|y| {
                (0..24u32).map(move |x| Color::new((x * 10) as u8, (y * 10) as u8, ((x + y) * 5) as u8))
            })
            .collect()
    }

    #[test]
    fn empty_buffer_is_an_error() {
        let buffer = PixelBuffer::new(0, 0, &[]).unwrap();
        let err = quantize(&buffer, &config(16)).unwrap_err();
        assert!(matches!(err, ThemeError::EmptyInput));
    }

    #[test]
    fn zero_colors_is_a_config_error() {
        let bytes = to_rgba_bytes(&[Color::new(1, 2, 3)]);
        let buffer = PixelBuffer::new(1, 1, &bytes).unwrap();
        let err = quantize(&buffer, &config(0)).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidConfig { .. }));
    }

    #[test]
    fn uniform_image_produces_one_swatch() {
        let color = Color::new(200, 50, 50);
        let bytes = to_rgba_bytes(&vec![color; 1000]);
        let buffer = PixelBuffer::new(50, 20, &bytes).unwrap();

        let swatches = quantize(&buffer, &config(16)).unwrap();
        assert_eq!(swatches, vec![Swatch::new(color, 1000)]);
    }

    #[test]
    fn two_color_image_produces_two_swatches() {
        let red = Color::new(200, 50, 50);
        let blue = Color::new(50, 50, 200);
        let mut pixels = vec![red; 500];
        pixels.extend(vec![blue; 500]);
        let bytes = to_rgba_bytes(&pixels);
        let buffer = PixelBuffer::new(100, 10, &bytes).unwrap();

        let swatches = quantize(&buffer, &config(16)).unwrap();
        assert_eq!(swatches.len(), 2);
        assert!(swatches.contains(&Swatch::new(red, 500)));
        assert!(swatches.contains(&Swatch::new(blue, 500)));
    }

    #[test]
    fn population_sums_to_pixel_count_for_any_k() {
        let pixels = gradient_pixels();
        let bytes = to_rgba_bytes(&pixels);
        let buffer = PixelBuffer::new(24, 24, &bytes).unwrap();

        for k in 1..=40 {
            let swatches = quantize(&buffer, &config(k)).unwrap();
            let total: u64 = swatches.iter().map(|s| s.population()).sum();
            assert_eq!(total, pixels.len() as u64, "k = {k}");
            assert!(swatches.len() <= k, "k = {k}: got {} swatches", swatches.len());
        }
    }

    #[test]
    fn rich_image_fills_k() {
        let bytes = to_rgba_bytes(&gradient_pixels());
        let buffer = PixelBuffer::new(24, 24, &bytes).unwrap();
        let swatches = quantize(&buffer, &config(16)).unwrap();
        assert_eq!(swatches.len(), 16);
    }

    #[test]
    fn fewer_distinct_colors_than_k() {
        let colors = [
            Color::new(255, 0, 0),
            Color::new(0, 255, 0),
            Color::new(0, 0, 255),
        ];
        let pixels: Vec<Color> = colors.iter().cycle().take(30).copied().collect();
        let bytes = to_rgba_bytes(&pixels);
        let buffer = PixelBuffer::new(10, 3, &bytes).unwrap();

        let swatches = quantize(&buffer, &config(16)).unwrap();
        assert_eq!(swatches.len(), 3);
        for color in colors {
            assert!(swatches.contains(&Swatch::new(color, 10)));
        }
    }

    #[test]
    fn single_swatch_is_overall_mean() {
        let pixels = [
            Color::new(0, 0, 0),
            Color::new(100, 50, 10),
            Color::new(200, 100, 20),
            Color::new(100, 50, 10),
        ];
        let bytes = to_rgba_bytes(&pixels);
        let buffer = PixelBuffer::new(2, 2, &bytes).unwrap();

        let swatches = quantize(&buffer, &config(1)).unwrap();
        assert_eq!(swatches, vec![Swatch::new(Color::new(100, 50, 10), 4)]);
    }

    #[test]
    fn split_is_at_population_median() {
        let pixels = [
            Color::new(0, 0, 0),
            Color::new(100, 0, 0),
            Color::new(200, 0, 0),
            Color::new(200, 0, 0),
        ];
        let bytes = to_rgba_bytes(&pixels);
        let buffer = PixelBuffer::new(4, 1, &bytes).unwrap();

        let swatches = quantize(&buffer, &config(2)).unwrap();
        assert_eq!(
            swatches,
            vec![
                Swatch::new(Color::new(50, 0, 0), 2),
                Swatch::new(Color::new(200, 0, 0), 2),
            ]
        );
    }

    #[test]
    fn largest_cube_is_split_first() {
        // 6 dark pixels spread over two values, 2 bright pixels spread over two.
        let mut pixels = vec![Color::new(0, 0, 0); 3];
        pixels.extend(vec![Color::new(40, 0, 0); 3]);
        pixels.push(Color::new(0, 0, 200));
        pixels.push(Color::new(0, 0, 255));
        let bytes = to_rgba_bytes(&pixels);
        let buffer = PixelBuffer::new(8, 1, &bytes).unwrap();

        let swatches = quantize(&buffer, &config(3)).unwrap();
        assert_eq!(swatches.len(), 3);
        assert!(swatches.contains(&Swatch::new(Color::new(0, 0, 0), 3)));
        assert!(swatches.contains(&Swatch::new(Color::new(40, 0, 0), 3)));
        assert!(swatches.contains(&Swatch::new(Color::new(0, 0, 228), 2)));
    }

    #[test]
    fn swatches_lie_inside_their_cubes() {
        let bytes = to_rgba_bytes(&gradient_pixels());
        let buffer = PixelBuffer::new(24, 24, &bytes).unwrap();

        let (buckets, cubes) = partition(&buffer, &config(12));
        for cube in &cubes {
            let color = cube.swatch(&buckets).color();
            for (channel, value) in [color.r, color.g, color.b].into_iter().enumerate() {
                assert!(
                    cube.min[channel] <= value && value <= cube.max[channel],
                    "{color} outside cube {cube:?}"
                );
            }
        }
    }

    #[test]
    fn output_sorted_by_population() {
        let mut pixels = vec![Color::new(255, 0, 0); 60];
        pixels.extend(vec![Color::new(0, 255, 0); 30]);
        pixels.extend(vec![Color::new(0, 0, 255); 10]);
        let bytes = to_rgba_bytes(&pixels);
        let buffer = PixelBuffer::new(10, 10, &bytes).unwrap();

        let swatches = quantize(&buffer, &config(8)).unwrap();
        for window in swatches.windows(2) {
            assert!(window[0].population() >= window[1].population());
        }
    }

    #[test]
    fn full_precision_keeps_close_colors_apart() {
        let pixels = [Color::new(100, 100, 100), Color::new(101, 100, 100)];
        let bytes = to_rgba_bytes(&pixels);
        let buffer = PixelBuffer::new(2, 1, &bytes).unwrap();

        let coarse = quantize(&buffer, &config(4)).unwrap();
        assert_eq!(coarse.len(), 1);

        let fine = quantize(
            &buffer,
            &QuantizerConfig {
                max_colors: 4,
                bits_per_channel: 8,
            },
        )
        .unwrap();
        assert_eq!(fine.len(), 2);
    }

    #[test]
    fn swatch_keeps_population_beyond_u32() {
        let count = u64::from(u32::MAX) + 10;
        let buckets = [
            Bucket {
                key: 0,
                count,
                sums: [count * 200, count * 100, 0],
                mean: [200, 100, 0],
            },
            Bucket {
                key: 1,
                count: 6,
                sums: [6 * 210, 6 * 100, 0],
                mean: [210, 100, 0],
            },
        ];
        let cube = ColorCube::new(&buckets, 0, buckets.len());
        let swatch = cube.swatch(&buckets);
        assert_eq!(swatch.population(), count + 6);
        assert_eq!(swatch.color(), Color::new(200, 100, 0));
    }
}
