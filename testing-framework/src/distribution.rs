//! Statistical verification of generator output.
//!
//! The full u64 range is partitioned into a power-of-two number of
//! equal-width buckets, a statistically sufficient sample is drawn, and
//! bucket occupancy is required to stay close to the uniform expectation:
//! the sample standard deviation of the counts must be below
//! [`UNIFORMITY_TOLERANCE`] times their mean.

use std::future::Future;

use anyhow::Result;

/// Accepted ratio of bucket-count standard deviation to mean.
pub const UNIFORMITY_TOLERANCE: f64 = 0.05;

// Below this bucket count, 1000 samples per bucket is not enough to keep
// the sampling error itself from dominating.
const SMALL_BUCKET_FLOOR: u64 = 100;
const SMALL_BUCKET_SAMPLE_SIZE: u64 = 100_000;

/// Number of samples drawn for a given bucket count: 1000 per bucket, with
/// a fixed floor for small bucket counts.
pub fn sample_size(buckets: u64) -> u64 {
    if buckets < SMALL_BUCKET_FLOOR {
        SMALL_BUCKET_SAMPLE_SIZE
    } else {
        buckets * 1000
    }
}

/// Width of each bucket over the full u64 range. The last bucket may be
/// narrower.
pub fn class_width(buckets: u64) -> u64 {
    u64::MAX / buckets + 1
}

/// Draws `sample_size(buckets)` values from `sample` and asserts their
/// distribution over `buckets` equal-width buckets is uniform.
///
/// Samples are drawn strictly sequentially; the first sampling failure
/// aborts the test.
///
/// # Errors
///
/// Fails if `buckets` is not a power of two, a sample cannot be drawn, or
/// occupancy deviates beyond the tolerance.
pub async fn basic_distribution_test<F, Fut>(
    buckets: u64,
    class_width: u64,
    mut sample: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<u64>>,
{
    anyhow::ensure!(
        buckets.is_power_of_two(),
        "bucket count {buckets} is not a power of two"
    );

    let count = sample_size(buckets);
    let mut distribution = vec![0.0f64; buckets as usize];
    for drawn in 0..count {
        let value = sample().await?;
        distribution[(value / class_width) as usize] += 1.0;
        if (drawn + 1) % 50_000 == 0 {
            log::debug!("drew {}/{count} samples", drawn + 1);
        }
    }

    evaluate_distribution_uniformity(&distribution)
}

/// Asserts the bucket counts are uniform under the reference criterion.
pub fn evaluate_distribution_uniformity(distribution: &[f64]) -> Result<()> {
    anyhow::ensure!(
        distribution.len() > 1,
        "distribution needs at least two buckets"
    );

    let mean = mean(distribution);
    let stdev = stdev(distribution, mean);
    anyhow::ensure!(
        stdev < UNIFORMITY_TOLERANCE * mean,
        "basic distribution test failed: n={}, mean={mean:.2}, stdev={stdev:.2}, tolerance={:.2}",
        distribution.len(),
        UNIFORMITY_TOLERANCE * mean
    );
    Ok(())
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// Sample standard deviation (n - 1 denominator).
fn stdev(values: &[f64], mean: f64) -> f64 {
    let variance = values
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}
