//! Resampling and alignment of the three sensor streams.
//!
//! Each stream is bucketed onto an epoch-anchored grid of one [`Period`] and
//! averaged per bucket. Empty buckets stay missing; nothing is interpolated.
//! [`align`] then trims the streams to their common interior and drops every
//! timestep where any stream is missing, so the surviving index is shared.

use pushstate_core::error::DataError;
use pushstate_core::time::{Period, Timestamp};
use pushstate_core::types::{Pose2, SensorStream, StreamKind, Wrench};

// ---------------------------------------------------------------------------
// ResampledStream
// ---------------------------------------------------------------------------

/// A stream on a fixed grid. Bucket `i` starts at `start + i * period`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledStream {
    pub kind: StreamKind,
    pub period: Period,
    pub start: Timestamp,
    /// Per-bucket mean, `None` where no sample fell into the bucket.
    pub values: Vec<Option<[f64; 3]>>,
}

impl ResampledStream {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Start of the last bucket, `None` for an empty stream.
    pub fn end(&self) -> Option<Timestamp> {
        let last = self.values.len().checked_sub(1)?;
        Some(self.bucket_time(last))
    }

    /// Start time of bucket `i`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn bucket_time(&self, i: usize) -> Timestamp {
        Timestamp::from_nanos(self.start.nanos() + i as i64 * self.period.nanos() as i64)
    }

    /// Mean value of the bucket starting at `t`, if present.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn at(&self, t: Timestamp) -> Option<[f64; 3]> {
        let offset = t - self.start;
        if offset < 0 || offset % self.period.nanos() as i64 != 0 {
            return None;
        }
        let index = (offset / self.period.nanos() as i64) as usize;
        self.values.get(index).copied().flatten()
    }

    /// Timestamps of every bucket, present or not.
    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        (0..self.values.len()).map(|i| self.bucket_time(i))
    }
}

/// Largest grid a single stream may be resampled onto.
pub const MAX_BUCKETS: usize = 1 << 22;

/// Bucket `stream` onto a `period` grid, averaging the samples of each bucket.
///
/// The grid covers every bucket from the earliest to the latest sample.
/// Sample order does not matter. Fails when the samples span more than
/// [`MAX_BUCKETS`] buckets or lie outside the representable time range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resample(stream: &SensorStream, period: Period) -> Result<ResampledStream, DataError> {
    let out_of_range = || DataError::InvalidTimestamps {
        reason: format!("{} samples fall outside the {period} grid range", stream.kind),
    };
    let Some(first) = stream.samples.iter().map(|s| s.time).min() else {
        return Ok(ResampledStream {
            kind: stream.kind,
            period,
            start: Timestamp::default(),
            values: Vec::new(),
        });
    };
    let start = first.floor_to(period).ok_or_else(out_of_range)?;
    let last = stream
        .samples
        .iter()
        .map(|s| s.time)
        .max()
        .unwrap_or(first)
        .floor_to(period)
        .ok_or_else(out_of_range)?;
    let p = period.nanos() as i64;
    let span = last.checked_since(start).ok_or_else(out_of_range)?;
    let buckets = usize::try_from(span / p)
        .ok()
        .and_then(|n| n.checked_add(1))
        .filter(|&n| n <= MAX_BUCKETS)
        .ok_or_else(|| DataError::InvalidTimestamps {
            reason: format!(
                "{} samples span {} s, more than {MAX_BUCKETS} buckets of {period}",
                stream.kind,
                last.as_secs_f64() - start.as_secs_f64()
            ),
        })?;

    let mut sums = vec![[0.0_f64; 3]; buckets];
    let mut counts = vec![0_u32; buckets];
    for sample in &stream.samples {
        // Every sample lies in [start, last], so these cannot fail.
        let bucket = sample.time.floor_to(period).ok_or_else(out_of_range)?;
        let index = (bucket.checked_since(start).ok_or_else(out_of_range)? / p) as usize;
        for (acc, v) in sums[index].iter_mut().zip(sample.values) {
            *acc += v;
        }
        counts[index] += 1;
    }

    let values = sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| {
            (count > 0).then(|| {
                let n = f64::from(count);
                [sum[0] / n, sum[1] / n, sum[2] / n]
            })
        })
        .collect();

    Ok(ResampledStream {
        kind: stream.kind,
        period,
        start,
        values,
    })
}

// ---------------------------------------------------------------------------
// AlignedFrame
// ---------------------------------------------------------------------------

/// Three streams sharing one gap-free index with no missing values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedFrame {
    pub period: Period,
    pub timestamps: Vec<Timestamp>,
    pub object: Vec<Pose2>,
    pub tip: Vec<Pose2>,
    pub wrench: Vec<Wrench>,
}

impl AlignedFrame {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    fn push(&mut self, t: Timestamp, object: [f64; 3], tip: [f64; 3], wrench: [f64; 3]) {
        self.timestamps.push(t);
        self.object.push(Pose2::from_array(object));
        self.tip.push(Pose2::from_array(tip));
        self.wrench.push(Wrench::from_array(wrench));
    }

    /// Split wherever consecutive timesteps are more than one period apart.
    ///
    /// An empty frame yields no segments.
    #[allow(clippy::cast_possible_wrap)]
    pub fn split_on_gaps(&self) -> Vec<Self> {
        let step = self.period.nanos() as i64;
        let mut segments = Vec::new();
        let mut current = Self {
            period: self.period,
            ..Self::default()
        };
        for i in 0..self.len() {
            if let Some(&prev) = current.timestamps.last() {
                if self.timestamps[i] - prev > step {
                    let next = Self {
                        period: self.period,
                        ..Self::default()
                    };
                    segments.push(std::mem::replace(&mut current, next));
                }
            }
            current.timestamps.push(self.timestamps[i]);
            current.object.push(self.object[i]);
            current.tip.push(self.tip[i]);
            current.wrench.push(self.wrench[i]);
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// Trim three resampled streams to their common interior and drop every
/// timestep with a missing value in any stream.
///
/// The interior is the open interval between the latest stream start and the
/// earliest stream end: both boundary timesteps are excluded. Trimming runs
/// before the missing-value drop. Streams must share one period; the object
/// stream's period is used.
pub fn align(
    object: &ResampledStream,
    tip: &ResampledStream,
    wrench: &ResampledStream,
) -> AlignedFrame {
    let mut frame = AlignedFrame {
        period: object.period,
        ..AlignedFrame::default()
    };
    let streams = [object, tip, wrench];
    let (Some(latest_start), Some(earliest_end)) = (
        streams.iter().map(|s| s.start).max(),
        streams.iter().filter_map(|s| s.end()).min(),
    ) else {
        return frame;
    };
    if streams.iter().any(|s| s.is_empty()) {
        return frame;
    }

    for t in object.timestamps() {
        if t <= latest_start || t >= earliest_end {
            continue;
        }
        if let (Some(o), Some(p), Some(w)) = (object.at(t), tip.at(t), wrench.at(t)) {
            frame.push(t, o, p, w);
        }
    }
    frame
}

/// Resample the three raw streams onto `period` and align them.
pub fn align_streams(
    object: &SensorStream,
    tip: &SensorStream,
    wrench: &SensorStream,
    period: Period,
) -> Result<AlignedFrame, DataError> {
    Ok(align(
        &resample(object, period)?,
        &resample(tip, period)?,
        &resample(wrench, period)?,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use pushstate_core::types::Sample;

    use super::*;

    const MS: i64 = 1_000_000;

    fn stream(kind: StreamKind, samples: &[(i64, f64)]) -> SensorStream {
        SensorStream::new(
            kind,
            samples
                .iter()
                .map(|&(ms, v)| Sample::new(Timestamp::from_nanos(ms * MS), [v, v * 2.0, -v]))
                .collect(),
        )
    }

    fn period() -> Period {
        Period::from_millis(10).unwrap()
    }

    #[test]
    fn resample_averages_within_bucket() {
        let s = stream(StreamKind::ObjectPose, &[(0, 1.0), (4, 3.0), (12, 5.0)]);
        let r = resample(&s, period()).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.values[0], Some([2.0, 4.0, -2.0]));
        assert_eq!(r.values[1], Some([5.0, 10.0, -5.0]));
    }

    #[test]
    fn resample_leaves_empty_buckets_missing() {
        let s = stream(StreamKind::TipPose, &[(0, 1.0), (35, 2.0)]);
        let r = resample(&s, period()).unwrap();
        assert_eq!(r.len(), 4);
        assert_eq!(r.values[1], None);
        assert_eq!(r.values[2], None);
        assert_eq!(r.end(), Some(Timestamp::from_nanos(30 * MS)));
    }

    #[test]
    fn resample_on_grid_is_identity() {
        let samples: Vec<(i64, f64)> = (0..20).map(|i| (i * 10, f64::from(i as i32) * 0.37)).collect();
        let s = stream(StreamKind::FtWrench, &samples);
        let r = resample(&s, period()).unwrap();
        assert_eq!(r.len(), samples.len());
        for (bucket, sample) in r.values.iter().zip(&s.samples) {
            let v = bucket.unwrap();
            for k in 0..3 {
                assert_relative_eq!(v[k], sample.values[k]);
            }
        }
        for (t, sample) in r.timestamps().zip(&s.samples) {
            assert_eq!(t, sample.time);
        }
    }

    #[test]
    fn resample_empty_stream() {
        let s = SensorStream::new(StreamKind::ObjectPose, Vec::new());
        let r = resample(&s, period()).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.end(), None);
    }

    #[test]
    fn resample_rejects_unrepresentable_times() {
        let mut s = stream(StreamKind::ObjectPose, &[(0, 1.0), (10, 2.0)]);
        s.samples.push(Sample::new(Timestamp::from_secs(-1e300), [0.0; 3]));
        assert!(matches!(
            resample(&s, period()),
            Err(DataError::InvalidTimestamps { .. })
        ));
    }

    #[test]
    fn resample_rejects_oversized_grid() {
        // One sample a day apart needs 8.64 million 10 ms buckets.
        let s = stream(StreamKind::TipPose, &[(0, 1.0), (86_400_000, 2.0)]);
        assert!(matches!(
            resample(&s, period()),
            Err(DataError::InvalidTimestamps { .. })
        ));
    }

    #[test]
    fn align_streams_fails_on_bad_stream() {
        let good: Vec<(i64, f64)> = (0..5).map(|i| (i * 10, 1.0)).collect();
        let mut bad = stream(StreamKind::FtWrench, &good);
        bad.samples.push(Sample::new(Timestamp::from_secs(1e300), [0.0; 3]));
        let result = align_streams(
            &stream(StreamKind::ObjectPose, &good),
            &stream(StreamKind::TipPose, &good),
            &bad,
            period(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn at_off_grid_is_none() {
        let s = stream(StreamKind::ObjectPose, &[(0, 1.0), (10, 2.0)]);
        let r = resample(&s, period()).unwrap();
        assert_eq!(r.at(Timestamp::from_nanos(5 * MS)), None);
        assert_eq!(r.at(Timestamp::from_nanos(-10 * MS)), None);
        assert_eq!(r.at(Timestamp::from_nanos(10 * MS)), Some([2.0, 4.0, -2.0]));
    }

    #[test]
    fn align_excludes_both_boundaries() {
        let full: Vec<(i64, f64)> = (0..10).map(|i| (i * 10, 1.0)).collect();
        let late: Vec<(i64, f64)> = (2..10).map(|i| (i * 10, 1.0)).collect();
        let early: Vec<(i64, f64)> = (0..7).map(|i| (i * 10, 1.0)).collect();
        let frame = align_streams(
            &stream(StreamKind::ObjectPose, &full),
            &stream(StreamKind::TipPose, &late),
            &stream(StreamKind::FtWrench, &early),
            period(),
        )
        .unwrap();
        // latest start 20ms, earliest end 60ms: keep 30, 40, 50.
        let kept: Vec<i64> = frame.timestamps.iter().map(|t| t.nanos() / MS).collect();
        assert_eq!(kept, vec![30, 40, 50]);
        assert_eq!(frame.object.len(), 3);
        assert_eq!(frame.tip.len(), 3);
        assert_eq!(frame.wrench.len(), 3);
    }

    #[test]
    fn align_drops_missing_from_all_streams() {
        let full: Vec<(i64, f64)> = (0..8).map(|i| (i * 10, 1.0)).collect();
        let holed: Vec<(i64, f64)> = (0..8).filter(|&i| i != 3).map(|i| (i * 10, 1.0)).collect();
        let frame = align_streams(
            &stream(StreamKind::ObjectPose, &full),
            &stream(StreamKind::TipPose, &holed),
            &stream(StreamKind::FtWrench, &full),
            period(),
        )
        .unwrap();
        let kept: Vec<i64> = frame.timestamps.iter().map(|t| t.nanos() / MS).collect();
        assert_eq!(kept, vec![10, 20, 40, 50, 60]);
    }

    #[test]
    fn align_disjoint_ranges_is_empty() {
        let a: Vec<(i64, f64)> = (0..5).map(|i| (i * 10, 1.0)).collect();
        let b: Vec<(i64, f64)> = (10..15).map(|i| (i * 10, 1.0)).collect();
        let frame = align_streams(
            &stream(StreamKind::ObjectPose, &a),
            &stream(StreamKind::TipPose, &b),
            &stream(StreamKind::FtWrench, &a),
            period(),
        )
        .unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn align_with_empty_stream_is_empty() {
        let a: Vec<(i64, f64)> = (0..5).map(|i| (i * 10, 1.0)).collect();
        let frame = align_streams(
            &stream(StreamKind::ObjectPose, &a),
            &stream(StreamKind::TipPose, &[]),
            &stream(StreamKind::FtWrench, &a),
            period(),
        )
        .unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn split_on_gaps_segments() {
        let full: Vec<(i64, f64)> = (0..12).map(|i| (i * 10, 1.0)).collect();
        let holed: Vec<(i64, f64)> = (0..12).filter(|&i| i != 5).map(|i| (i * 10, 1.0)).collect();
        let frame = align_streams(
            &stream(StreamKind::ObjectPose, &full),
            &stream(StreamKind::TipPose, &holed),
            &stream(StreamKind::FtWrench, &full),
            period(),
        )
        .unwrap();
        let segments = frame.split_on_gaps();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 4); // 10..40
        assert_eq!(segments[1].len(), 5); // 60..100
        assert!(AlignedFrame::default().split_on_gaps().is_empty());
    }
}
