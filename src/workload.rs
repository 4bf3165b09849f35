use crate::backend::BackendFormat;
use crate::errors::{BenchlensError, BenchlensResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Upper bound (inclusive) for the random field of a query record.
pub const QUERY_VALUE_MAX: u64 = 100;

/// The draw sequence is reproducible for a given seed; without one the
/// generator is seeded from entropy.
fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Emit the query stream for one backend: the query header, then one record
/// per timestamp in the inclusive range, each paired with a uniform draw from
/// `0..=QUERY_VALUE_MAX`.
///
/// The destination is created (truncating previous content), written
/// sequentially and flushed before returning. An inverted range writes the
/// header and no records. Returns the record count, `hi - lo + 1`,
/// saturating at `u64::MAX` for the full-width range.
pub fn generate_query_list(
    format: &dyn BackendFormat,
    timestamp_range: (u64, u64),
    path: &Path,
    seed: Option<u64>,
) -> BenchlensResult<u64> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut rng = rng_for(seed);
    let count = write_query_stream(format, timestamp_range, &mut out, &mut rng)?;
    out.flush()?;
    Ok(count)
}

/// Query stream body, generic over the sink for tests and benches.
pub fn write_query_stream<W: Write>(
    format: &dyn BackendFormat,
    (lo, hi): (u64, u64),
    out: &mut W,
    rng: &mut impl Rng,
) -> BenchlensResult<u64> {
    out.write_all(format.query_header().as_bytes())?;
    let mut count: u64 = 0;
    for timestamp in lo..=hi {
        let value = rng.gen_range(0..=QUERY_VALUE_MAX);
        out.write_all(format.query_record(timestamp, value).as_bytes())?;
        count = count.saturating_add(1);
    }
    Ok(count)
}

/// Emit the write stream for one backend: the write header, then exactly `n`
/// records.
///
/// Each record's pair is `(min(a, b), max(a, b))` for two independent uniform
/// draws from the inclusive timestamp range, so the left field never exceeds
/// the right one and both stay inside the range. Precondition: `lo <= hi`
/// whenever `n > 0`; the range is not validated here.
pub fn generate_write_list(
    format: &dyn BackendFormat,
    timestamp_range: (u64, u64),
    path: &Path,
    n: u64,
    seed: Option<u64>,
) -> BenchlensResult<u64> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut rng = rng_for(seed);
    let count = write_write_stream(format, timestamp_range, &mut out, n, &mut rng)?;
    out.flush()?;
    Ok(count)
}

/// Write stream body, generic over the sink for tests and benches.
pub fn write_write_stream<W: Write>(
    format: &dyn BackendFormat,
    (lo, hi): (u64, u64),
    out: &mut W,
    n: u64,
    rng: &mut impl Rng,
) -> BenchlensResult<u64> {
    out.write_all(format.write_header().as_bytes())?;
    for _ in 0..n {
        let a = rng.gen_range(lo..=hi);
        let b = rng.gen_range(lo..=hi);
        out.write_all(format.write_record(a.min(b), a.max(b)).as_bytes())?;
    }
    Ok(n)
}

/// Summary of one verified stream.
#[derive(Debug, PartialEq, Eq)]
pub struct StreamSummary {
    pub columns: usize,
    pub records: u64,
}

/// Re-read an emitted stream and verify its structural consistency: every
/// record must carry as many fields as the header has columns.
pub fn check_stream(path: &Path, delimiter: u8) -> BenchlensResult<StreamSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    let columns = reader.headers()?.len();
    let mut records = 0;
    for record in reader.records() {
        let record = record?;
        records += 1;
        if record.len() != columns {
            return Err(BenchlensError::InconsistentColumns {
                record: records,
                expected: columns,
                found: record.len(),
            });
        }
    }
    Ok(StreamSummary { columns, records })
}
