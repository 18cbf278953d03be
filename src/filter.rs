use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::ops::AddAssign;

use camino::Utf8Path;
use flate2::read::MultiGzDecoder;
use serde::Serialize;

use crate::error::SeqdbError;
use crate::header::is_header;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterState {
    Skipping,
    Copying,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub records_seen: u64,
    pub records_kept: u64,
    pub lines_written: u64,
}

impl AddAssign for FilterStats {
    fn add_assign(&mut self, other: Self) {
        self.records_seen += other.records_seen;
        self.records_kept += other.records_kept;
        self.lines_written += other.lines_written;
    }
}

#[derive(Debug)]
pub enum StreamError {
    Read(io::Error),
    Write(io::Error),
}

/// Copies every record whose header key passes `keep` from `reader` to `writer`.
///
/// Works line by line: a header line decides whether the record it opens is
/// copied or skipped, body lines follow that decision. Lines before the first
/// header are dropped. Lines are written byte for byte, terminators included.
pub fn filter_records<R, W, K, M>(
    mut reader: R,
    writer: &mut W,
    extract_key: K,
    keep: M,
) -> Result<FilterStats, StreamError>
where
    R: BufRead,
    W: Write,
    K: Fn(&str) -> Option<&str>,
    M: Fn(&str) -> bool,
{
    let mut stats = FilterStats::default();
    let mut state = FilterState::Skipping;
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line).map_err(StreamError::Read)?;
        if read == 0 {
            break;
        }

        if is_header(&line) {
            stats.records_seen += 1;
            let text = String::from_utf8_lossy(&line);
            state = match extract_key(&*text) {
                Some(key) if keep(key) => FilterState::Copying,
                _ => FilterState::Skipping,
            };
            if state == FilterState::Copying {
                stats.records_kept += 1;
            }
        }

        if state == FilterState::Copying {
            writer.write_all(&line).map_err(StreamError::Write)?;
            stats.lines_written += 1;
        }
    }

    Ok(stats)
}

/// Streams `source` into `destination`, appending kept records.
///
/// The destination is created if missing and is closed when this returns,
/// on success or error.
pub fn filter_file<K, M>(
    source: &Utf8Path,
    destination: &Utf8Path,
    extract_key: K,
    keep: M,
) -> Result<FilterStats, SeqdbError>
where
    K: Fn(&str) -> Option<&str>,
    M: Fn(&str) -> bool,
{
    let reader = open_source(source)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(destination.as_std_path())
        .map_err(|err| output_error(destination, err))?;
    let mut writer = BufWriter::new(file);

    let stats = filter_records(reader, &mut writer, extract_key, keep).map_err(|err| match err {
        StreamError::Read(err) => SeqdbError::SourceRead {
            path: source.to_string(),
            message: err.to_string(),
        },
        StreamError::Write(err) => output_error(destination, err),
    })?;
    writer.flush().map_err(|err| output_error(destination, err))?;

    tracing::debug!(
        source = %source,
        destination = %destination,
        seen = stats.records_seen,
        kept = stats.records_kept,
        "filtered records"
    );
    Ok(stats)
}

pub fn open_source(path: &Utf8Path) -> Result<Box<dyn BufRead>, SeqdbError> {
    let file = File::open(path.as_std_path()).map_err(|err| SeqdbError::SourceRead {
        path: path.to_string(),
        message: err.to_string(),
    })?;
    if path.extension() == Some("gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn output_error(path: &Utf8Path, err: io::Error) -> SeqdbError {
    SeqdbError::OutputWrite {
        path: path.to_string(),
        message: err.to_string(),
    }
}
