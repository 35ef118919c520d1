//! Skeleton-frame recording and playback.
//!
//! A frame log captures a tracking session so the retargeting engine
//! can be exercised without a live tracker.
//!
//! # File format
//!
//! ```text
//! ┌───────────────┬──────────────┬──────────────────────────────┐
//! │ Magic (4 B)   │ Version (2 B)│ Records...                   │
//! │ "CFLG"        │ u16 LE       │ u32 LE length + postcard     │
//! └───────────────┴──────────────┴──────────────────────────────┘
//! ```
//!
//! Each record is a postcard-encoded [`FrameRecord`]: a timestamp in
//! microseconds plus one [`SkeletonFrame`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::SkeletonFrame;

/// Magic bytes at the start of a frame log.
pub const FRAME_LOG_MAGIC: [u8; 4] = *b"CFLG";

/// Current frame log format version.
pub const FRAME_LOG_VERSION: u16 = 1;

/// Frame log errors.
#[derive(Error, Debug)]
pub enum FrameLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialize(String),

    #[error("invalid frame log: {0}")]
    InvalidFormat(String),
}

impl From<postcard::Error> for FrameLogError {
    fn from(e: postcard::Error) -> Self {
        FrameLogError::Serialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FrameLogError>;

/// One recorded tracking frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Capture time in microseconds since the session epoch
    pub timestamp_us: u64,
    /// The tracked points
    pub frame: SkeletonFrame,
}

/// Writes skeleton frames to a log file.
pub struct FrameLogRecorder {
    writer: BufWriter<File>,
    frames_written: u64,
}

impl FrameLogRecorder {
    /// Create a new frame log, truncating any existing file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&FRAME_LOG_MAGIC)?;
        writer.write_all(&FRAME_LOG_VERSION.to_le_bytes())?;
        Ok(Self {
            writer,
            frames_written: 0,
        })
    }

    /// Append one frame record.
    pub fn record(&mut self, record: &FrameRecord) -> Result<()> {
        let payload = postcard::to_allocvec(record)?;
        self.writer.write_all(&(payload.len() as u32).to_le_bytes())?;
        self.writer.write_all(&payload)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Flush buffered records to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads skeleton frames back from a log file.
///
/// Supports immediate playback (as fast as possible) via [`next`] and
/// real-time playback with a speed multiplier via [`next_paced`].
///
/// [`next`]: FrameLogPlayer::next
/// [`next_paced`]: FrameLogPlayer::next_paced
pub struct FrameLogPlayer {
    reader: BufReader<File>,
    frames_read: u64,
    /// Wall-clock start of paced playback
    playback_start: Option<Instant>,
    /// Timestamp of the first record, pacing reference
    first_timestamp_us: Option<u64>,
}

impl FrameLogPlayer {
    /// Open a frame log and validate its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != FRAME_LOG_MAGIC {
            return Err(FrameLogError::InvalidFormat(format!(
                "bad magic {:02x?}",
                magic
            )));
        }
        let mut version = [0u8; 2];
        reader.read_exact(&mut version)?;
        let version = u16::from_le_bytes(version);
        if version != FRAME_LOG_VERSION {
            return Err(FrameLogError::InvalidFormat(format!(
                "unsupported version {}",
                version
            )));
        }

        Ok(Self {
            reader,
            frames_read: 0,
            playback_start: None,
            first_timestamp_us: None,
        })
    }

    /// Read the next record, or `None` at end of log.
    pub fn next(&mut self) -> Result<Option<FrameRecord>> {
        let mut len = [0u8; 4];
        match self.reader.read_exact(&mut len) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let len = u32::from_le_bytes(len) as usize;
        let mut payload = vec![0u8; len];
        self.reader.read_exact(&mut payload)?;
        let record: FrameRecord = postcard::from_bytes(&payload)?;
        self.frames_read += 1;
        Ok(Some(record))
    }

    /// Read the next record, sleeping until its timestamp is due
    /// relative to the first record. `speed` is a playback multiplier
    /// (1.0 = real time, 2.0 = twice as fast).
    pub fn next_paced(&mut self, speed: f32) -> Result<Option<FrameRecord>> {
        let record = match self.next()? {
            Some(r) => r,
            None => return Ok(None),
        };

        let start = *self.playback_start.get_or_insert_with(Instant::now);
        let first_us = *self.first_timestamp_us.get_or_insert(record.timestamp_us);

        let elapsed_us = record.timestamp_us.saturating_sub(first_us);
        let due = Duration::from_micros((elapsed_us as f32 / speed.max(0.01)) as u64);
        let elapsed = start.elapsed();
        if due > elapsed {
            std::thread::sleep(due - elapsed);
        }
        Ok(Some(record))
    }

    /// Number of frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}
