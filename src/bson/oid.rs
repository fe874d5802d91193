//! Module containing functionality related to BSON ObjectIds.

use std::{
    fmt,
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        LazyLock,
    },
    time::SystemTime,
};

use crate::{
    bson::DateTime,
    error::{Error, Result},
};

const TIMESTAMP_SIZE: usize = 4;
const PROCESS_ID_SIZE: usize = 5;
const COUNTER_SIZE: usize = 3;

const TIMESTAMP_OFFSET: usize = 0;
const PROCESS_ID_OFFSET: usize = TIMESTAMP_OFFSET + TIMESTAMP_SIZE;
const COUNTER_OFFSET: usize = PROCESS_ID_OFFSET + PROCESS_ID_SIZE;

const MAX_U24: usize = 0xFF_FFFF;

static OID_COUNTER: LazyLock<AtomicUsize> =
    LazyLock::new(|| AtomicUsize::new(rand::random_range(0..=MAX_U24)));

static PROCESS_UNIQUE: LazyLock<[u8; PROCESS_ID_SIZE]> = LazyLock::new(rand::random);

/// A wrapper around a raw 12-byte ObjectId.
///
/// The first 4 bytes are the big-endian creation time in seconds since the Unix epoch, followed
/// by 5 bytes that are unique to the generating process and a 3-byte big-endian counter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    id: [u8; 12],
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectId {
    /// Generates a new [`ObjectId`], represented in bytes.
    /// See the [docs](http://www.mongodb.com/docs/manual/reference/object-id/)
    /// for more information.
    pub fn new() -> ObjectId {
        let timestamp = Self::gen_timestamp();
        let counter = Self::gen_count();

        let mut buf: [u8; 12] = [0; 12];
        buf[TIMESTAMP_OFFSET..PROCESS_ID_OFFSET].copy_from_slice(&timestamp);
        buf[PROCESS_ID_OFFSET..COUNTER_OFFSET].copy_from_slice(&*PROCESS_UNIQUE);
        buf[COUNTER_OFFSET..].copy_from_slice(&counter);

        Self::from_bytes(buf)
    }

    /// Constructs a new ObjectId wrapper around the raw byte representation.
    pub const fn from_bytes(bytes: [u8; 12]) -> ObjectId {
        ObjectId { id: bytes }
    }

    /// Creates an ObjectId using a 12-byte (24-char) hexadecimal string.
    pub fn parse_str(s: impl AsRef<str>) -> Result<ObjectId> {
        let s = s.as_ref();
        let bytes = hex::decode(s.as_bytes()).map_err(|e| {
            Error::invalid_argument(format!("invalid ObjectId hex string {s:?}: {e}"))
        })?;
        Self::try_from(bytes.as_slice())
    }

    /// Retrieves the timestamp from an [`ObjectId`] as a count of seconds since the Unix epoch.
    pub fn timestamp_secs(&self) -> u32 {
        let mut buf = [0; TIMESTAMP_SIZE];
        buf.copy_from_slice(&self.id[TIMESTAMP_OFFSET..PROCESS_ID_OFFSET]);
        u32::from_be_bytes(buf)
    }

    /// Retrieves the timestamp from an [`ObjectId`] as a [`DateTime`].
    pub fn timestamp(&self) -> DateTime {
        DateTime::from_millis(i64::from(self.timestamp_secs()) * 1000)
    }

    /// Returns the raw byte representation of an ObjectId.
    pub const fn bytes(&self) -> [u8; 12] {
        self.id
    }

    /// Convert this [`ObjectId`] to its hex string representation.
    pub fn to_hex(self) -> String {
        hex::encode(self.id)
    }

    fn gen_timestamp() -> [u8; TIMESTAMP_SIZE] {
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        // Wraps in 2106.
        ((secs & 0xFFFF_FFFF) as u32).to_be_bytes()
    }

    fn gen_count() -> [u8; COUNTER_SIZE] {
        let count = OID_COUNTER.fetch_add(1, Ordering::SeqCst) & MAX_U24;
        let bytes = (count as u32).to_be_bytes();
        [bytes[1], bytes[2], bytes[3]]
    }
}

impl TryFrom<&[u8]> for ObjectId {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let id: [u8; 12] = bytes.try_into().map_err(|_| {
            Error::invalid_argument(format!(
                "an ObjectId must be exactly 12 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(id))
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(bytes: [u8; 12]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.to_hex()).finish()
    }
}
