//! Module containing functionality related to BSON binary values.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{Error, Result};

const UUID_LENGTH: usize = 16;

/// The subtype of a BSON binary value.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum BinarySubtype {
    Generic,
    Function,
    BinaryOld,
    UuidOld,
    Uuid,
    Md5,
    Encrypted,
    Column,
    Sensitive,
    Vector,
    UserDefined(u8),
    Reserved(u8),
}

impl From<BinarySubtype> for u8 {
    fn from(subtype: BinarySubtype) -> u8 {
        match subtype {
            BinarySubtype::Generic => 0x00,
            BinarySubtype::Function => 0x01,
            BinarySubtype::BinaryOld => 0x02,
            BinarySubtype::UuidOld => 0x03,
            BinarySubtype::Uuid => 0x04,
            BinarySubtype::Md5 => 0x05,
            BinarySubtype::Encrypted => 0x06,
            BinarySubtype::Column => 0x07,
            BinarySubtype::Sensitive => 0x08,
            BinarySubtype::Vector => 0x09,
            BinarySubtype::UserDefined(x) => x,
            BinarySubtype::Reserved(x) => x,
        }
    }
}

impl From<u8> for BinarySubtype {
    fn from(t: u8) -> BinarySubtype {
        match t {
            0x00 => BinarySubtype::Generic,
            0x01 => BinarySubtype::Function,
            0x02 => BinarySubtype::BinaryOld,
            0x03 => BinarySubtype::UuidOld,
            0x04 => BinarySubtype::Uuid,
            0x05 => BinarySubtype::Md5,
            0x06 => BinarySubtype::Encrypted,
            0x07 => BinarySubtype::Column,
            0x08 => BinarySubtype::Sensitive,
            0x09 => BinarySubtype::Vector,
            _ if t < 0x80 => BinarySubtype::Reserved(t),
            _ => BinarySubtype::UserDefined(t),
        }
    }
}

impl BinarySubtype {
    /// The named variant for this subtype's byte, so `Reserved(0x04)` becomes `Uuid`.
    fn canonical(self) -> Self {
        Self::from(u8::from(self))
    }

    fn is_uuid(self) -> bool {
        matches!(u8::from(self), 0x03 | 0x04)
    }
}

/// Represents a BSON binary value.
///
/// UUID subtypes are validated on construction: their payload must be exactly 16 bytes. Subtypes
/// are stored by their byte value, so two values with the same subtype byte and payload are equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Binary {
    subtype: BinarySubtype,
    bytes: Vec<u8>,
}

impl Binary {
    /// Creates a new binary value, rejecting UUID subtypes whose payload is not 16 bytes.
    pub fn new(bytes: impl Into<Vec<u8>>, subtype: BinarySubtype) -> Result<Self> {
        let bytes = bytes.into();
        let subtype = subtype.canonical();
        if subtype.is_uuid() && bytes.len() != UUID_LENGTH {
            return Err(Error::invalid_argument(format!(
                "binary values with subtype {:?} must be {} bytes long, got {}",
                subtype,
                UUID_LENGTH,
                bytes.len()
            )));
        }
        Ok(Self { subtype, bytes })
    }

    /// Creates a generic binary value.
    pub fn generic(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            subtype: BinarySubtype::Generic,
            bytes: bytes.into(),
        }
    }

    /// Creates a binary value with the [`BinarySubtype::Uuid`] subtype.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self {
            subtype: BinarySubtype::Uuid,
            bytes: uuid.as_bytes().to_vec(),
        }
    }

    /// Creates a binary value from a base64 string and a subtype.
    pub fn from_base64(input: impl AsRef<str>, subtype: impl Into<Option<BinarySubtype>>) -> Result<Self> {
        let bytes = STANDARD
            .decode(input.as_ref())
            .map_err(|e| Error::invalid_argument(format!("invalid base64 binary payload: {e}")))?;
        Self::new(bytes, subtype.into().unwrap_or(BinarySubtype::Generic))
    }

    /// The subtype of this value.
    pub fn subtype(&self) -> BinarySubtype {
        self.subtype
    }

    /// The payload of this value.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes this value, returning the payload.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Interprets this value as a UUID if it has a UUID subtype.
    pub fn to_uuid(&self) -> Option<uuid::Uuid> {
        if !self.subtype.is_uuid() {
            return None;
        }
        uuid::Uuid::from_slice(&self.bytes).ok()
    }

    pub(crate) fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl fmt::Debug for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binary")
            .field("subtype", &format_args!("{:#04x}", u8::from(self.subtype)))
            .field("base64", &self.to_base64())
            .finish()
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Binary({:#04x}, {})",
            u8::from(self.subtype),
            self.to_base64()
        )
    }
}
