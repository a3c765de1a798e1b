use std::io;

use bytes::BytesMut;
use thiserror::Error;

use crate::protocol::{layout::LayoutError, tags::TagOpts};

pub mod handlers;
pub mod layout;
pub mod messages;
pub mod primitives;
pub mod registry;
pub mod request;
pub mod response;
pub mod tags;
pub mod wire;

pub const API_VERSIONS: i16 = 18;
pub const DESCRIBE_TOPIC_PARTITIONS: i16 = 75;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("short read, {needed} more bytes required")]
    ShortRead { needed: usize },
    #[error("string field is not valid utf-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),
    #[error("length {0} does not fit the length prefix in force")]
    LengthOverflow(usize),
    #[error("wire length {got} exceeds fixed array capacity {capacity}")]
    FixedArrayOverflow { got: usize, capacity: usize },
    #[error("absent record in a field that is not marked nilable")]
    AbsentRecord,
    #[error("raw is only valid for fixed-length arrays")]
    RawVariableArray,
    #[error("unrecognized error code {0}")]
    UnknownErrorCode(i16),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("i/o: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecOpts {
    pub version: i16,
    pub compact: bool,
    pub nilable: bool,
    pub raw: bool,
}

impl CodecOpts {
    pub fn for_version(version: i16) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub(crate) fn for_field(&self, tag: &TagOpts) -> Self {
        Self {
            version: self.version,
            compact: tag.compact,
            nilable: tag.nilable,
            raw: tag.raw,
        }
    }
}

pub trait Encode {
    fn encode(&self, buf: &mut BytesMut, opts: &CodecOpts) -> Result<(), CodecError>;
}

pub trait Decode: Sized {
    fn decode(buf: &mut BytesMut, opts: &CodecOpts) -> Result<Self, CodecError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: i16,
    pub max: i16,
}

impl VersionRange {
    pub fn contains(&self, version: i16) -> bool {
        self.min <= version && version <= self.max
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum ErrorCode {
    UnknownServerError = -1,
    #[default]
    None = 0,
    UnknownTopic = 3,
    UnsupportedVersion = 35,
}

impl Encode for ErrorCode {
    fn encode(&self, buf: &mut BytesMut, opts: &CodecOpts) -> Result<(), CodecError> {
        (*self as i16).encode(buf, opts)
    }
}

impl Decode for ErrorCode {
    fn decode(buf: &mut BytesMut, opts: &CodecOpts) -> Result<Self, CodecError> {
        match i16::decode(buf, opts)? {
            -1 => Ok(Self::UnknownServerError),
            0 => Ok(Self::None),
            3 => Ok(Self::UnknownTopic),
            35 => Ok(Self::UnsupportedVersion),
            other => Err(CodecError::UnknownErrorCode(other)),
        }
    }
}
