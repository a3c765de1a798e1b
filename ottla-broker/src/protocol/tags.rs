use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("field metadata must start with a base-10 order, like \"0\" or \"3,compact\"")]
    InvalidOrder,
    #[error("minVersion must be written as minVersion=<non-negative integer>")]
    InvalidMinVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagOpts {
    pub order: i32,
    pub min_version: i16,
    pub compact: bool,
    pub nilable: bool,
    pub raw: bool,
}

impl FromStr for TagOpts {
    type Err = TagError;

    fn from_str(tag: &str) -> Result<Self, TagError> {
        let mut parts = tag.split(',');
        let order = parts
            .next()
            .and_then(|raw| raw.parse().ok())
            .ok_or(TagError::InvalidOrder)?;

        let mut opts = TagOpts {
            order,
            ..TagOpts::default()
        };

        for part in parts {
            match part.split_once('=') {
                Some(("minVersion", value)) => {
                    opts.min_version = value
                        .parse()
                        .ok()
                        .filter(|version| *version >= 0)
                        .ok_or(TagError::InvalidMinVersion)?;
                }
                None if part == "minVersion" => return Err(TagError::InvalidMinVersion),
                None if part == "compact" => opts.compact = true,
                None if part == "nilable" => opts.nilable = true,
                None if part == "raw" => opts.raw = true,
                // unknown options are ignored so old brokers can read new tags
                _ => {}
            }
        }

        Ok(opts)
    }
}
