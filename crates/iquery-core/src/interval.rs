//! Offset/limit window.
//!
//! The public setters speak the signed convention (`limit == -1` is
//! unbounded) and reject out-of-range values up front; internally the window
//! is stored unsigned so no later code has to re-check it.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Interval {
    offset: usize,
    /// `None` means unbounded.
    limit: Option<usize>,
}

impl Interval {
    /// `{offset: 0, limit: -1}`: the window that lets everything through.
    pub const UNBOUNDED: Interval = Interval {
        offset: 0,
        limit: None,
    };

    pub fn new(offset: i64, limit: i64) -> Result<Self> {
        Ok(Self {
            offset: Self::checked_offset(offset)?,
            limit: Self::checked_limit(limit)?,
        })
    }

    /// Validate an offset: must be `>= 0`.
    pub fn checked_offset(offset: i64) -> Result<usize> {
        usize::try_from(offset).map_err(|_| {
            QueryError::InvalidArgument(format!(
                "the offset must be a positive integer or 0, got {offset}"
            ))
        })
    }

    /// Validate a limit: must be `>= -1`, where `-1` maps to `None`.
    pub fn checked_limit(limit: i64) -> Result<Option<usize>> {
        if limit == -1 {
            return Ok(None);
        }
        usize::try_from(limit).map(Some).map_err(|_| {
            QueryError::InvalidArgument(format!(
                "the limit must be an integer greater or equal to -1, got {limit}"
            ))
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.offset == 0 && self.limit.is_none()
    }

    /// Number of elements the window keeps out of `len` input elements.
    #[cfg(test)]
    fn window_len(&self, len: usize) -> usize {
        let remaining = len.saturating_sub(self.offset);
        match self.limit {
            Some(limit) => remaining.min(limit),
            None => remaining,
        }
    }
}

/// Wire form: the same signed convention the setters accept.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct RawInterval {
    offset: i64,
    limit: i64,
}

impl Default for RawInterval {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: -1,
        }
    }
}

impl TryFrom<RawInterval> for Interval {
    type Error = QueryError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.offset, raw.limit)
    }
}

impl From<Interval> for RawInterval {
    fn from(iv: Interval) -> Self {
        let signed = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        Self {
            offset: signed(iv.offset),
            limit: iv.limit.map_or(-1, signed),
        }
    }
}
