// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DDS standard return codes (DDS v1.4 section 2.2.1.1).

use super::{Error, Result};
use std::fmt;

/// Standard DDS return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ReturnCode {
    Ok = 0,
    Error = 1,
    Unsupported = 2,
    BadParameter = 3,
    PreconditionNotMet = 4,
    OutOfResources = 5,
    NotEnabled = 6,
    ImmutablePolicy = 7,
    InconsistentPolicy = 8,
    AlreadyDeleted = 9,
    Timeout = 10,
    NoData = 11,
    IllegalOperation = 12,
}

impl ReturnCode {
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    pub const fn from_i32(value: i32) -> Option<Self> {
        Some(match value {
            0 => ReturnCode::Ok,
            1 => ReturnCode::Error,
            2 => ReturnCode::Unsupported,
            3 => ReturnCode::BadParameter,
            4 => ReturnCode::PreconditionNotMet,
            5 => ReturnCode::OutOfResources,
            6 => ReturnCode::NotEnabled,
            7 => ReturnCode::ImmutablePolicy,
            8 => ReturnCode::InconsistentPolicy,
            9 => ReturnCode::AlreadyDeleted,
            10 => ReturnCode::Timeout,
            11 => ReturnCode::NoData,
            12 => ReturnCode::IllegalOperation,
            _ => return None,
        })
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, ReturnCode::Ok)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ReturnCode::Ok => "RETCODE_OK",
            ReturnCode::Error => "RETCODE_ERROR",
            ReturnCode::Unsupported => "RETCODE_UNSUPPORTED",
            ReturnCode::BadParameter => "RETCODE_BAD_PARAMETER",
            ReturnCode::PreconditionNotMet => "RETCODE_PRECONDITION_NOT_MET",
            ReturnCode::OutOfResources => "RETCODE_OUT_OF_RESOURCES",
            ReturnCode::NotEnabled => "RETCODE_NOT_ENABLED",
            ReturnCode::ImmutablePolicy => "RETCODE_IMMUTABLE_POLICY",
            ReturnCode::InconsistentPolicy => "RETCODE_INCONSISTENT_POLICY",
            ReturnCode::AlreadyDeleted => "RETCODE_ALREADY_DELETED",
            ReturnCode::Timeout => "RETCODE_TIMEOUT",
            ReturnCode::NoData => "RETCODE_NO_DATA",
            ReturnCode::IllegalOperation => "RETCODE_ILLEGAL_OPERATION",
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<bool> for ReturnCode {
    /// Plugin hooks report success as a flag.
    fn from(ok: bool) -> Self {
        if ok {
            ReturnCode::Ok
        } else {
            ReturnCode::Error
        }
    }
}

/// Turn a non-OK return code into `Error::ReturnCode` carrying `context`.
pub fn check_return_code(code: ReturnCode, context: &str) -> Result<()> {
    if code.is_ok() {
        return Ok(());
    }
    log::debug!("[retcode] {}: {}", context, code);
    Err(Error::ReturnCode {
        code,
        context: context.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_match_dds() {
        assert_eq!(ReturnCode::Ok.as_i32(), 0);
        assert_eq!(ReturnCode::PreconditionNotMet.as_i32(), 4);
        assert_eq!(ReturnCode::IllegalOperation.as_i32(), 12);
        for v in 0..=12 {
            assert_eq!(ReturnCode::from_i32(v).map(ReturnCode::as_i32), Some(v));
        }
        assert_eq!(ReturnCode::from_i32(13), None);
    }

    #[test]
    fn test_check_return_code() {
        assert!(check_return_code(ReturnCode::Ok, "unused").is_ok());

        let err = check_return_code(ReturnCode::from(false), "Failed to copy cdr buffer")
            .expect_err("non-OK code");
        match &err {
            Error::ReturnCode { code, context } => {
                assert_eq!(*code, ReturnCode::Error);
                assert_eq!(context, "Failed to copy cdr buffer");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.to_string(), "Failed to copy cdr buffer (RETCODE_ERROR)");
    }
}
