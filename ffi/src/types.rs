//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Results cross the boundary in one envelope, `FfiResult`. Built requests
//! are exposed both as a ready-to-send URL and as the unencoded query pairs;
//! extracted response values are handed over as JSON text, since their shape
//! varies per method. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use voipms_core::{ApiError, HttpRequest, VoipMsClient};

/// Opaque handle to a `VoipMsClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiVoipMsClient {
    pub(crate) inner: VoipMsClient,
}

/// Copy `s` into a heap C string. Interior NULs are dropped rather than
/// failing the whole call.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let owned = CString::new(s).unwrap_or_else(|err| {
        let mut bytes = err.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    owned.into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// One query parameter, unencoded.
#[repr(C)]
pub struct FfiQueryPair {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A built GET request.
///
/// `url` is fully form-urlencoded and can be handed straight to an HTTP
/// library. `query` lists the same pairs before encoding, in wire order.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub query: *mut FfiQueryPair,
    pub query_len: u32,
}

/// `query_len` for a request with `len` pairs, if it fits the C field.
pub(crate) fn query_len(len: usize) -> Result<u32, String> {
    u32::try_from(len)
        .map_err(|_| format!("request has {len} query pairs, more than fit in query_len"))
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> Result<*mut Self, String> {
        let query_len = query_len(req.query.len())?;
        let url = c_string(req.url());
        let query = if req.query.is_empty() {
            std::ptr::null_mut()
        } else {
            let pairs: Box<[FfiQueryPair]> = req
                .query
                .into_iter()
                .map(|(key, value)| FfiQueryPair {
                    key: c_string(key),
                    value: c_string(value),
                })
                .collect();
            Box::into_raw(pairs) as *mut FfiQueryPair
        };
        Ok(Box::into_raw(Box::new(FfiHttpRequest {
            url,
            query,
            query_len,
        })))
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidArgument = 1,
    RemoteError = 2,
    MalformedResponse = 3,
    Panic = 4,
    NullArg = 5,
}

/// Tag that tells `voipms_free_result` what `FfiResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `data` is a `FfiHttpRequest*`.
    Request = 1,
    /// `data` is a NUL-terminated JSON document (`char*`).
    Json = 2,
}

/// Result envelope for every build and parse call.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag`. On failure `error_code`
/// gives the category, `error_message` a human-readable C string, and
/// `data` is null. `remote_status` is set only for `RemoteError` and holds
/// the service's `status` verbatim.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub remote_status: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    fn failure(error_code: FfiErrorCode, message: String) -> *mut Self {
        FfiResult {
            error_code,
            error_message: c_string(message),
            remote_status: std::ptr::null_mut(),
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    /// Build a success result carrying a built request.
    pub(crate) fn ok_request(req: HttpRequest) -> *mut Self {
        let data = match FfiHttpRequest::from_core(req) {
            Ok(data) => data,
            Err(message) => return FfiResult::failure(FfiErrorCode::InvalidArgument, message),
        };
        FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            remote_status: std::ptr::null_mut(),
            data_tag: FfiDataTag::Request,
            data: data as *mut c_void,
        }
        .boxed()
    }

    /// Build a success result carrying an extracted value as JSON text.
    pub(crate) fn ok_json(value: &serde_json::Value) -> *mut Self {
        FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            remote_status: std::ptr::null_mut(),
            data_tag: FfiDataTag::Json,
            data: c_string(value.to_string()) as *mut c_void,
        }
        .boxed()
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::InvalidArgument(_) => FfiErrorCode::InvalidArgument,
            ApiError::RemoteError(_) => FfiErrorCode::RemoteError,
            ApiError::MalformedResponse(_) => FfiErrorCode::MalformedResponse,
        };
        FfiResult {
            error_code: code,
            error_message: c_string(err.to_string()),
            remote_status: err
                .remote_status()
                .map(|status| c_string(status.to_string()))
                .unwrap_or(std::ptr::null_mut()),
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        FfiResult::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    /// Build an error result for a string argument that is not UTF-8.
    pub(crate) fn invalid_utf8(name: &str) -> *mut Self {
        FfiResult::failure(
            FfiErrorCode::InvalidArgument,
            format!("invalid argument: {name} is not valid UTF-8"),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        FfiResult::failure(FfiErrorCode::Panic, msg.to_string())
    }
}
