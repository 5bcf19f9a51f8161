//! C-ABI wrapper around `voipms-core`.
//!
//! # Overview
//! Exposes request building and response interpretation for every voip.ms
//! method through `extern "C"` functions. The host performs the GET itself,
//! so nothing here links an HTTP stack or an async runtime.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Methods are addressed by name and parameters passed as a JSON object,
//!   mirroring the untyped `build_request` / `parse_response` core API.
//! - A single `FfiResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `voipms_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use voipms_core::{ApiError, Credential, Params, VoipMsClient};

use types::*;

/// Borrow a C string argument as UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn str_arg<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, *mut FfiResult> {
    if ptr.is_null() {
        return Err(FfiResult::null_arg(name));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiResult::invalid_utf8(name))
}

/// Like `str_arg`, for constructors that can only report failure as null.
unsafe fn opt_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for the production endpoint.
///
/// Returns null if either argument is null or not UTF-8, or if an internal
/// panic occurs. The caller must free the result with `voipms_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn voipms_client_new(
    username: *const c_char,
    password: *const c_char,
) -> *mut FfiVoipMsClient {
    catch_unwind(|| {
        let (Some(username), Some(password)) =
            (unsafe { opt_str(username) }, unsafe { opt_str(password) })
        else {
            return std::ptr::null_mut();
        };
        let client = VoipMsClient::new(Credential::new(username, password));
        Box::into_raw(Box::new(FfiVoipMsClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client for a custom endpoint, e.g. a local mock.
///
/// Same contract as `voipms_client_new`.
#[unsafe(no_mangle)]
pub extern "C" fn voipms_client_new_with_base_url(
    base_url: *const c_char,
    username: *const c_char,
    password: *const c_char,
) -> *mut FfiVoipMsClient {
    catch_unwind(|| {
        let (Some(base_url), Some(username), Some(password)) = (
            unsafe { opt_str(base_url) },
            unsafe { opt_str(username) },
            unsafe { opt_str(password) },
        ) else {
            return std::ptr::null_mut();
        };
        let client = VoipMsClient::with_base_url(base_url, Credential::new(username, password));
        Box::into_raw(Box::new(FfiVoipMsClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `voipms_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn voipms_client_free(client: *mut FfiVoipMsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build / parse
// ---------------------------------------------------------------------------

/// Build the GET request for `method` with parameters from `params_json`,
/// a JSON object (`"{}"` for none).
///
/// Returns a result with `data_tag = Request` on success.
#[unsafe(no_mangle)]
pub extern "C" fn voipms_build_request(
    client: *const FfiVoipMsClient,
    method: *const c_char,
    params_json: *const c_char,
) -> *mut FfiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        let client = unsafe { &*client };
        let method = match unsafe { str_arg(method, "method") } {
            Ok(method) => method,
            Err(result) => return result,
        };
        let params_json = match unsafe { str_arg(params_json, "params_json") } {
            Ok(json) => json,
            Err(result) => return result,
        };

        let built = serde_json::from_str::<serde_json::Value>(params_json)
            .map_err(|e| ApiError::InvalidArgument(format!("params_json is not valid JSON: {e}")))
            .and_then(|value| Params::from_json(&value))
            .and_then(|params| client.inner.build_request(method, &params));
        match built {
            Ok(req) => FfiResult::ok_request(req),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in voipms_build_request"))
}

/// Interpret a raw response `body` for `method`.
///
/// Returns a result with `data_tag = Json` on success; the JSON text is the
/// extracted value (`null` for methods that return nothing).
#[unsafe(no_mangle)]
pub extern "C" fn voipms_parse_response(
    client: *const FfiVoipMsClient,
    method: *const c_char,
    body: *const c_char,
) -> *mut FfiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        let client = unsafe { &*client };
        let method = match unsafe { str_arg(method, "method") } {
            Ok(method) => method,
            Err(result) => return result,
        };
        if body.is_null() {
            return FfiResult::null_arg("body");
        }
        let body = unsafe { CStr::from_ptr(body) }.to_bytes();

        match client.inner.parse_response(method, body) {
            Ok(value) => FfiResult::ok_json(&value),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in voipms_parse_response"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiResult` returned by `voipms_build_request` or
/// `voipms_parse_response`. Safe to call with null. Uses `data_tag` to
/// determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn voipms_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.remote_status);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Request => {
                let req = unsafe { Box::from_raw(result.data as *mut FfiHttpRequest) };
                free_c_string(req.url);
                if !req.query.is_null() {
                    let pairs = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                            req.query,
                            req.query_len as usize,
                        ))
                    };
                    for pair in pairs.iter() {
                        free_c_string(pair.key);
                        free_c_string(pair.value);
                    }
                }
            }
            FfiDataTag::Json => free_c_string(result.data as *mut c_char),
            FfiDataTag::None => {}
        }
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn voipms_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
