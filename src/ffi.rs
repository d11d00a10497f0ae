//! C-ABI Foreign Function Interface for word2backlog.
//!
//! # Memory Management
//!
//! All strings returned by this library must be freed using `w2b_free_string`.
//!
//! # Error Handling
//!
//! Functions that can fail return a null pointer on error. Use `w2b_last_error`
//! to retrieve the error message.
//!
//! # Example (C)
//!
//! ```c
//! #include <stdio.h>
//! #include "word2backlog.h"
//!
//! int main() {
//!     char* json = w2b_convert_file("backlog.docx", W2B_FLAG_COMPACT);
//!     if (!json) {
//!         fprintf(stderr, "Error: %s\n", w2b_last_error());
//!         return 1;
//!     }
//!     printf("%s\n", json);
//!     w2b_free_string(json);
//!     return 0;
//! }
//! ```

use std::cell::RefCell;
use std::ffi::{c_char, c_int, CStr, CString};
use std::panic::catch_unwind;
use std::ptr;

use crate::options::{ConvertOptions, LineEnding};
use crate::render::JsonFormat;

// Thread-local storage for the last error message.
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Emit single-line JSON.
pub const W2B_FLAG_COMPACT: c_int = 1;
/// Terminate content lines with CRLF.
pub const W2B_FLAG_CRLF: c_int = 2;
/// Always emit the implicit leading item.
pub const W2B_FLAG_KEEP_EMPTY_PREAMBLE: c_int = 4;

fn options_from_flags(flags: c_int) -> ConvertOptions {
    let mut options = ConvertOptions::new();
    if flags & W2B_FLAG_COMPACT != 0 {
        options.json_format = JsonFormat::Compact;
    }
    if flags & W2B_FLAG_CRLF != 0 {
        options.line_ending = LineEnding::CrLf;
    }
    if flags & W2B_FLAG_KEEP_EMPTY_PREAMBLE != 0 {
        options.keep_empty_preamble = true;
    }
    options
}

/// Turn a conversion result into an owned C string or a recorded error.
fn into_c_string(result: std::thread::Result<Result<String, String>>) -> *mut c_char {
    match result {
        Ok(Ok(json)) => match CString::new(json) {
            Ok(s) => s.into_raw(),
            Err(_) => {
                set_last_error("output contains null byte");
                ptr::null_mut()
            }
        },
        Ok(Err(e)) => {
            set_last_error(&e);
            ptr::null_mut()
        }
        Err(_) => {
            set_last_error("panic occurred during conversion");
            ptr::null_mut()
        }
    }
}

/// Get the version of the library.
///
/// # Safety
///
/// Returns a static string that must not be freed.
#[no_mangle]
pub extern "C" fn w2b_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Get the last error message.
///
/// # Safety
///
/// Returns a pointer to a thread-local error string. The pointer is valid until
/// the next call to any w2b function on the same thread.
#[no_mangle]
pub extern "C" fn w2b_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

/// Convert a .docx file to JSON.
///
/// # Safety
///
/// - `path` must be a valid null-terminated UTF-8 string.
/// - `flags` is a bitwise OR of `W2B_FLAG_*` constants.
/// - Returns null on error. The returned string must be freed with
///   `w2b_free_string`.
#[no_mangle]
pub unsafe extern "C" fn w2b_convert_file(path: *const c_char, flags: c_int) -> *mut c_char {
    clear_last_error();

    if path.is_null() {
        set_last_error("path is null");
        return ptr::null_mut();
    }

    let result = catch_unwind(|| {
        let path_str = CStr::from_ptr(path).to_str().map_err(|e| e.to_string())?;
        crate::convert_file(path_str, &options_from_flags(flags)).map_err(|e| e.to_string())
    });

    into_c_string(result)
}

/// Convert an in-memory .docx package to JSON.
///
/// # Safety
///
/// - `data` must be a valid pointer to a byte buffer of at least `len` bytes.
/// - Returns null on error. The returned string must be freed with
///   `w2b_free_string`.
#[no_mangle]
pub unsafe extern "C" fn w2b_convert_bytes(
    data: *const u8,
    len: usize,
    flags: c_int,
) -> *mut c_char {
    clear_last_error();

    if data.is_null() {
        set_last_error("data is null");
        return ptr::null_mut();
    }

    let result = catch_unwind(|| {
        let bytes = std::slice::from_raw_parts(data, len);
        crate::convert_bytes(bytes, &options_from_flags(flags)).map_err(|e| e.to_string())
    });

    into_c_string(result)
}

/// Free a string returned by this library.
///
/// # Safety
///
/// - `s` must be a pointer returned by a w2b function, or null.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn w2b_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}
