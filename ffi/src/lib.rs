/*
 * lib.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Mailparam, RFC 2231 parameter handling for email headers.
 *
 * Mailparam is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Mailparam is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Mailparam.  If not, see <http://www.gnu.org/licenses/>.
 */

//! C FFI for mailparam core. Parameter maps are identified by a non-zero handle.
//! Functions returning `char*` allocate (free with mailparam_free_string) unless noted.
//! All string parameters are UTF-8 NUL-terminated. Functions returning int use
//! 0 for success and -1 for failure; mailparam_last_error describes the failure.

use libc::{c_char, c_int, size_t};
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::ptr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use mailparam_core::mime::{parse_parameter_list, Parameter, ParameterMap};
use mailparam_core::{ParameterConfig, ParameterError};

/// Maps created through the C API. Each call takes the lock for its duration, so a
/// handle may be used from several threads.
struct Registry {
    maps: RwLock<HashMap<u64, ParameterMap>>,
    counter: AtomicU64,
}

fn registry() -> &'static Registry {
    static REGISTRY: once_cell::sync::OnceCell<Registry> = once_cell::sync::OnceCell::new();
    REGISTRY.get_or_init(|| Registry {
        maps: RwLock::new(HashMap::new()),
        counter: AtomicU64::new(0),
    })
}

thread_local! {
    static LAST_ERROR: std::cell::RefCell<Option<CString>> = std::cell::RefCell::new(None);
}

fn set_last_error(err: &ParameterError) {
    log::debug!("mailparam ffi: {}", err);
    let msg = CString::new(err.to_string()).unwrap_or_else(|_| CString::from(c"(error)"));
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(msg));
}

fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

/// Borrow a C string as UTF-8. `what` names the argument in the error.
fn ptr_to_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, ParameterError> {
    if ptr.is_null() {
        return Err(ParameterError::invalid_argument(format!("{} is NULL", what)));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| ParameterError::invalid_argument(format!("{} is not UTF-8", what)))
}

/// Owned C string for the caller; interior NULs cannot cross the boundary.
fn to_c_string(s: &str) -> Result<*mut c_char, ParameterError> {
    CString::new(s)
        .map(CString::into_raw)
        .map_err(|_| ParameterError::invalid_argument("value contains NUL"))
}

fn insert_map(map: ParameterMap) -> u64 {
    let reg = registry();
    let handle = reg.counter.fetch_add(1, Ordering::SeqCst) + 1;
    if let Ok(mut maps) = reg.maps.write() {
        maps.insert(handle, map);
    }
    handle
}

fn with_map<R>(handle: u64, f: impl FnOnce(&ParameterMap) -> Result<R, ParameterError>) -> Result<R, ParameterError> {
    let maps = registry()
        .maps
        .read()
        .map_err(|_| ParameterError::invalid_argument("registry lock poisoned"))?;
    let map = maps.get(&handle).ok_or(ParameterError::UnknownHandle(handle))?;
    f(map)
}

fn with_map_mut<R>(
    handle: u64,
    f: impl FnOnce(&mut ParameterMap) -> Result<R, ParameterError>,
) -> Result<R, ParameterError> {
    let mut maps = registry()
        .maps
        .write()
        .map_err(|_| ParameterError::invalid_argument("registry lock poisoned"))?;
    let map = maps.get_mut(&handle).ok_or(ParameterError::UnknownHandle(handle))?;
    f(map)
}

/// Report a status result as 0 / -1.
fn status(result: Result<(), ParameterError>) -> c_int {
    match result {
        Ok(()) => {
            clear_last_error();
            0
        }
        Err(e) => {
            set_last_error(&e);
            -1
        }
    }
}

/// Report a string result; NULL on error or when the result is absent.
fn string_result(result: Result<Option<*mut c_char>, ParameterError>) -> *mut c_char {
    match result {
        Ok(s) => {
            clear_last_error();
            s.unwrap_or(ptr::null_mut())
        }
        Err(e) => {
            set_last_error(&e);
            ptr::null_mut()
        }
    }
}

/// Version string (static, do not free).
#[no_mangle]
pub extern "C" fn mailparam_version() -> *const c_char {
    c"0.1.0".as_ptr()
}

/// Last error message from a failed call on this thread. Valid until the next FFI call. Do not free.
#[no_mangle]
pub extern "C" fn mailparam_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

/// Free a string returned by mailparam_map_get, mailparam_map_name_at, mailparam_map_value_at
/// or mailparam_map_encoded. No-op if ptr is NULL.
#[no_mangle]
pub unsafe extern "C" fn mailparam_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        let _ = CString::from_raw(ptr);
    }
}

/// New empty map with the default configuration. Returns its handle.
#[no_mangle]
pub extern "C" fn mailparam_map_new() -> u64 {
    clear_last_error();
    insert_map(ParameterMap::new())
}

/// New empty map configured from a JSON object (see ParameterConfig). Returns 0 on error.
#[no_mangle]
pub extern "C" fn mailparam_map_new_with_config(config_json: *const c_char) -> u64 {
    let result = ptr_to_str(config_json, "config_json").and_then(ParameterConfig::from_json);
    match result {
        Ok(config) => {
            clear_last_error();
            insert_map(ParameterMap::with_config(config))
        }
        Err(e) => {
            set_last_error(&e);
            0
        }
    }
}

/// Release a map. No-op for unknown handles.
#[no_mangle]
pub extern "C" fn mailparam_map_free(handle: u64) {
    if let Ok(mut maps) = registry().maps.write() {
        maps.remove(&handle);
    }
}

/// Merge `count` physical parameters (`names[i]`, `values[i]`) into the map, reassembling
/// RFC 2231 continuations among them.
#[no_mangle]
pub unsafe extern "C" fn mailparam_map_merge(
    handle: u64,
    names: *const *const c_char,
    values: *const *const c_char,
    count: size_t,
) -> c_int {
    let pairs = if count == 0 {
        Ok(Vec::new())
    } else if names.is_null() || values.is_null() {
        Err(ParameterError::invalid_argument("names or values is NULL"))
    } else {
        let names = std::slice::from_raw_parts(names, count);
        let values = std::slice::from_raw_parts(values, count);
        names
            .iter()
            .zip(values)
            .map(|(&n, &v)| Ok(Parameter::new(ptr_to_str(n, "name")?, ptr_to_str(v, "value")?)))
            .collect::<Result<Vec<Parameter>, ParameterError>>()
    };
    status(pairs.and_then(|pairs| {
        with_map_mut(handle, |map| {
            map.merge(pairs);
            Ok(())
        })
    }))
}

/// Merge the parameter part of a header value (`name=value; name*0*=...`).
#[no_mangle]
pub extern "C" fn mailparam_map_merge_header(handle: u64, params: *const c_char) -> c_int {
    status(ptr_to_str(params, "params").and_then(|params| {
        let pairs = parse_parameter_list(params);
        with_map_mut(handle, |map| {
            map.merge(pairs);
            Ok(())
        })
    }))
}

/// Decoded value for `name` (case-insensitive), or NULL if absent (last error stays clear).
#[no_mangle]
pub extern "C" fn mailparam_map_get(handle: u64, name: *const c_char) -> *mut c_char {
    string_result(ptr_to_str(name, "name").and_then(|name| {
        with_map(handle, |map| map.get(name).map(to_c_string).transpose())
    }))
}

#[no_mangle]
pub extern "C" fn mailparam_map_set(handle: u64, name: *const c_char, value: *const c_char) -> c_int {
    status((|| {
        let name = ptr_to_str(name, "name")?;
        let value = ptr_to_str(value, "value")?;
        with_map_mut(handle, |map| {
            map.set(name, value);
            Ok(())
        })
    })())
}

/// Remove `name`. Returns 1 if it was present, 0 if not, -1 on error.
#[no_mangle]
pub extern "C" fn mailparam_map_remove(handle: u64, name: *const c_char) -> c_int {
    let result = ptr_to_str(name, "name").and_then(|name| with_map_mut(handle, |map| Ok(map.remove(name))));
    match result {
        Ok(removed) => {
            clear_last_error();
            c_int::from(removed.is_some())
        }
        Err(e) => {
            set_last_error(&e);
            -1
        }
    }
}

/// Number of logical parameters, 0 for unknown handles.
#[no_mangle]
pub extern "C" fn mailparam_map_count(handle: u64) -> size_t {
    with_map(handle, |map| Ok(map.len())).unwrap_or(0)
}

/// Name of the parameter at `index` in insertion order, or NULL when out of range.
#[no_mangle]
pub extern "C" fn mailparam_map_name_at(handle: u64, index: size_t) -> *mut c_char {
    string_result(with_map(handle, |map| {
        map.names().nth(index).map(to_c_string).transpose()
    }))
}

/// Decoded value of the parameter at `index`, or NULL when out of range.
#[no_mangle]
pub extern "C" fn mailparam_map_value_at(handle: u64, index: size_t) -> *mut c_char {
    string_result(with_map(handle, |map| {
        map.values().nth(index).map(to_c_string).transpose()
    }))
}

/// Wire form of the whole map (parameters joined by `;` CRLF SP).
#[no_mangle]
pub extern "C" fn mailparam_map_encoded(handle: u64) -> *mut c_char {
    string_result(with_map(handle, |map| to_c_string(&map.encoded()).map(Some)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(ptr: *mut c_char) -> Option<String> {
        if ptr.is_null() {
            return None;
        }
        let s = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        unsafe { mailparam_free_string(ptr) };
        Some(s)
    }

    fn last_error() -> Option<String> {
        let p = mailparam_last_error();
        if p.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned())
        }
    }

    #[test]
    fn merge_get_and_encode() {
        let h = mailparam_map_new();
        let names = [c"value*0*".as_ptr(), c"value*1*".as_ptr(), c"value*2".as_ptr()];
        let values = [
            c"us-ascii'en'This%20is%20even%20more%20".as_ptr(),
            c"%2A%2A%2Afun%2A%2A%2A%20".as_ptr(),
            c"isn't it".as_ptr(),
        ];
        assert_eq!(unsafe { mailparam_map_merge(h, names.as_ptr(), values.as_ptr(), 3) }, 0);
        assert_eq!(
            take(mailparam_map_get(h, c"VALUE".as_ptr())).as_deref(),
            Some("This is even more ***fun*** isn't it")
        );
        assert_eq!(
            take(mailparam_map_encoded(h)).as_deref(),
            Some("value*0*=us-ascii'en'This%20is%20even%20more%20;\r\n value*1*=%2A%2A%2Afun%2A%2A%2A%20;\r\n value*2=\"isn't it\"")
        );
        mailparam_map_free(h);
        assert_eq!(mailparam_map_count(h), 0);
    }

    #[test]
    fn set_iterate_remove() {
        let h = mailparam_map_new();
        assert_eq!(mailparam_map_merge_header(h, c"charset=utf-8; Name=\"a b\"".as_ptr()), 0);
        assert_eq!(mailparam_map_set(h, c"name".as_ptr(), c"bob".as_ptr()), 0);
        assert_eq!(mailparam_map_count(h), 2);
        assert_eq!(take(mailparam_map_name_at(h, 1)).as_deref(), Some("Name"));
        assert_eq!(take(mailparam_map_value_at(h, 1)).as_deref(), Some("bob"));
        assert!(take(mailparam_map_value_at(h, 2)).is_none());
        assert_eq!(mailparam_map_remove(h, c"CHARSET".as_ptr()), 1);
        assert_eq!(mailparam_map_remove(h, c"charset".as_ptr()), 0);
        assert!(take(mailparam_map_get(h, c"charset".as_ptr())).is_none());
        assert!(last_error().is_none());
        mailparam_map_free(h);
    }

    #[test]
    fn errors_are_reported() {
        assert_eq!(mailparam_map_set(u64::MAX, c"a".as_ptr(), c"b".as_ptr()), -1);
        assert!(last_error().unwrap().contains("unknown parameter map handle"));
        let h = mailparam_map_new();
        assert_eq!(mailparam_map_set(h, ptr::null(), c"b".as_ptr()), -1);
        assert!(last_error().unwrap().contains("name is NULL"));
        assert_eq!(mailparam_map_new_with_config(c"{\"line_width\": 2}".as_ptr()), 0);
        assert!(last_error().unwrap().contains("line_width"));
        mailparam_map_free(h);
    }

    #[test]
    fn configured_map() {
        let h = mailparam_map_new_with_config(c"{\"default_charset\": \"iso-8859-1\"}".as_ptr());
        assert_ne!(h, 0);
        assert_eq!(mailparam_map_merge_header(h, c"f*=''%E9".as_ptr()), 0);
        assert_eq!(take(mailparam_map_get(h, c"f".as_ptr())).as_deref(), Some("é"));
        mailparam_map_free(h);
    }
}
