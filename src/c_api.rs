// C entry points for hosts that embed the classifier through FFI.
// One process-wide classifier lives behind a mutex; panics are caught at the boundary.
use crate::{Classifier, ClassifierConfig, ClassifierError};
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Returned when the engine is not initialised or an argument is unusable.
pub const REVEREND_ERR_STATE: i32 = -100;
/// Returned when a panic was caught inside the library.
pub const REVEREND_ERR_PANIC: i32 = -101;

static ENGINE: Mutex<Option<Classifier>> = Mutex::new(None);

fn engine() -> MutexGuard<'static, Option<Classifier>> {
    ENGINE.lock().unwrap_or_else(PoisonError::into_inner)
}

unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn guard(f: impl FnOnce() -> i32) -> i32 {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        log::error!("panic caught at the C boundary");
        REVEREND_ERR_PANIC
    })
}

fn status(result: Result<(), ClassifierError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            log::warn!("{e}");
            e.code()
        }
    }
}

/// Opens (or creates) the corpus at `path` with the default configuration.
/// Returns [`REVEREND_ERR_STATE`] if an engine is already loaded; call
/// [`reverend_destroy`] first to save and release it.
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn reverend_init(path: *const c_char) -> i32 {
    let Some(path) = read_str(path) else {
        return REVEREND_ERR_STATE;
    };
    guard(|| {
        let mut slot = engine();
        if slot.is_some() {
            log::warn!("classifier already initialised; ignoring init for {path}");
            return REVEREND_ERR_STATE;
        }
        match Classifier::open(Path::new(path), ClassifierConfig::default()) {
            Ok(classifier) => {
                *slot = Some(classifier);
                log::info!("classifier initialised from {path}");
                0
            }
            Err(e) => status(Err(e)),
        }
    })
}

/// Saves the corpus and drops the engine.
#[no_mangle]
pub extern "C" fn reverend_destroy() -> i32 {
    guard(|| match engine().take() {
        Some(classifier) => status(classifier.save()),
        None => REVEREND_ERR_STATE,
    })
}

/// # Safety
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn reverend_train(category: *const c_char, text: *const c_char) -> i32 {
    let (Some(category), Some(text)) = (read_str(category), read_str(text)) else {
        return REVEREND_ERR_STATE;
    };
    guard(|| match engine().as_mut() {
        Some(classifier) => status(classifier.train(category, text)),
        None => REVEREND_ERR_STATE,
    })
}

/// # Safety
/// Both arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn reverend_untrain(category: *const c_char, text: *const c_char) -> i32 {
    let (Some(category), Some(text)) = (read_str(category), read_str(text)) else {
        return REVEREND_ERR_STATE;
    };
    guard(|| match engine().as_mut() {
        Some(classifier) => status(classifier.untrain(category, text)),
        None => REVEREND_ERR_STATE,
    })
}

/// Returns a JSON array of `[label, probability]` pairs. The caller owns the
/// string and must release it with [`reverend_free_string`].
///
/// # Safety
/// `text` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn reverend_guess(text: *const c_char) -> *mut c_char {
    let text = read_str(text).unwrap_or("");
    let json = catch_unwind(AssertUnwindSafe(|| {
        let guesses = engine().as_ref().map(|c| c.guess(text)).unwrap_or_default();
        let pairs: Vec<(&str, f64)> = guesses
            .iter()
            .map(|g| (g.label.as_str(), g.probability))
            .collect();
        serde_json::to_string(&pairs).unwrap_or_else(|_| "[]".to_string())
    }))
    .unwrap_or_else(|_| {
        log::error!("panic caught in reverend_guess");
        "[]".to_string()
    });
    CString::new(json).map_or(ptr::null_mut(), CString::into_raw)
}

/// # Safety
/// `s` must be null or a pointer previously returned by [`reverend_guess`].
#[no_mangle]
pub unsafe extern "C" fn reverend_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
