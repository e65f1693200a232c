//! Failure boundary - 플러그인/프로바이더 코드의 panic을 에러로 변환

use kiln_foundation::{Error, Result};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// `f`를 실행하고, 반환된 에러와 panic을 모두 `Err`로 돌려준다.
///
/// `owner`는 panic 메시지에 들어갈 플러그인/프로바이더 이름.
pub(crate) fn guarded<T>(owner: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(Error::plugin_panic(owner, panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
