//! Disposable - 정리 단위
//!
//! 레지스트리 등록 하나를 되돌리는 핸들. 클로저 대신 (레지스트리, 토큰) 쌍을
//! 들고 있어서 중복 해제와 제거 의미를 직접 테스트할 수 있다.

use kiln_foundation::Result;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// 레지스트리 항목 하나를 식별하는 토큰
///
/// 같은 id로 덮어쓴 항목은 새 토큰을 받으므로, 이전 Disposable은 새 항목을
/// 지우지 못한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationToken(u64);

impl RegistrationToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RegistrationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "registration-{}", self.0)
    }
}

/// 토큰으로 항목을 제거할 수 있는 레지스트리
pub(crate) trait Unregister: Send + Sync {
    /// 토큰에 해당하는 항목 제거. 없으면 no-op, `false` 반환
    fn unregister(&self, token: RegistrationToken) -> bool;
}

enum Release {
    Registration {
        registry: Weak<dyn Unregister>,
        token: RegistrationToken,
    },
    Callback(Box<dyn FnOnce() -> Result<()> + Send>),
}

/// 정리 핸들
///
/// 복제본은 같은 상태를 공유한다. 어느 복제본에서든 첫 `dispose`만 실제로
/// 해제하고 이후 호출은 no-op.
///
/// Drop 시 자동으로 해제하지 않는다. 등록은 `dispose`가 호출될 때까지 유지된다.
#[derive(Clone)]
pub struct Disposable {
    release: Arc<Mutex<Option<Release>>>,
}

impl Disposable {
    pub(crate) fn registration(registry: Weak<dyn Unregister>, token: RegistrationToken) -> Self {
        Self::with_release(Release::Registration { registry, token })
    }

    /// 플러그인 고유의 정리 콜백으로 생성
    pub fn from_fn(callback: impl FnOnce() -> Result<()> + Send + 'static) -> Self {
        Self::with_release(Release::Callback(Box::new(callback)))
    }

    /// 이미 해제된 상태의 핸들
    pub fn disposed() -> Self {
        Self {
            release: Arc::new(Mutex::new(None)),
        }
    }

    fn with_release(release: Release) -> Self {
        Self {
            release: Arc::new(Mutex::new(Some(release))),
        }
    }

    /// 해제 실행
    ///
    /// 콜백이 실패하면 에러를 돌려주지만 콜백은 이미 소모된 것으로 본다.
    pub fn dispose(&self) -> Result<()> {
        let release = self.release.lock().take();
        match release {
            None => Ok(()),
            Some(Release::Registration { registry, token }) => {
                // 레지스트리가 먼저 사라졌으면 지울 것도 없다
                if let Some(registry) = registry.upgrade() {
                    registry.unregister(token);
                }
                Ok(())
            }
            Some(Release::Callback(callback)) => callback(),
        }
    }

    /// 이미 해제되었는지
    pub fn is_disposed(&self) -> bool {
        self.release.lock().is_none()
    }
}

impl std::fmt::Debug for Disposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.release.lock() {
            None => "disposed".to_string(),
            Some(Release::Registration { token, .. }) => token.to_string(),
            Some(Release::Callback(_)) => "callback".to_string(),
        };
        f.debug_struct("Disposable").field("state", &state).finish()
    }
}
