//! Provider Registry - 진단 프로바이더 집합
//!
//! id가 아니라 인스턴스 단위의 집합. 같은 인스턴스를 두 번 등록해도 항목은 하나,
//! 동작이 같더라도 서로 다른 인스턴스는 각각 별개의 항목이다.

use super::contribution::ContributionKind;
use crate::diagnostics::DiagnosticProvider;
use crate::disposable::{Disposable, RegistrationToken, Unregister};
use crate::events::{EventBus, EventType, HostEvent};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

struct ProviderEntry {
    token: RegistrationToken,
    provider: Arc<dyn DiagnosticProvider>,
}

/// 진단 프로바이더 레지스트리 (삽입 순서 유지)
pub struct ProviderRegistry {
    entries: RwLock<Vec<ProviderEntry>>,
    next_token: AtomicU64,
    events: Arc<EventBus>,
}

/// vtable은 무시하고 데이터 주소만 비교
fn same_instance(a: &Arc<dyn DiagnosticProvider>, b: &Arc<dyn DiagnosticProvider>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

impl ProviderRegistry {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_token: AtomicU64::new(1),
            events,
        }
    }

    /// 프로바이더 등록
    ///
    /// 이미 등록된 인스턴스면 기존 항목을 가리키는 Disposable을 돌려준다.
    pub fn register(self: &Arc<Self>, provider: Arc<dyn DiagnosticProvider>) -> Disposable {
        let (token, added) = {
            let mut entries = self.entries.write();
            match entries.iter().find(|e| same_instance(&e.provider, &provider)) {
                Some(existing) => (existing.token, false),
                None => {
                    let token =
                        RegistrationToken::new(self.next_token.fetch_add(1, Ordering::Relaxed));
                    entries.push(ProviderEntry {
                        token,
                        provider: Arc::clone(&provider),
                    });
                    (token, true)
                }
            }
        };

        if added {
            debug!(
                "[{}] Registered: {} ({})",
                ContributionKind::DiagnosticProvider,
                provider.name(),
                token
            );
            self.events.publish(HostEvent::contribution(
                EventType::ContributionAdded,
                ContributionKind::DiagnosticProvider.as_str(),
                provider.name(),
            ));
        } else {
            debug!(
                "[{}] Already registered: {}",
                ContributionKind::DiagnosticProvider,
                provider.name()
            );
        }

        let registry: Weak<dyn Unregister> = Arc::downgrade(self) as Weak<dyn Unregister>;
        Disposable::registration(registry, token)
    }

    /// 현재 프로바이더 스냅샷 (등록 순서)
    pub fn snapshot(&self) -> Vec<Arc<dyn DiagnosticProvider>> {
        self.entries
            .read()
            .iter()
            .map(|e| Arc::clone(&e.provider))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Unregister for ProviderRegistry {
    fn unregister(&self, token: RegistrationToken) -> bool {
        let removed = {
            let mut entries = self.entries.write();
            entries
                .iter()
                .position(|e| e.token == token)
                .map(|i| entries.remove(i))
        };

        match removed {
            Some(entry) => {
                debug!(
                    "[{}] Unregistered: {}",
                    ContributionKind::DiagnosticProvider,
                    entry.provider.name()
                );
                self.events.publish(HostEvent::contribution(
                    EventType::ContributionRemoved,
                    ContributionKind::DiagnosticProvider.as_str(),
                    entry.provider.name(),
                ));
                true
            }
            None => false,
        }
    }
}
