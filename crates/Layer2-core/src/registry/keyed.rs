//! Keyed Registry - id로 색인되는 contribution 저장소
//!
//! 명령, 사이드바 뷰, 하단 패널 뷰가 이 타입을 쓴다.

use super::contribution::ContributionKind;
use crate::disposable::{Disposable, RegistrationToken, Unregister};
use crate::events::{EventBus, EventType, HostEvent};
use indexmap::IndexMap;
use kiln_foundation::{CollisionPolicy, Error, Result};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

struct Entry<T> {
    token: RegistrationToken,
    value: T,
}

/// id → contribution 저장소
///
/// - 스냅샷은 최초 삽입 순서
/// - 같은 id 재등록은 정책에 따라 덮어쓰기(기존 자리 유지) 또는 거부
/// - 해제는 토큰 기준이라 덮어쓴 등록의 Disposable은 새 항목을 건드리지 않음
pub struct KeyedRegistry<T> {
    kind: ContributionKind,
    entries: RwLock<IndexMap<String, Entry<T>>>,
    next_token: AtomicU64,
    policy: CollisionPolicy,
    events: Arc<EventBus>,
}

impl<T: Clone + Send + Sync + 'static> KeyedRegistry<T> {
    pub fn new(kind: ContributionKind, policy: CollisionPolicy, events: Arc<EventBus>) -> Self {
        Self {
            kind,
            entries: RwLock::new(IndexMap::new()),
            next_token: AtomicU64::new(1),
            policy,
            events,
        }
    }

    // ========================================================================
    // 등록 / 해제
    // ========================================================================

    /// 항목 등록
    ///
    /// `CollisionPolicy::Reject`일 때 이미 있는 id면 `Error::Conflict`.
    pub fn register(self: &Arc<Self>, id: impl Into<String>, value: T) -> Result<Disposable> {
        let id = id.into();
        let token = RegistrationToken::new(self.next_token.fetch_add(1, Ordering::Relaxed));

        {
            let mut entries = self.entries.write();
            match entries.get_mut(&id) {
                Some(existing) => {
                    if self.policy == CollisionPolicy::Reject {
                        return Err(Error::conflict(self.kind.as_str(), id));
                    }
                    debug!("[{}] Overwriting '{}'", self.kind, id);
                    *existing = Entry { token, value };
                }
                None => {
                    entries.insert(id.clone(), Entry { token, value });
                }
            }
        }

        debug!("[{}] Registered: {} ({})", self.kind, id, token);
        self.events.publish(HostEvent::contribution(
            EventType::ContributionAdded,
            self.kind.as_str(),
            &id,
        ));

        let registry: Weak<dyn Unregister> = Arc::downgrade(self) as Weak<dyn Unregister>;
        Ok(Disposable::registration(registry, token))
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 현재 항목 스냅샷 (이후 변경은 반영되지 않음)
    pub fn snapshot(&self) -> Vec<T> {
        self.entries
            .read()
            .values()
            .map(|e| e.value.clone())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.entries.read().get(id).map(|e| e.value.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn kind(&self) -> ContributionKind {
        self.kind
    }
}

impl<T: Send + Sync> Unregister for KeyedRegistry<T> {
    fn unregister(&self, token: RegistrationToken) -> bool {
        let removed = {
            let mut entries = self.entries.write();
            let index = entries.values().position(|e| e.token == token);
            index.and_then(|i| entries.shift_remove_index(i).map(|(id, _)| id))
        };

        match removed {
            Some(id) => {
                debug!("[{}] Unregistered: {}", self.kind, id);
                self.events.publish(HostEvent::contribution(
                    EventType::ContributionRemoved,
                    self.kind.as_str(),
                    &id,
                ));
                true
            }
            None => false,
        }
    }
}
