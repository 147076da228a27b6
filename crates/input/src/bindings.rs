use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use testbed_common::FogType;

use crate::action::Action;

/// Keys the testbed reacts to. Window backends translate their own key
/// codes into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Left,
    Right,
    F,
    F1,
    F2,
    F3,
    L,
    R,
    P,
    T,
}

/// Key-to-action table. Uses BTreeMap so help listings are stable.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    map: BTreeMap<Key, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut b = Self::empty();
        b.bind(Key::Escape, Action::Exit);
        b.bind(Key::Right, Action::NextScene);
        b.bind(Key::Left, Action::PrevScene);
        b.bind(Key::F, Action::ToggleFog);
        b.bind(Key::F1, Action::SetFogType(FogType::Linear));
        b.bind(Key::F2, Action::SetFogType(FogType::Exponential));
        b.bind(Key::F3, Action::SetFogType(FogType::ExponentialSquared));
        b.bind(Key::L, Action::ToggleComplexLighting);
        b.bind(Key::R, Action::ToggleRotation);
        b.bind(Key::P, Action::ToggleProjection);
        b.bind(Key::T, Action::ToggleTextureMapping);
        b
    }
}

impl KeyBindings {
    /// Bindings with nothing mapped.
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Map `key` to `action`, returning the previous action for that key.
    pub fn bind(&mut self, key: Key, action: Action) -> Option<Action> {
        self.map.insert(key, action)
    }

    pub fn unbind(&mut self, key: Key) -> Option<Action> {
        self.map.remove(&key)
    }

    /// Action for a key event. Key-up events never map to an action.
    pub fn action_for(&self, key: Key, pressed: bool) -> Option<Action> {
        if !pressed {
            return None;
        }
        let action = self.map.get(&key).copied();
        if let Some(a) = action {
            tracing::debug!(?key, action = ?a, "key bound");
        }
        action
    }

    /// All bindings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, Action)> + '_ {
        self.map.iter().map(|(k, a)| (*k, *a))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
