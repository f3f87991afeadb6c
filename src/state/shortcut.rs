//! Keyboard shortcuts bound to state nodes.
//!
//! A binding string lists alternative combos separated by commas, each combo
//! being modifiers and a key joined by `+`: `"Delete,Backspace"`,
//! `"cmd+a,ctrl+a"`. Matching is exact on the modifier set.

use std::fmt;

use super::Ctx;
use crate::error::Result;
use crate::input::{Key, KeyInput, Modifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    /// Parse one combo such as `"shift+cmd+z"`. Unknown modifier names are
    /// taken as part of the key.
    #[must_use]
    pub fn parse(combo: &str) -> Self {
        let mut modifiers = Modifiers::default();
        let mut parts: Vec<&str> = combo.split('+').map(str::trim).collect();
        let key = parts.pop().unwrap_or_default();
        let mut rest = Vec::new();
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "shift" => modifiers.shift = true,
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "cmd" | "meta" => modifiers.meta = true,
                _ => rest.push(part),
            }
        }
        rest.push(key);
        Self { key: Key::new(rest.join("+")), modifiers }
    }

    #[must_use]
    pub fn matches(&self, input: &KeyInput) -> bool {
        input.key.is(self.key.as_str()) && input.modifiers == self.modifiers
    }
}

pub type ShortcutAction = Box<dyn Fn(&mut Ctx<'_>) -> Result<()>>;

pub struct Shortcut {
    combos: Vec<KeyCombo>,
    action: ShortcutAction,
}

impl fmt::Debug for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shortcut").field("combos", &self.combos).finish_non_exhaustive()
    }
}

impl Shortcut {
    pub fn new(keys: &str, action: impl Fn(&mut Ctx<'_>) -> Result<()> + 'static) -> Self {
        let combos = keys.split(',').filter(|s| !s.trim().is_empty()).map(KeyCombo::parse).collect();
        Self { combos, action: Box::new(action) }
    }

    #[must_use]
    pub fn combos(&self) -> &[KeyCombo] {
        &self.combos
    }

    #[must_use]
    pub fn matches(&self, input: &KeyInput) -> bool {
        self.combos.iter().any(|c| c.matches(input))
    }

    pub(super) fn run(&self, ctx: &mut Ctx<'_>) -> Result<()> {
        (self.action)(ctx)
    }
}
