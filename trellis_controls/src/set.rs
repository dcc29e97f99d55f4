// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered, shared control sets.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::control::{Control, ControlAction, ControlKey};

/// An insertion-ordered map of controls, shared between objects.
///
/// Cloning a set is cheap and shares its storage. Mutating a set that is
/// shared first copies it, so customizing one object's controls never leaks
/// into other objects or into the template it came from.
///
/// Iteration order is insertion order. Control lookup under the pointer
/// walks the set in this order and the first match wins.
#[derive(Clone, Debug, Default)]
pub struct ControlSet {
    entries: Rc<Vec<(ControlKey, Control)>>,
}

impl ControlSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard nine controls, in order `ml, mr, mb, mt, tl, tr, bl, br, mtr`.
    ///
    /// Edge handles scale one axis, corner handles scale both, and `mtr` sits
    /// 40 px above the top edge and rotates.
    pub fn defaults() -> Self {
        let at = |x, y, action| Control::new(x, y, action);
        Self {
            entries: Rc::new(alloc::vec![
                (ControlKey::ML, at(-0.5, 0.0, ControlAction::ScaleX).with_cursor("ew-resize")),
                (ControlKey::MR, at(0.5, 0.0, ControlAction::ScaleX).with_cursor("ew-resize")),
                (ControlKey::MB, at(0.0, 0.5, ControlAction::ScaleY).with_cursor("ns-resize")),
                (ControlKey::MT, at(0.0, -0.5, ControlAction::ScaleY).with_cursor("ns-resize")),
                (ControlKey::TL, at(-0.5, -0.5, ControlAction::ScaleEqually).with_cursor("nwse-resize")),
                (ControlKey::TR, at(0.5, -0.5, ControlAction::ScaleEqually).with_cursor("nesw-resize")),
                (ControlKey::BL, at(-0.5, 0.5, ControlAction::ScaleEqually).with_cursor("nesw-resize")),
                (ControlKey::BR, at(0.5, 0.5, ControlAction::ScaleEqually).with_cursor("nwse-resize")),
                (
                    ControlKey::MTR,
                    at(0.0, -0.5, ControlAction::Rotate)
                        .with_offset(0.0, -40.0)
                        .with_connection()
                        .with_cursor("grab"),
                ),
            ]),
        }
    }

    /// Number of controls.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no controls.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The control stored under `key`.
    pub fn get(&self, key: &ControlKey) -> Option<&Control> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Whether `key` names a control in the set.
    pub fn contains(&self, key: &ControlKey) -> bool {
        self.get(key).is_some()
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &ControlKey> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&ControlKey, &Control)> + '_ {
        self.entries.iter().map(|(k, c)| (k, c))
    }

    /// Inserts or replaces a control, returning the replaced one.
    ///
    /// A replaced control keeps its position; a new one goes last.
    pub fn insert(&mut self, key: ControlKey, control: Control) -> Option<Control> {
        let entries = Rc::make_mut(&mut self.entries);
        if let Some((_, slot)) = entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(core::mem::replace(slot, control));
        }
        entries.push((key, control));
        None
    }

    /// Removes a control.
    pub fn remove(&mut self, key: &ControlKey) -> Option<Control> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(Rc::make_mut(&mut self.entries).remove(pos).1)
    }

    /// Edits the control under `key` in this set only.
    ///
    /// Returns `false` when there is no such control; nothing is copied then.
    pub fn customize(&mut self, key: &ControlKey, edit: impl FnOnce(&mut Control)) -> bool {
        if !self.contains(key) {
            return false;
        }
        let entries = Rc::make_mut(&mut self.entries);
        if let Some((_, control)) = entries.iter_mut().find(|(k, _)| k == key) {
            edit(control);
        }
        true
    }

    /// Whether both sets still share storage.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order() {
        let set = ControlSet::defaults();
        let keys: Vec<&str> = set.keys().map(ControlKey::as_str).collect();
        assert_eq!(keys, ["ml", "mr", "mb", "mt", "tl", "tr", "bl", "br", "mtr"]);
        let mtr = set.get(&ControlKey::MTR).unwrap();
        assert_eq!((mtr.x, mtr.y, mtr.offset_y), (0.0, -0.5, -40.0));
        assert!(mtr.with_connection);
        assert_eq!(mtr.action, ControlAction::Rotate);
        assert!(set.get(&ControlKey::new("nope")).is_none());
    }

    #[test]
    fn customize_copies_shared_storage() {
        let template = ControlSet::defaults();
        let mut mine = template.clone();
        assert!(mine.shares_storage_with(&template));

        assert!(mine.customize(&ControlKey::TL, |c| c.visible = false));
        assert!(!mine.shares_storage_with(&template));
        assert!(!mine.get(&ControlKey::TL).unwrap().visible);
        assert!(template.get(&ControlKey::TL).unwrap().visible, "template untouched");

        let mut other = template.clone();
        assert!(!other.customize(&ControlKey::new("missing"), |c| c.visible = false));
        assert!(other.shares_storage_with(&template), "failed edit does not copy");
    }

    #[test]
    fn insert_keeps_position_and_remove() {
        let mut set = ControlSet::defaults();
        let old = set.insert(ControlKey::MT, Control::new(0.0, -0.5, ControlAction::SkewX));
        assert_eq!(old.map(|c| c.action), Some(ControlAction::ScaleY));
        assert_eq!(set.keys().nth(3), Some(&ControlKey::MT));
        assert!(set.insert(ControlKey::new("extra"), Control::default()).is_none());
        assert_eq!(set.keys().last().map(ControlKey::as_str), Some("extra"));
        assert_eq!(set.len(), 10);
        assert!(set.remove(&ControlKey::ML).is_some());
        assert!(set.remove(&ControlKey::ML).is_none());
        assert_eq!(set.keys().next(), Some(&ControlKey::MR));
    }
}
