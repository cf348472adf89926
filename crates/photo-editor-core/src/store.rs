//! Parameter store.
//!
//! Owns the session's [`EditParameters`] and is the only place they change.
//! Every mutation bumps a revision counter and notifies subscribed
//! listeners with the new snapshot, which is how a renderer learns it has
//! to redraw.

use std::fmt;

use crate::params::{normalize_rotation, Axis, EditParameters, ParameterField, RotateDirection};

/// Callback invoked with the new snapshot after every mutation.
pub type Listener = Box<dyn FnMut(&EditParameters)>;

/// Handle returned by [`ParameterStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Single source of truth for the current edit parameters.
#[derive(Default)]
pub struct ParameterStore {
    params: EditParameters,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterStore")
            .field("params", &self.params)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ParameterStore {
    /// Create a store holding the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn get(&self) -> EditParameters {
        self.params
    }

    /// Number of mutations applied since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Write one field (clamped, see [`EditParameters::set`]).
    pub fn set(&mut self, field: ParameterField, value: f32) {
        self.params.set(field, value);
        log::debug!("set {field} = {}", self.params.get(field));
        self.commit();
    }

    /// Rotate by a quarter turn.
    pub fn rotate(&mut self, direction: RotateDirection) {
        let target = self.params.rotation + direction.degrees();
        self.params.rotation = normalize_rotation(f64::from(target));
        log::debug!("rotate {direction:?} -> {} deg", self.params.rotation);
        self.commit();
    }

    /// Negate the sign field of `axis`.
    pub fn flip(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.params.flip_x = -self.params.flip_x,
            Axis::Y => self.params.flip_y = -self.params.flip_y,
        }
        log::debug!("flip {axis:?}");
        self.commit();
    }

    /// Restore every field to its default in one update.
    pub fn reset(&mut self) {
        self.params = EditParameters::default();
        log::debug!("reset parameters");
        self.commit();
    }

    /// Install a whole snapshot, normalized into range, in one update.
    pub fn replace(&mut self, params: EditParameters) {
        self.params = params.normalized();
        self.commit();
    }

    /// Register a listener called after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&EditParameters) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn commit(&mut self) {
        self.revision += 1;
        let snapshot = self.params;
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_set_then_get() {
        let mut store = ParameterStore::new();
        store.set(ParameterField::Saturation, 140.0);
        assert_eq!(store.get().saturation, 140.0);
    }

    #[test]
    fn test_set_clamps() {
        let mut store = ParameterStore::new();
        store.set(ParameterField::Grayscale, 250.0);
        assert_eq!(store.get().grayscale, 100.0);
        store.set(ParameterField::Brightness, -5.0);
        assert_eq!(store.get().brightness, 0.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = ParameterStore::new();
        store.set(ParameterField::Blur, 4.0);
        store.set(ParameterField::Sepia, 80.0);
        store.rotate(RotateDirection::Right);
        store.flip(Axis::Y);

        store.reset();
        assert!(store.get().is_default());
    }

    #[test]
    fn test_rotate_right_four_times_wraps() {
        let mut store = ParameterStore::new();
        let expected = [90, 180, 270, 0];
        for want in expected {
            store.rotate(RotateDirection::Right);
            assert_eq!(store.get().rotation, want);
        }
    }

    #[test]
    fn test_rotate_left_from_zero() {
        let mut store = ParameterStore::new();
        store.rotate(RotateDirection::Left);
        assert_eq!(store.get().rotation, 270);
        store.rotate(RotateDirection::Right);
        assert_eq!(store.get().rotation, 0);
    }

    #[test]
    fn test_flip_twice_restores_sign() {
        let mut store = ParameterStore::new();
        store.flip(Axis::X);
        assert_eq!(store.get().flip_x, -1);
        assert_eq!(store.get().flip_y, 1);
        store.flip(Axis::X);
        assert_eq!(store.get().flip_x, 1);
    }

    #[test]
    fn test_listeners_see_every_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = ParameterStore::new();
        let sink = Rc::clone(&seen);
        store.subscribe(move |params| sink.borrow_mut().push(*params));

        store.set(ParameterField::Contrast, 120.0);
        store.rotate(RotateDirection::Right);
        store.reset();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].contrast, 120.0);
        assert_eq!(seen[1].rotation, 90);
        assert!(seen[2].is_default(), "reset is observed as one complete record");
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut store = ParameterStore::new();
        let sink = Rc::clone(&count);
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);

        store.set(ParameterField::Opacity, 50.0);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set(ParameterField::Opacity, 60.0);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_replace_normalizes() {
        let mut store = ParameterStore::new();
        store.replace(EditParameters {
            scale: 1000.0,
            rotation: 630,
            ..Default::default()
        });
        assert_eq!(store.get().scale, 200.0);
        assert_eq!(store.get().rotation, 270);
    }
}
