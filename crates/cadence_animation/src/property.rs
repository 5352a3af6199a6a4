//! Settable properties
//!
//! The engine only ever sees a `(getter, setter)` pair. [`SharedValue`] is a
//! ready-made property for hosts (and tests) that have nothing better to hand.

use crate::values::Animatable;
use std::cell::Cell;
use std::rc::Rc;

/// Reads the current value of a host property
pub type Getter<T> = Box<dyn Fn() -> T>;

/// Writes a new value into a host property
pub type Setter<T> = Box<dyn FnMut(T)>;

/// A shared, cloneable cell holding one animated value
///
/// Clones share the same storage.
#[derive(Debug, Default)]
pub struct SharedValue<T: Animatable> {
    cell: Rc<Cell<T>>,
}

impl<T: Animatable> SharedValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(Cell::new(value)),
        }
    }

    pub fn get(&self) -> T {
        self.cell.get()
    }

    pub fn set(&self, value: T) {
        self.cell.set(value);
    }

    /// A getter reading this cell
    pub fn getter(&self) -> impl Fn() -> T + 'static {
        let cell = Rc::clone(&self.cell);
        move || cell.get()
    }

    /// A setter writing this cell
    pub fn setter(&self) -> impl FnMut(T) + 'static {
        let cell = Rc::clone(&self.cell);
        move |value| cell.set(value)
    }

    /// Whether two handles point at the same storage
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Animatable> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_storage() {
        let value = SharedValue::new(1.0_f32);
        let alias = value.clone();
        let mut set = alias.setter();
        set(4.0);
        assert_eq!(value.get(), 4.0);
        assert_eq!((value.getter())(), 4.0);
        assert!(value.ptr_eq(&alias));
        assert!(!value.ptr_eq(&SharedValue::new(4.0)));
    }
}
