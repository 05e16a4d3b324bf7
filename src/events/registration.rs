//! Cancellation handles for listener registrations

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Type for the removal command held by a registration
type RemoveFn = Box<dyn FnOnce()>;

/// Handle returned by every "add listener" call.
///
/// Removing is idempotent: the removal command runs at most once, no matter
/// how many clones of the handle call [`Registration::remove`]. Dropping the
/// handle does not remove anything.
#[derive(Clone)]
pub struct Registration {
    remover: Rc<RefCell<Option<RemoveFn>>>,
}

impl Registration {
    /// Create a registration that runs `remove` the first time it is removed
    pub fn new(remove: impl FnOnce() + 'static) -> Self {
        Self {
            remover: Rc::new(RefCell::new(Some(Box::new(remove)))),
        }
    }

    /// A registration with nothing to remove
    pub fn noop() -> Self {
        Self {
            remover: Rc::new(RefCell::new(None)),
        }
    }

    /// Combine several registrations into one that removes all of them
    pub fn combine(registrations: impl IntoIterator<Item = Registration>) -> Self {
        let registrations: Vec<_> = registrations.into_iter().collect();
        Self::new(move || {
            for registration in registrations {
                registration.remove();
            }
        })
    }

    /// Run the removal command if it has not run yet
    pub fn remove(&self) {
        // Release the borrow before running the command; it may call back into
        // this handle through a clone.
        let remove = self.remover.borrow_mut().take();
        if let Some(remove) = remove {
            remove();
        }
    }

    /// Whether the removal command has already run
    pub fn is_removed(&self) -> bool {
        self.remover.borrow().is_none()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("removed", &self.is_removed())
            .finish()
    }
}
