use std::sync::{Arc, OnceLock};

use crate::error::RecitationError;

/// A shared resource filled once, then read concurrently.
///
/// Lets a service start accepting requests before a slow model load has
/// finished: until [`ResourceSlot::install`] runs, reads fail with
/// `ModelUnavailable`.
pub struct ResourceSlot<T: ?Sized> {
    name: &'static str,
    cell: OnceLock<Arc<T>>,
}

impl<T: ?Sized> ResourceSlot<T> {
    pub fn empty(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceLock::new(),
        }
    }

    pub fn ready(name: &'static str, value: Arc<T>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self { name, cell }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn install(&self, value: Arc<T>) -> Result<(), RecitationError> {
        self.cell.set(value).map_err(|_| {
            RecitationError::invalid_input(format!("{} is already initialized", self.name))
        })?;
        tracing::info!(resource = self.name, "resource initialized");
        Ok(())
    }

    pub fn get(&self) -> Result<&Arc<T>, RecitationError> {
        self.cell
            .get()
            .ok_or_else(|| RecitationError::model_unavailable(self.name))
    }

    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> &'static str;
    }

    struct Hello;

    impl Greeter for Hello {
        fn greet(&self) -> &'static str {
            "hello"
        }
    }

    #[test]
    fn empty_slot_is_unavailable() {
        let slot: ResourceSlot<dyn Greeter> = ResourceSlot::empty("greeter");
        assert!(!slot.is_ready());
        assert!(matches!(
            slot.get(),
            Err(RecitationError::ModelUnavailable { resource: "greeter" })
        ));
    }

    #[test]
    fn install_then_read() {
        let slot: ResourceSlot<dyn Greeter> = ResourceSlot::empty("greeter");
        slot.install(Arc::new(Hello)).expect("first install");
        assert!(slot.is_ready());
        assert_eq!(slot.get().expect("ready").greet(), "hello");
    }

    #[test]
    fn second_install_is_rejected() {
        let slot: ResourceSlot<dyn Greeter> = ResourceSlot::ready("greeter", Arc::new(Hello));
        assert!(slot.install(Arc::new(Hello)).is_err());
    }

    #[test]
    fn shared_slot_sees_late_install() {
        let slot: Arc<ResourceSlot<dyn Greeter>> = Arc::new(ResourceSlot::empty("greeter"));
        let reader = Arc::clone(&slot);
        let handle = std::thread::spawn(move || {
            slot.install(Arc::new(Hello)).expect("install");
        });
        handle.join().expect("join");
        assert!(reader.is_ready());
    }
}
