use std::rc::Rc;

use log::debug;

use crate::model::TransportMode;

/// A change committed by the network. Observers receive these after the
/// mutation has taken effect.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    StopAdded { code: String },
    StopRemoved { code: String },
    RouteAdded { from: String, to: String, mode: TransportMode },
    EdgeRemoved { from: String, to: String },
    RoutesDisabled { from: String, to: String, count: usize },
    DurationChanged { from: String, to: String, duration: u32 },
    StateRestored,
}

/// Anything that wants to hear about network changes. Delivery is synchronous
/// and fire-and-forget: the triggering mutation has already committed.
pub trait Observer {
    fn receive(&self, event: &NetworkEvent);
}

/// De-duplicated listener registry, notified in registration order.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    observers: Vec<Rc<dyn Observer>>,
}

impl ObserverRegistry {
    pub(crate) fn add(&mut self, observer: Rc<dyn Observer>) {
        let already_registered = self
            .observers
            .iter()
            .any(|existing| Rc::ptr_eq(existing, &observer));
        if !already_registered {
            self.observers.push(observer);
        }
    }

    pub(crate) fn remove(&mut self, observer: &Rc<dyn Observer>) {
        self.observers
            .retain(|existing| !Rc::ptr_eq(existing, observer));
    }

    pub(crate) fn notify(&self, event: &NetworkEvent) {
        debug!("notifying {} observer(s): {event:?}", self.observers.len());
        for observer in &self.observers {
            observer.receive(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        seen: RefCell<Vec<NetworkEvent>>,
    }

    impl Recorder {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                seen: RefCell::new(Vec::new()),
            })
        }
    }

    impl Observer for Recorder {
        fn receive(&self, event: &NetworkEvent) {
            self.seen.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut registry = ObserverRegistry::default();
        let recorder = Recorder::new();
        registry.add(recorder.clone());
        registry.add(recorder.clone());
        assert_eq!(registry.len(), 1);

        registry.notify(&NetworkEvent::StateRestored);
        assert_eq!(recorder.seen.borrow().len(), 1);
    }

    #[test]
    fn removal_stops_delivery() {
        let mut registry = ObserverRegistry::default();
        let recorder = Recorder::new();
        let observer: Rc<dyn Observer> = recorder.clone();
        registry.add(observer.clone());
        registry.remove(&observer);

        registry.notify(&NetworkEvent::StateRestored);
        assert!(recorder.seen.borrow().is_empty());
    }

    #[test]
    fn delivery_follows_registration_order() {
        struct Tagger {
            tag: usize,
            order: Rc<RefCell<Vec<usize>>>,
        }
        impl Observer for Tagger {
            fn receive(&self, _event: &NetworkEvent) {
                self.order.borrow_mut().push(self.tag);
            }
        }

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ObserverRegistry::default();
        for tag in 0..3 {
            registry.add(Rc::new(Tagger {
                tag,
                order: order.clone(),
            }));
        }

        registry.notify(&NetworkEvent::StateRestored);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }
}
