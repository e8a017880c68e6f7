use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::event::PageChange;

pub type PageListener = Box<dyn FnMut(&PageChange)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Page-change subscribers: in-thread callbacks plus channel subscribers for
/// consumers living elsewhere.
#[derive(Default)]
pub struct ListenerSet {
    next_id: u64,
    callbacks: Vec<(ListenerId, PageListener)>,
    channels: Vec<flume::Sender<PageChange>>,
}

impl ListenerSet {
    pub fn add(&mut self, listener: impl FnMut(&PageChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.callbacks.push((id, Box::new(listener)));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn subscribe(&mut self) -> flume::Receiver<PageChange> {
        let (tx, rx) = flume::unbounded();
        self.channels.push(tx);
        rx
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len() + self.channels.len()
    }

    /// Runs every callback in isolation; a panicking listener is reported and
    /// stays registered. Returns the number of listeners that panicked.
    pub fn notify(&mut self, change: &PageChange) -> usize {
        let mut failed = 0;
        for (id, listener) in &mut self.callbacks {
            let result = panic::catch_unwind(AssertUnwindSafe(|| listener(change)));
            if let Err(payload) = result {
                failed += 1;
                log::error!(
                    "page listener {id:?} panicked on {} -> {}: {}",
                    change.from,
                    change.to,
                    panic_message(payload.as_ref())
                );
            }
        }
        self.channels.retain(|tx| tx.send(change.clone()).is_ok());
        failed
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("callbacks", &self.callbacks.len())
            .field("channels", &self.channels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::ListenerSet;
    use crate::event::{NavReason, PageChange};

    fn change(from: &str, to: &str) -> PageChange {
        PageChange {
            from: from.into(),
            to: to.into(),
            reason: NavReason::Navigate,
        }
    }

    #[test]
    fn panicking_listener_does_not_stop_the_others() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut set = ListenerSet::default();
        set.add(|_| panic!("render failed"));
        let sink = Rc::clone(&seen);
        set.add(move |change| sink.borrow_mut().push(change.to.clone()));

        assert_eq!(set.notify(&change("dashboard", "grades")), 1);
        assert_eq!(set.notify(&change("grades", "library")), 1);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let calls = Rc::new(RefCell::new(0));
        let mut set = ListenerSet::default();
        let counter = Rc::clone(&calls);
        let id = set.add(move |_| *counter.borrow_mut() += 1);

        assert!(set.remove(id));
        assert!(!set.remove(id));
        set.notify(&change("a", "b"));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut set = ListenerSet::default();
        let rx = set.subscribe();
        let dropped = set.subscribe();
        drop(dropped);

        set.notify(&change("a", "b"));
        assert_eq!(set.len(), 1);
        assert_eq!(rx.try_recv().expect("change delivered"), change("a", "b"));
    }
}
