type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

// One-shot "ready to serve" signal fired by the host.
#[derive(Default)]
pub struct Lifecycle {
    ready_callbacks: Vec<ReadyCallback>,
    ready: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    // Late subscribers run immediately.
    pub fn on_ready<F>(&mut self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.ready {
            callback();
        } else {
            self.ready_callbacks.push(Box::new(callback));
        }
    }

    pub fn notify_ready(&mut self) {
        if self.ready {
            log::debug!("Ready signal already delivered, ignoring");
            return;
        }
        self.ready = true;

        let callbacks = std::mem::take(&mut self.ready_callbacks);
        log::debug!("Delivering ready signal to {} subscriber(s)", callbacks.len());
        for callback in callbacks {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn callbacks_wait_for_ready() {
        let mut lifecycle = Lifecycle::new();
        let (count, callback) = counter();
        lifecycle.on_ready(callback);

        assert_eq!(count.load(Ordering::SeqCst), 0);

        lifecycle.notify_ready();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_notification_is_ignored() {
        let mut lifecycle = Lifecycle::new();
        let (count, callback) = counter();
        lifecycle.on_ready(callback);

        lifecycle.notify_ready();
        lifecycle.notify_ready();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn late_subscriber_runs_immediately() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.notify_ready();

        let (count, callback) = counter();
        lifecycle.on_ready(callback);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        lifecycle.notify_ready();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callbacks_run_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut lifecycle = Lifecycle::new();
        for i in 0..3 {
            let order = order.clone();
            lifecycle.on_ready(move || order.lock().unwrap().push(i));
        }
        lifecycle.notify_ready();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }
}
