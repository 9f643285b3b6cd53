/// A single-subscriber output channel.
///
/// Holds at most one borrowed handler; registering again replaces the previous
/// one. The driver never owns the handler, it only calls it from the
/// interrupt path.
pub struct Callback<'a, A> {
    handler: Option<&'a mut dyn FnMut(A)>,
}

impl<'a, A> Callback<'a, A> {
    pub fn new() -> Self {
        Self { handler: None }
    }

    pub fn register(&mut self, handler: &'a mut dyn FnMut(A)) {
        self.handler = Some(handler);
    }

    pub fn clear(&mut self) {
        self.handler = None;
    }

    pub fn is_registered(&self) -> bool {
        self.handler.is_some()
    }

    /// Calls the handler if one is registered. Returns whether it was called.
    pub fn emit(&mut self, args: A) -> bool {
        match self.handler.as_mut() {
            Some(handler) => {
                handler(args);
                true
            }
            None => false,
        }
    }
}

impl<A> Default for Callback<'_, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn emit_without_handler_is_noop() {
        let mut cb: Callback<'_, u32> = Callback::new();
        assert!(!cb.is_registered());
        assert!(!cb.emit(5));
    }

    #[test]
    fn register_replaces_previous_handler() {
        let first = Cell::new(0);
        let second = Cell::new(0);
        let mut on_first = |v: u32| first.set(first.get() + v);
        let mut on_second = |v: u32| second.set(second.get() + v);

        let mut cb = Callback::new();
        cb.register(&mut on_first);
        assert!(cb.emit(2));
        cb.register(&mut on_second);
        assert!(cb.emit(3));
        cb.clear();
        assert!(!cb.emit(7));

        assert_eq!(first.get(), 2);
        assert_eq!(second.get(), 3);
    }
}
