// ============================================================================
// LIFETIME - Cancelación ligada a la vida de una vista
// ============================================================================
// Una vista crea un ViewScope al montarse; al desmontarse (Drop) el token
// queda cancelado y cualquier respuesta que llegue después se descarta en
// lugar de aplicarse sobre estado viejo.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Envuelve un resultado ya recibido según el estado del token
    pub fn settle<T>(&self, value: T) -> Loaded<T> {
        if self.is_cancelled() {
            log::debug!("🗑️ Respuesta descartada: la vista ya no existe");
            Loaded::Discarded
        } else {
            Loaded::Ready(value)
        }
    }
}

/// Dueño del token: cancela al salir de alcance
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Loaded<T> {
    Ready(T),
    Discarded,
}

impl<T> Loaded<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Loaded::Ready(value) => Some(value),
            Loaded::Discarded => None,
        }
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Loaded::Discarded)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        match self {
            Loaded::Ready(value) => Loaded::Ready(f(value)),
            Loaded::Discarded => Loaded::Discarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_the_scope_cancels_clones_of_the_token() {
        let scope = ViewScope::new();
        let token = scope.token().clone();
        assert_eq!(token.settle(1), Loaded::Ready(1));

        drop(scope);

        assert!(token.is_cancelled());
        assert!(token.settle(1).is_discarded());
    }

    #[test]
    fn map_and_ready_pass_through() {
        assert_eq!(Loaded::Ready(2).map(|n| n * 2).ready(), Some(4));
        assert_eq!(Loaded::<i32>::Discarded.map(|n| n * 2).ready(), None);
    }
}
