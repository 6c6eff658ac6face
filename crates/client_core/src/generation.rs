//! Stale-response suppression for per-screen requests.
//!
//! Every request takes a ticket carrying the generation it was issued under
//! and the identifier it asked for. Starting another request or leaving the
//! screen advances the generation, so a response is applied only while its
//! ticket is still current.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket<K> {
    generation: u64,
    key: K,
}

impl<K> RequestTicket<K> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug)]
pub struct RequestGenerations<K> {
    current: u64,
    active: Option<K>,
}

impl<K> Default for RequestGenerations<K> {
    fn default() -> Self {
        Self {
            current: 0,
            active: None,
        }
    }
}

impl<K: Clone + PartialEq> RequestGenerations<K> {
    pub fn begin(&mut self, key: K) -> RequestTicket<K> {
        self.current += 1;
        self.active = Some(key.clone());
        RequestTicket {
            generation: self.current,
            key,
        }
    }

    pub fn invalidate(&mut self) {
        self.current += 1;
        self.active = None;
    }

    pub fn is_current(&self, ticket: &RequestTicket<K>) -> bool {
        ticket.generation == self.current && self.active.as_ref() == Some(&ticket.key)
    }

    /// Consumes the ticket if it is current; a finished ticket cannot be
    /// applied twice.
    pub fn complete(&mut self, ticket: &RequestTicket<K>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.active = None;
        true
    }
}
