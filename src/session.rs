//! Current-document state with single-flight producer guarding.
//!
//! The whole editor reduces to one in-memory value: the current document.
//! Synchronous edits replace it atomically. Producer calls (generate or
//! optimize) replace the entire document too, so at most one may be in
//! flight; responses carry a request token that is checked at apply time so a
//! stale result can never overwrite newer state.

use crate::document::Document;
use thiserror::Error;

/// Opaque identifier for one outstanding producer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Returned when a producer request is started while another is pending.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("a generate/optimize request is already in flight")]
pub struct Busy;

/// Single source of truth for the editor's document.
#[derive(Debug)]
pub struct Session {
    current: Document,
    next_request: u64,
    in_flight: Option<u64>,
}

impl Session {
    pub fn new(current: Document) -> Session {
        Session {
            current,
            next_request: 0,
            in_flight: None,
        }
    }

    pub fn current(&self) -> &Document {
        &self.current
    }

    /// Start a producer request. Fails while another request is pending;
    /// the caller must reject or queue, never interleave.
    pub fn begin_request(&mut self) -> Result<RequestToken, Busy> {
        if self.in_flight.is_some() {
            return Err(Busy);
        }
        let id = self.next_request;
        self.next_request += 1;
        self.in_flight = Some(id);
        Ok(RequestToken(id))
    }

    /// Apply a producer result. Returns false (and discards the document)
    /// when the token no longer identifies the in-flight request.
    pub fn apply_response(&mut self, token: RequestToken, document: Document) -> bool {
        if self.in_flight != Some(token.0) {
            return false;
        }
        self.in_flight = None;
        self.current = document;
        true
    }

    /// Record a failed request so a new one can start. The current document
    /// is untouched.
    pub fn abort_request(&mut self, token: RequestToken) {
        if self.in_flight == Some(token.0) {
            self.in_flight = None;
        }
    }

    /// Direct replacement (template select, user edit). Abandons interest in
    /// any outstanding request; its eventual result will be discarded.
    #[allow(dead_code)]
    pub fn replace(&mut self, document: Document) {
        self.in_flight = None;
        self.current = document;
    }

    /// Replace with the result of a synchronous edit engine call.
    ///
    /// Unlike [`Session::replace`], this leaves an in-flight producer request
    /// pending: field edits do not cancel a generation the user is still
    /// waiting for.
    pub fn apply_edit(&mut self, document: Document) {
        self.current = document;
    }

    #[allow(dead_code)]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}
