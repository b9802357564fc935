//! Counting/recording directory client double for the test modules.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{DirectoryClient, SearchScope, WireAttrs};
use crate::error::TransportError;
use crate::value::RawSearchResult;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchCall {
    pub base: String,
    pub filter: String,
    pub attrs: Vec<String>,
    pub limit: u32,
    pub scope: SearchScope,
}

/// Snapshot of everything the mock observed.
#[derive(Debug, Default, Clone)]
pub(crate) struct MockSnapshot {
    pub connects: usize,
    pub binds: usize,
    pub searches: Vec<SearchCall>,
    pub added: Vec<(String, WireAttrs)>,
    pub modified: Vec<(String, WireAttrs)>,
    pub deleted: Vec<String>,
}

#[derive(Default)]
pub(crate) struct MockDirectoryClient {
    connects: AtomicUsize,
    binds: AtomicUsize,
    bind_failure: Mutex<Option<String>>,
    write_failure: Mutex<Option<String>>,
    search_outcomes: Mutex<VecDeque<Result<Option<RawSearchResult>, TransportError>>>,
    searches: Mutex<Vec<SearchCall>>,
    added: Mutex<Vec<(String, WireAttrs)>>,
    modified: Mutex<Vec<(String, WireAttrs)>>,
    deleted: Mutex<Vec<String>>,
}

impl MockDirectoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next search; with an empty queue every search
    /// succeeds with zero matches.
    pub fn push_search_outcome(
        &self,
        outcome: Result<Option<RawSearchResult>, TransportError>,
    ) {
        self.search_outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn fail_bind(&self, text: &str) {
        *self.bind_failure.lock().unwrap() = Some(text.to_string());
    }

    pub fn fail_writes(&self, text: &str) {
        *self.write_failure.lock().unwrap() = Some(text.to_string());
    }

    pub fn state(&self) -> MockSnapshot {
        MockSnapshot {
            connects: self.connects.load(Ordering::SeqCst),
            binds: self.binds.load(Ordering::SeqCst),
            searches: self.searches.lock().unwrap().clone(),
            added: self.added.lock().unwrap().clone(),
            modified: self.modified.lock().unwrap().clone(),
            deleted: self.deleted.lock().unwrap().clone(),
        }
    }

    fn write_failure(&self) -> Option<TransportError> {
        self.write_failure
            .lock()
            .unwrap()
            .as_ref()
            .map(|text| TransportError::new(text.clone()))
    }
}

#[async_trait]
impl DirectoryClient for MockDirectoryClient {
    type Handle = ();

    async fn connect(&self, _host: &str, _port: u16) -> Result<(), TransportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn bind(
        &self,
        _handle: &mut (),
        _login: &str,
        _password: Option<&str>,
    ) -> Result<(), TransportError> {
        self.binds.fetch_add(1, Ordering::SeqCst);
        match self.bind_failure.lock().unwrap().as_ref() {
            Some(text) => Err(TransportError::new(text.clone())),
            None => Ok(()),
        }
    }

    async fn search(
        &self,
        _handle: &mut (),
        base: &str,
        filter: &str,
        attrs: &[String],
        limit: u32,
        scope: SearchScope,
    ) -> Result<Option<RawSearchResult>, TransportError> {
        self.searches.lock().unwrap().push(SearchCall {
            base: base.to_string(),
            filter: filter.to_string(),
            attrs: attrs.to_vec(),
            limit,
            scope,
        });
        self.search_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Some(RawSearchResult::default())))
    }

    async fn add_entry(
        &self,
        _handle: &mut (),
        dn: &str,
        attrs: WireAttrs,
    ) -> Result<(), TransportError> {
        if let Some(err) = self.write_failure() {
            return Err(err);
        }
        self.added.lock().unwrap().push((dn.to_string(), attrs));
        Ok(())
    }

    async fn modify_entry(
        &self,
        _handle: &mut (),
        dn: &str,
        attrs: WireAttrs,
    ) -> Result<(), TransportError> {
        if let Some(err) = self.write_failure() {
            return Err(err);
        }
        self.modified.lock().unwrap().push((dn.to_string(), attrs));
        Ok(())
    }

    async fn delete_entry(&self, _handle: &mut (), dn: &str) -> Result<(), TransportError> {
        if let Some(err) = self.write_failure() {
            return Err(err);
        }
        self.deleted.lock().unwrap().push(dn.to_string());
        Ok(())
    }
}
