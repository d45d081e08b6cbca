// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session controller.
//!
//! Canonical owner of the document; the single place where conflicting
//! writes from the four sources of truth (live edits, share-link fragment,
//! url fetch, local file) are arbitrated.
//!
//! The controller is a synchronous state machine. It never performs network
//! io itself: `load_from_url` hands out a [`FetchTicket`] and the driver
//! (the TUI loop, or a test) fetches and feeds the outcome back through
//! `resolve_url`. Tickets carry a request token and the edit sequence number
//! at issue time; a resolution commits only if both still match, so a stale
//! fetch can neither override a newer request nor clobber a live edit.

use crate::deeplink::{decode_fragment, DeepLinkRouter, FragmentPayload};
use crate::fetch::FetchError;
use crate::model::{ContentOrigin, Document, UrlSource, LOADING_PLACEHOLDER};

/// A url fetch the driver still has to perform.
///
/// `token` identifies the request (monotonically increasing per
/// `load_from_url` call, so "same url, new request" is distinct from "same
/// url, stale response"); `edit_seq` pins the edit state the request was
/// issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    token: u64,
    edit_seq: u64,
    url: String,
}

impl FetchTicket {
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Whether a fetch resolution was applied to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    Committed,
    /// Superseded by a later request, an edit, or a file load. Not an error;
    /// silently dropped by design.
    Discarded,
}

#[derive(Debug, Default)]
pub struct SessionController {
    document: Document,
    url_source: UrlSource,
    router: DeepLinkRouter,
    next_token: u64,
    current_token: Option<u64>,
    edit_seq: u64,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current document content, as bound to the editor surface.
    pub fn content(&self) -> &str {
        self.document.content()
    }

    /// The share-link fragment mirroring the current document.
    pub fn share_fragment(&self) -> &str {
        self.router.last_written().unwrap_or_default()
    }

    /// Reads the startup fragment once. Inline text becomes the document;
    /// a url payload yields a ticket the driver must fetch; an empty
    /// fragment has no effect.
    pub fn initialize(&mut self, fragment: &str) -> Option<FetchTicket> {
        match decode_fragment(fragment) {
            FragmentPayload::Code(text) => {
                self.document = Document::new(text, ContentOrigin::Hash);
                self.reserialize();
                None
            }
            FragmentPayload::Url(url) => self.load_from_url(url),
            FragmentPayload::Empty => None,
        }
    }

    /// An externally observed fragment change (a pasted share link). The
    /// router swallows our own last write.
    pub fn observe_fragment(&mut self, fragment: &str) -> Option<FetchTicket> {
        match self.router.observe(fragment)? {
            FragmentPayload::Code(text) => {
                self.document = Document::new(text, ContentOrigin::Hash);
                self.reserialize();
                None
            }
            FragmentPayload::Url(url) => self.load_from_url(url),
            FragmentPayload::Empty => None,
        }
    }

    /// A live edit. Unconditionally overrides any prior origin and bumps the
    /// edit sequence number so in-flight resolutions are discarded.
    pub fn on_editor_edit(&mut self, text: impl Into<String>) {
        self.edit_seq += 1;
        self.document = Document::new(text, ContentOrigin::LiveEdit);
        self.reserialize();
    }

    /// Requests url content.
    ///
    /// Reloading a url whose fetch has already landed re-applies the
    /// recorded resolution without a network round trip. Anything else
    /// (a different url, or the same url while a fetch is still in flight)
    /// issues a fresh ticket and parks the loading placeholder in the
    /// document.
    pub fn load_from_url(&mut self, url: impl Into<String>) -> Option<FetchTicket> {
        let url = url.into();
        if self.current_token.is_none() {
            if let Some(resolved) = self.url_source.resolution_for(&url) {
                self.document = Document::new(resolved, ContentOrigin::Url);
                self.reserialize();
                return None;
            }
        }

        self.url_source.begin_request(url.clone(), LOADING_PLACEHOLDER.to_owned());
        self.document = Document::new(LOADING_PLACEHOLDER, ContentOrigin::Url);
        self.reserialize();

        self.next_token += 1;
        let token = self.next_token;
        self.current_token = Some(token);
        Some(FetchTicket { token, edit_seq: self.edit_seq, url })
    }

    /// Feeds a fetch outcome back in.
    ///
    /// A ticket superseded by a later request or a file load is discarded
    /// without touching anything. A ticket for the still-current request
    /// always warms the resolution cache, but commits to the document only
    /// if no edit happened since it was issued — the edit wins. A failure
    /// that commits surfaces the error text as the document content itself
    /// (so the user can see it and retry); there is no structured error
    /// channel and no automatic retry.
    pub fn resolve_url(
        &mut self,
        ticket: &FetchTicket,
        result: Result<String, FetchError>,
    ) -> ResolveOutcome {
        if self.current_token != Some(ticket.token) {
            return ResolveOutcome::Discarded;
        }
        self.current_token = None;

        let content = match result {
            Ok(content) => content,
            Err(err) => err.to_string(),
        };
        self.url_source.record_resolution(content.clone());

        if self.edit_seq != ticket.edit_seq {
            return ResolveOutcome::Discarded;
        }

        self.document = Document::new(content, ContentOrigin::Url);
        self.reserialize();
        ResolveOutcome::Committed
    }

    /// A locally loaded file. Clears any pending url so the fetch that may
    /// still be in flight resolves into the void.
    pub fn load_from_file(&mut self, text: impl Into<String>) {
        self.url_source.clear();
        self.current_token = None;
        self.document = Document::new(text, ContentOrigin::File);
        self.reserialize();
    }

    /// Content to offer for download; no state change.
    pub fn save(&self) -> &str {
        self.document.content()
    }

    fn reserialize(&mut self) {
        self.router.serialize(&self.document, &self.url_source);
    }
}

#[cfg(test)]
mod tests;
