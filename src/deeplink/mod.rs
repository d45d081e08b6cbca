// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Share-link fragments.
//!
//! A document serializes to a browser-style fragment (`#code=...` /
//! `#url=...`) so sessions can be shared as plain links. Decode and encode
//! are pure functions; [`DeepLinkRouter`] adds the one piece of state needed
//! to keep the two directions from feeding back into each other.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::model::{Document, UrlSource};

/// Escape set matching `encodeURIComponent`: everything except
/// alphanumerics and `-_.!~*'()`.
const FRAGMENT_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const CODE_PREFIX: &str = "code=";
const URL_PREFIX: &str = "url=";

/// What a fragment carries, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentPayload {
    /// Inline document content.
    Code(String),
    /// Reference to externally hosted content.
    Url(String),
    /// No usable payload.
    Empty,
}

/// Decodes a fragment into its payload. A leading `#` is optional; anything
/// that is neither `code=` nor `url=` decodes to [`FragmentPayload::Empty`].
pub fn decode_fragment(fragment: &str) -> FragmentPayload {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    if let Some(encoded) = fragment.strip_prefix(CODE_PREFIX) {
        FragmentPayload::Code(decode_component(encoded))
    } else if let Some(encoded) = fragment.strip_prefix(URL_PREFIX) {
        FragmentPayload::Url(decode_component(encoded))
    } else {
        FragmentPayload::Empty
    }
}

/// Encodes the document into a fragment.
///
/// Precedence, in order: content that equals the current url resolution
/// encodes as `#url=`; empty content encodes as the empty fragment; anything
/// else encodes as `#code=`.
pub fn encode_fragment(document: &Document, url_source: &UrlSource) -> String {
    let from_current_url = url_source
        .requested_url()
        .and_then(|url| url_source.resolution_for(url).map(|resolved| (url, resolved)))
        .filter(|(_, resolved)| *resolved == document.content());

    if let Some((url, _)) = from_current_url {
        format!("#{URL_PREFIX}{}", encode_component(url))
    } else if document.is_empty() {
        String::new()
    } else {
        format!("#{CODE_PREFIX}{}", encode_component(document.content()))
    }
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, FRAGMENT_COMPONENT).to_string()
}

fn decode_component(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Two-way mapping between the document and the share-link fragment.
///
/// The router remembers the last fragment it wrote so that observing its own
/// write (the moral equivalent of a `hashchange` fired by our own
/// `replaceState`) does not re-trigger the decode path.
#[derive(Debug, Default)]
pub struct DeepLinkRouter {
    last_written: Option<String>,
}

impl DeepLinkRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an externally observed fragment. Returns `None` for the
    /// router's own last write.
    pub fn observe(&mut self, fragment: &str) -> Option<FragmentPayload> {
        if self.last_written.as_deref() == Some(fragment) {
            return None;
        }
        Some(decode_fragment(fragment))
    }

    /// Re-serializes the document and records the result as our own write.
    pub fn serialize(&mut self, document: &Document, url_source: &UrlSource) -> &str {
        let fragment = encode_fragment(document, url_source);
        self.last_written = Some(fragment);
        self.last_written.as_deref().unwrap_or_default()
    }

    pub fn last_written(&self) -> Option<&str> {
        self.last_written.as_deref()
    }
}
