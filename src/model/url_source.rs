// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Bookkeeping for the url-origin resolution path.
///
/// A recorded resolution is only meaningful while `requested_url` still
/// equals the url that produced it; `begin_request` therefore replaces both
/// fields together so a stale in-flight fetch can never be mistaken for the
/// current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlSource {
    requested_url: Option<String>,
    resolved_content: Option<String>,
}

impl UrlSource {
    pub fn requested_url(&self) -> Option<&str> {
        self.requested_url.as_deref()
    }

    pub fn resolved_content(&self) -> Option<&str> {
        self.resolved_content.as_deref()
    }

    /// Returns the recorded resolution if `url` is still the current request.
    pub fn resolution_for(&self, url: &str) -> Option<&str> {
        if self.requested_url.as_deref() == Some(url) {
            self.resolved_content.as_deref()
        } else {
            None
        }
    }

    /// Starts a new request. The placeholder stands in as the resolution
    /// until the fetch lands, so the share link keeps pointing at the url
    /// while the body is in flight.
    pub fn begin_request(&mut self, url: String, placeholder: String) {
        self.requested_url = Some(url);
        self.resolved_content = Some(placeholder);
    }

    pub fn record_resolution(&mut self, content: String) {
        self.resolved_content = Some(content);
    }

    pub fn clear(&mut self) {
        self.requested_url = None;
        self.resolved_content = None;
    }
}
