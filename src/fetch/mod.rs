// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! External content loading.
//!
//! The loader is stateless and may be called concurrently for different
//! urls; discarding stale results is entirely the caller's job. No retry and
//! no extra timeout beyond the transport default.

use std::fmt;

/// Fetches document text from a url.
pub trait ContentFetcher {
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<String, FetchError>> + Send;
}

/// Network failure or non-text response while resolving a url source.
///
/// The `Display` output is what ends up as the document content on failure,
/// so it stays a single human-readable line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

/// HTTP implementation on a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url: url::Url = url.parse().map_err(|_| FetchError::new(format!("invalid url: {url}")))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::new(format!("NetworkError: {err}")))?;
        if !response.status().is_success() {
            return Err(FetchError::new(format!("NetworkError: HTTP {}", response.status())));
        }
        response.text().await.map_err(|err| FetchError::new(format!("NetworkError: {err}")))
    }
}
