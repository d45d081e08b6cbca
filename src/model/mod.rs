// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core session state.
//!
//! A session holds exactly one logical document plus the bookkeeping for the
//! url source it may have been loaded from.

pub mod document;
pub mod url_source;

pub use document::{ContentOrigin, Document};
pub use url_source::UrlSource;

/// Fixed identity the compile session is bound to for the lifetime of the
/// client, independent of where the document content came from.
pub const DOCUMENT_URI: &str = "file:///LeanProject/LeanProject.lean";

/// Content shown while a url fetch is in flight.
pub const LOADING_PLACEHOLDER: &str = "Loading...";
