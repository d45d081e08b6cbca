// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Thetis — terminal playground client for Lean remote compile sessions.
//!
//! One logical document, four sources of truth (live edits, share-link
//! fragment, url fetch, local file), one persistent compile session. The
//! session controller arbitrates the sources; the deep-link router mirrors
//! the document into a shareable fragment; the connection manager owns the
//! websocket lifecycle.

pub mod connect;
pub mod deeplink;
pub mod fetch;
pub mod files;
pub mod model;
pub mod session;
pub mod tui;
