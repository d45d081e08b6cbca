// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// Where the current document content came from.
///
/// At most one origin is authoritative at a time; `content` always reflects
/// the most recent terminal write from that origin's resolution path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentOrigin {
    Empty,
    Hash,
    Url,
    File,
    LiveEdit,
}

impl fmt::Display for ContentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Empty => "empty",
            Self::Hash => "hash",
            Self::Url => "url",
            Self::File => "file",
            Self::LiveEdit => "live-edit",
        };
        f.write_str(label)
    }
}

/// The single logical document the whole client revolves around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    content: String,
    origin: ContentOrigin,
}

impl Document {
    pub fn empty() -> Self {
        Self { content: String::new(), origin: ContentOrigin::Empty }
    }

    pub fn new(content: impl Into<String>, origin: ContentOrigin) -> Self {
        Self { content: content.into(), origin }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> ContentOrigin {
        self.origin
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
