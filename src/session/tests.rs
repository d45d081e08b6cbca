// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{ResolveOutcome, SessionController};
use crate::fetch::FetchError;
use crate::model::{ContentOrigin, LOADING_PLACEHOLDER};

const FILE_URL: &str = "https://x.test/f.lean";
const OTHER_URL: &str = "https://x.test/other.lean";

#[fixture]
fn controller() -> SessionController {
    SessionController::new()
}

#[rstest]
fn startup_code_fragment_initializes_the_document(mut controller: SessionController) {
    let ticket = controller.initialize("#code=example%20text");
    assert!(ticket.is_none());
    assert_eq!(controller.content(), "example text");
    assert_eq!(controller.document().origin(), ContentOrigin::Hash);
}

#[rstest]
fn startup_empty_fragment_has_no_effect(mut controller: SessionController) {
    assert!(controller.initialize("").is_none());
    assert_eq!(controller.content(), "");
    assert_eq!(controller.document().origin(), ContentOrigin::Empty);
    assert_eq!(controller.share_fragment(), "");
}

#[rstest]
fn startup_url_fragment_requests_a_fetch(mut controller: SessionController) {
    let ticket = controller
        .initialize("#url=https%3A%2F%2Fx.test%2Ff.lean")
        .expect("url fragment should need a fetch");
    assert_eq!(ticket.url(), FILE_URL);
    assert_eq!(controller.content(), LOADING_PLACEHOLDER);

    let outcome = controller.resolve_url(&ticket, Ok("theorem foo".to_owned()));
    assert_eq!(outcome, ResolveOutcome::Committed);
    assert_eq!(controller.content(), "theorem foo");
    assert_eq!(controller.document().origin(), ContentOrigin::Url);
    assert_eq!(controller.share_fragment(), "#url=https%3A%2F%2Fx.test%2Ff.lean");
}

#[rstest]
fn edits_always_win_the_document_and_the_fragment(mut controller: SessionController) {
    controller.initialize("#code=before");
    controller.on_editor_edit("after edit");

    assert_eq!(controller.document().origin(), ContentOrigin::LiveEdit);
    assert_eq!(controller.share_fragment(), "#code=after%20edit");
}

#[rstest]
fn reloading_a_resolved_url_skips_the_network(mut controller: SessionController) {
    let ticket = controller.load_from_url(FILE_URL).expect("first load fetches");
    controller.resolve_url(&ticket, Ok("body".to_owned()));

    controller.on_editor_edit("scratch");
    let second = controller.load_from_url(FILE_URL);

    assert!(second.is_none(), "reload of a resolved url must not refetch");
    assert_eq!(controller.content(), "body");
    assert_eq!(controller.document().origin(), ContentOrigin::Url);
}

#[rstest]
fn reloading_the_same_url_while_in_flight_issues_a_new_token(mut controller: SessionController) {
    let first = controller.load_from_url(FILE_URL).expect("first load fetches");
    let second = controller
        .load_from_url(FILE_URL)
        .expect("same url, new request gets its own token");
    assert_ne!(first, second);

    // The older response for the same url no longer counts.
    assert_eq!(
        controller.resolve_url(&first, Ok("old body".to_owned())),
        ResolveOutcome::Discarded
    );
    assert_eq!(controller.content(), LOADING_PLACEHOLDER);

    assert_eq!(
        controller.resolve_url(&second, Ok("new body".to_owned())),
        ResolveOutcome::Committed
    );
    assert_eq!(controller.content(), "new body");
}

#[rstest]
fn stale_resolution_for_a_superseded_url_is_discarded(mut controller: SessionController) {
    let first = controller.load_from_url(FILE_URL).expect("first load fetches");
    let second = controller.load_from_url(OTHER_URL).expect("second load fetches");

    assert_eq!(
        controller.resolve_url(&first, Ok("from first".to_owned())),
        ResolveOutcome::Discarded
    );
    assert_eq!(controller.content(), LOADING_PLACEHOLDER);

    assert_eq!(
        controller.resolve_url(&second, Ok("from second".to_owned())),
        ResolveOutcome::Committed
    );
    assert_eq!(controller.content(), "from second");
    assert_eq!(controller.share_fragment(), "#url=https%3A%2F%2Fx.test%2Fother.lean");
}

/// The original client lets a late resolution for the still-current url
/// clobber a live edit; here the edit deliberately wins (see DESIGN.md).
#[rstest]
fn stale_resolution_after_edit_is_discarded(mut controller: SessionController) {
    let ticket = controller.load_from_url(FILE_URL).expect("load fetches");
    controller.on_editor_edit("my edit");

    assert_eq!(
        controller.resolve_url(&ticket, Ok("fetched body".to_owned())),
        ResolveOutcome::Discarded
    );
    assert_eq!(controller.content(), "my edit");
    assert_eq!(controller.document().origin(), ContentOrigin::LiveEdit);
    assert_eq!(controller.share_fragment(), "#code=my%20edit");
}

#[rstest]
fn edit_superseded_resolution_still_warms_the_cache(mut controller: SessionController) {
    let ticket = controller.load_from_url(FILE_URL).expect("load fetches");
    controller.on_editor_edit("my edit");
    controller.resolve_url(&ticket, Ok("fetched body".to_owned()));

    // A later reload of the same url applies the cached body, no refetch.
    assert!(controller.load_from_url(FILE_URL).is_none());
    assert_eq!(controller.content(), "fetched body");
}

#[rstest]
fn failed_fetch_surfaces_the_error_text_as_content(mut controller: SessionController) {
    let ticket = controller.load_from_url(FILE_URL).expect("load fetches");
    let outcome = controller.resolve_url(&ticket, Err(FetchError::new("NetworkError")));

    assert_eq!(outcome, ResolveOutcome::Committed);
    assert_eq!(controller.content(), "NetworkError");
    assert_eq!(controller.document().origin(), ContentOrigin::Url);
    // The error text is recorded as the url's resolution, so the share link
    // keeps pointing at the url rather than embedding the error message.
    assert_eq!(controller.share_fragment(), "#url=https%3A%2F%2Fx.test%2Ff.lean");
}

#[rstest]
fn file_load_clears_the_pending_url(mut controller: SessionController) {
    let ticket = controller.load_from_url(FILE_URL).expect("load fetches");
    controller.load_from_file("from disk");

    assert_eq!(controller.document().origin(), ContentOrigin::File);
    assert_eq!(
        controller.resolve_url(&ticket, Ok("late body".to_owned())),
        ResolveOutcome::Discarded
    );
    assert_eq!(controller.content(), "from disk");
    assert_eq!(controller.share_fragment(), "#code=from%20disk");
}

#[rstest]
fn observe_ignores_our_own_last_write(mut controller: SessionController) {
    controller.on_editor_edit("abc");
    let own = controller.share_fragment().to_owned();
    assert!(controller.observe_fragment(&own).is_none());
    assert_eq!(controller.content(), "abc");

    assert!(controller.observe_fragment("#code=pasted").is_none());
    assert_eq!(controller.content(), "pasted");
    assert_eq!(controller.document().origin(), ContentOrigin::Hash);
}

#[rstest]
fn save_exposes_content_without_state_change(mut controller: SessionController) {
    controller.on_editor_edit("keep me");
    assert_eq!(controller.save(), "keep me");
    assert_eq!(controller.document().origin(), ContentOrigin::LiveEdit);
}
