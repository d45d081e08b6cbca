// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Thetis CLI entrypoint.
//!
//! Runs the interactive playground TUI. A share link (or bare fragment) may
//! be passed to open a session with content, and `--connect` points the
//! compile session at a websocket endpoint.

use std::error::Error;

const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8080/websocket";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<share-link>] [--connect <ws-url>]\n  {program} [<share-link>] --offline\n\n<share-link> is a fragment like '#code=...' or '#url=...' (a full link\ncontaining one is also accepted).\n\n--connect selects the compile server websocket endpoint\n(default {DEFAULT_ENDPOINT}).\n--offline runs without a compile session."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    share_link: Option<String>,
    connect: Option<String>,
    offline: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--connect" => {
                if options.connect.is_some() {
                    return Err(());
                }
                let endpoint = args.next().ok_or(())?;
                options.connect = Some(endpoint);
            }
            "--offline" => {
                if options.offline {
                    return Err(());
                }
                options.offline = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.share_link.is_some() {
                    return Err(());
                }
                options.share_link = Some(arg);
            }
        }
    }

    if options.offline && options.connect.is_some() {
        return Err(());
    }

    Ok(options)
}

/// Accepts either a bare fragment or a full link and keeps the fragment.
fn extract_fragment(share_link: &str) -> String {
    match share_link.find('#') {
        Some(position) => share_link[position..].to_owned(),
        None => share_link.to_owned(),
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "thetis".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let endpoint = if options.offline {
            None
        } else {
            Some(options.connect.unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()))
        };
        let fragment = options.share_link.as_deref().map(extract_fragment);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(thetis::tui::run(thetis::tui::RunOptions { fragment, endpoint }))?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("thetis: {err}");
        std::process::exit(1);
    }
}
