// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Filter directives, e.g. `DUOLEDGER_LOG=duoledger=debug`.
pub const LOG_ENV: &str = "DUOLEDGER_LOG";

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber once. Logs go to stderr so that tables and
/// JSON on stdout stay machine-readable.
pub fn init() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
