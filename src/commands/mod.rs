// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod settings;
pub mod transactions;

use anyhow::{anyhow, Result};

/// The acting user, from `--user` or `DUOLEDGER_USER`.
pub fn current_user(m: &clap::ArgMatches) -> Result<String> {
    m.get_one::<String>("user")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No user given: pass --user <name> or set DUOLEDGER_USER"))
}

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    m.get_one::<String>(name)
        .ok_or_else(|| anyhow!("Missing required argument --{}", name))
}
