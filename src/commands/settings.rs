// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::required;
use crate::utils::set_currency_symbol;
use anyhow::{bail, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("currency", sub)) = m.subcommand() {
        let symbol = required(sub, "symbol")?.trim();
        if symbol.is_empty() {
            bail!("Currency symbol must not be empty");
        }
        set_currency_symbol(conn, symbol)?;
        println!("Currency symbol set to '{}'", symbol);
    }
    Ok(())
}
