// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::required;
use crate::models::Kind;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn common_categories(kind: Kind) -> &'static [&'static str] {
    match kind {
        Kind::Income => &["Salário", "Freelance", "Rendimentos", "Outros"],
        Kind::Expense => &[
            "Moradia",
            "Alimentação",
            "Transporte",
            "Saúde",
            "Lazer",
            "Educação",
            "Vestuário",
            "Contas",
            "Outros",
        ],
        Kind::Investment => &[
            "Ações",
            "Fundos Imobiliários",
            "Renda Fixa",
            "Criptomoedas",
            "Outros",
        ],
    }
}

/// Built-in suggestions for `kind` followed by any other category already
/// logged with that kind, alphabetically.
pub fn suggestions(conn: &Connection, kind: Kind) -> Result<Vec<String>> {
    let mut out: Vec<String> = common_categories(kind)
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut stmt =
        conn.prepare("SELECT DISTINCT category FROM transactions WHERE kind=?1 ORDER BY category")?;
    let rows = stmt.query_map(params![kind.as_str()], |r| r.get::<_, String>(0))?;
    for row in rows {
        let name = row?;
        if !out.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
            out.push(name);
        }
    }
    Ok(out)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("suggest", sub)) = m.subcommand() {
        let kind: Kind = required(sub, "type")?.parse()?;
        let data = suggestions(conn, kind)?
            .into_iter()
            .map(|c| vec![c])
            .collect();
        println!("{}", pretty_table(&["Category"], data));
    }
    Ok(())
}
