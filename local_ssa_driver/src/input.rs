// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The JSON file `ssa-dump` reads.

use anyhow::{bail, Context, Result};
use goto_ir::goto_program::{GotoFunction, Symbol, SymbolTable};
use local_ssa::PointsToMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// One function, together with the symbols it refers to and, optionally, the objects each of
/// its pointers may point to.
#[derive(Debug, Serialize, Deserialize)]
pub struct DumpInput {
    pub symbols: Vec<Symbol>,
    pub function: GotoFunction,
    #[serde(default)]
    pub points_to: BTreeMap<String, Vec<String>>,
}

impl DumpInput {
    pub fn read(path: &Path) -> Result<DumpInput> {
        let file =
            File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
        let input: DumpInput = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        debug!(
            symbols = input.symbols.len(),
            locations = input.function.body.len(),
            pointers = input.points_to.len(),
            "read input"
        );
        Ok(input)
    }

    pub fn symbol_table(&self) -> Result<SymbolTable> {
        let mut st = SymbolTable::new();
        for symbol in &self.symbols {
            if st.contains(symbol.name) {
                bail!("symbol `{}` is defined twice", symbol.name);
            }
            st.insert(symbol.clone());
        }
        Ok(st)
    }

    pub fn points_to(&self) -> PointsToMap {
        self.points_to
            .iter()
            .map(|(pointer, targets)| (pointer.as_str(), targets.clone()))
            .collect()
    }
}
