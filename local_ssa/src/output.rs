// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Textual dumps of an SSA form.

use crate::local_ssa::{LocalSsa, Node};
use std::io::{self, Write};

impl LocalSsa<'_> {
    /// Print the content of every location that has any, one block per location.
    pub fn output<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for node in self.nodes().values().filter(|node| !node.is_empty()) {
            write_node(node, out)?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Like [LocalSsa::output], but every location gets a header with its number and source
    /// position, even if it has no content.
    pub fn output_verbose<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (loc, instruction) in self.program().iter() {
            writeln!(out, "*** {loc} {}", instruction.location().short_string())?;
            if let Some(node) = self.node_at(loc) {
                write_node(node, out)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

fn write_node<W: Write>(node: &Node, out: &mut W) -> io::Result<()> {
    for equality in &node.equalities {
        writeln!(out, "(E) {equality}")?;
    }
    for constraint in &node.constraints {
        writeln!(out, "(C) {constraint}")?;
    }
    if let Some(assertion) = &node.assertion {
        writeln!(out, "(A) {assertion}")?;
    }
    Ok(())
}
