// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Command line interface of `ssa-dump`.

use clap::{error::Error, error::ErrorKind};
use local_ssa::SsaOptions;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::filter::Directive;

/// Trait used to perform extra validation after parsing.
pub trait ValidateArgs {
    /// Perform post-parsing validation but do not abort.
    fn validate(&self) -> Result<(), Error>;
}

/// Validate a set of arguments and ensure they are in a valid state.
/// This method will abort execution with a user friendly error message if the state is invalid.
pub fn check_is_valid<T>(command: &T)
where
    T: clap::Parser + ValidateArgs,
{
    if let Err(e) = command.validate() {
        e.format(&mut T::command()).exit()
    }
}

#[derive(Debug, clap::Parser)]
#[command(
    version,
    name = "ssa-dump",
    about = "Print the local SSA form of a goto function",
    args_override_self = true
)]
pub struct DumpArgs {
    /// JSON file with the symbols, the function and the points-to sets of its pointers
    pub input: PathBuf,

    /// Print every location, with its number and source position, even if it is empty
    #[arg(long, short)]
    pub verbose: bool,

    /// Suffix appended to the versioned names
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Also emit every assertion as a constraint
    #[arg(long)]
    pub assertions_as_constraints: bool,

    /// Extra log filter directive, e.g. `local_ssa=trace`. Combined with `LOCAL_SSA_LOG`
    #[arg(long, value_name = "DIRECTIVE")]
    pub log_level: Option<String>,

    /// Print the logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl DumpArgs {
    pub fn ssa_options(&self) -> SsaOptions {
        SsaOptions::default()
            .with_suffix(self.suffix.clone())
            .with_assertions_to_constraints(self.assertions_as_constraints)
    }
}

impl ValidateArgs for DumpArgs {
    fn validate(&self) -> Result<(), Error> {
        if let Err(e) = self.ssa_options().validate() {
            return Err(Error::raw(ErrorKind::ValueValidation, format!("--suffix: {e}")));
        }
        if let Some(directive) = &self.log_level {
            if let Err(e) = Directive::from_str(directive) {
                return Err(Error::raw(
                    ErrorKind::ValueValidation,
                    format!("--log-level: invalid directive `{directive}`: {e}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_options() {
        let args = DumpArgs::try_parse_from([
            "ssa-dump",
            "f.json",
            "--suffix",
            "%1",
            "--assertions-as-constraints",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        assert!(!args.json_logs);
        assert_eq!(
            args.ssa_options(),
            SsaOptions { suffix: "%1".to_string(), assertions_to_constraints: true }
        );
        assert!(args.validate().is_ok());
    }

    #[test]
    fn reject_invalid_values() {
        let args = DumpArgs::try_parse_from(["ssa-dump", "f.json", "--suffix", "#1"]).unwrap();
        assert_eq!(args.validate().unwrap_err().kind(), ErrorKind::ValueValidation);
        let args = ["ssa-dump", "f.json", "--log-level", "local_ssa=loud"];
        let args = DumpArgs::try_parse_from(args).unwrap();
        assert_eq!(args.validate().unwrap_err().kind(), ErrorKind::ValueValidation);
        assert!(DumpArgs::try_parse_from(["ssa-dump"]).is_err());
    }
}
