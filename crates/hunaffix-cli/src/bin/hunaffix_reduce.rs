// hunaffix-reduce: infer a compact rule block for affix flags.
//
// For each requested flag the rule is rebuilt from what it produces across
// the dictionary, checked by re-expansion, and printed as affix-file
// lines. Several flags are reduced in parallel and printed in the order
// given, separated by blank lines. Without --flag every rule of the affix
// file is reduced, prefixes first. A flag that cannot be reduced is
// reported on stderr and the exit code is 1.
//
// Usage:
//   hunaffix-reduce [OPTIONS] [--flag <FLAG>...] <AFF> <DIC>

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use hunaffix_core::AffixType;
use hunaffix_engine::reducer::DEFAULT_ITERATION_LIMIT;
use hunaffix_engine::{ExpansionOptions, ReductionOptions};

/// Reduce Hunspell affix rules against a dictionary.
#[derive(Parser)]
#[command(name = "hunaffix-reduce", about = "Rebuild minimal, verified affix rules from a dictionary")]
struct Args {
    /// Affix file.
    aff: PathBuf,

    /// Dictionary file.
    dic: PathBuf,

    /// Flags to reduce (repeat or comma separate); all rules when absent.
    #[arg(short, long = "flag", value_delimiter = ',')]
    flags: Vec<String>,

    /// Widen conditions to the longest text their words share.
    #[arg(long)]
    keep_longest_common_affix: bool,

    /// Passes allowed before condition disjoining gives up.
    #[arg(long, default_value_t = DEFAULT_ITERATION_LIMIT)]
    iteration_limit: usize,

    /// Flags that may appear on words without a rule (comma separated).
    #[arg(long, value_delimiter = ',')]
    non_productive: Vec<String>,

    /// More log output on stderr (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    hunaffix_cli::init_logging(args.verbose);

    let mut workbench = hunaffix_cli::load_workbench(&args.aff, &args.dic)
        .unwrap_or_else(|e| hunaffix_cli::fatal(&e));
    workbench.set_expansion_options(ExpansionOptions::with_non_productive(
        args.non_productive.iter().cloned(),
    ));
    workbench.set_reduction_options(ReductionOptions {
        keep_longest_common_affix: args.keep_longest_common_affix,
        iteration_limit: args.iteration_limit,
        ..ReductionOptions::default()
    });

    let requested = if args.flags.is_empty() {
        let table = workbench.table();
        let mut all = table.flags_of(AffixType::Prefix);
        all.extend(table.flags_of(AffixType::Suffix));
        all
    } else {
        args.flags
    };
    let flags: Vec<&str> = requested.iter().map(String::as_str).collect();
    let results = if let [flag] = flags.as_slice() {
        let mut progress = |percent: u8| log::debug!("flag {flag}: {percent}%");
        vec![(flag.to_string(), workbench.reduce(flag, &mut progress))]
    } else {
        workbench.reduce_flags(&flags)
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut failed = false;
    let mut first = true;
    for (flag, result) in results {
        match result {
            Ok(lines) => {
                if !first {
                    let _ = writeln!(out);
                }
                first = false;
                for line in lines {
                    let _ = writeln!(out, "{line}");
                }
            }
            Err(e) => {
                log::error!("flag {flag}: {e}");
                failed = true;
            }
        }
    }
    let _ = out.flush();
    if failed {
        process::exit(1);
    }
}
