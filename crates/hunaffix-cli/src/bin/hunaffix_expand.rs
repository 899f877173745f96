// hunaffix-expand: print every inflection of every dictionary line.
//
// Output is one inflection per line, the word followed by its
// morphological fields, tab separated. Lines that fail to expand are
// reported on stderr and skipped. With --compound, compounds built from
// the whole dictionary follow the plain inflections.
//
// Usage:
//   hunaffix-expand [OPTIONS] <AFF> <DIC>

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hunaffix_aff::RuleProvider;
use hunaffix_engine::compound::DEFAULT_MAX_COMPONENTS;
use hunaffix_engine::{CompoundStrategy, ExpansionOptions};

/// How compounds are generated.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompoundMode {
    /// Every COMPOUNDRULE of the affix file.
    Rule,
    /// COMPOUNDFLAG.
    Flag,
    /// COMPOUNDBEGIN, COMPOUNDMIDDLE and COMPOUNDEND.
    Bme,
}

/// Expand a Hunspell dictionary with its affix file.
#[derive(Parser)]
#[command(name = "hunaffix-expand", about = "Print every inflection of a Hunspell dictionary")]
struct Args {
    /// Affix file.
    aff: PathBuf,

    /// Dictionary file.
    dic: PathBuf,

    /// Flags that may appear on words without a rule (comma separated).
    #[arg(long, value_delimiter = ',')]
    non_productive: Vec<String>,

    /// Also generate compounds.
    #[arg(long, value_enum)]
    compound: Option<CompoundMode>,

    /// Most compound words assembled per strategy.
    #[arg(long, default_value_t = 10_000)]
    limit: usize,

    /// Most components in one compound, unless COMPOUNDWORDMAX is lower.
    #[arg(long, default_value_t = DEFAULT_MAX_COMPONENTS)]
    max_components: usize,

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

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let mut progress = |percent: u8| log::info!("expanded {percent}%");
    let batch = workbench.expand_all(None, &mut progress);
    for (_, inflections) in &batch.inflections {
        for inflection in inflections {
            let _ = writeln!(out, "{}", hunaffix_cli::render(inflection));
        }
    }
    if !batch.failures.is_empty() {
        log::warn!("{} dictionary lines failed to expand", batch.failures.len());
    }

    let Some(mode) = args.compound else {
        return;
    };
    let rules = &workbench.table().options().compound_rules;
    let strategies: Vec<CompoundStrategy<'_>> = match mode {
        CompoundMode::Rule => rules.iter().map(|r| CompoundStrategy::ByRule(r.as_str())).collect(),
        CompoundMode::Flag => vec![CompoundStrategy::ByFlag],
        CompoundMode::Bme => vec![CompoundStrategy::ByBeginMiddleEnd],
    };
    for strategy in strategies {
        match workbench.compounds(strategy, args.limit, args.max_components) {
            Ok(compounds) => {
                log::info!("{strategy:?}: {} compound forms", compounds.len());
                for inflection in &compounds {
                    let _ = writeln!(out, "{}", hunaffix_cli::render(inflection));
                }
            }
            Err(e) => {
                let _ = out.flush();
                hunaffix_cli::fatal(&format!("{strategy:?}: {e}"));
            }
        }
    }
}
