// hunaffix-cli: shared utilities for the command-line tools.

use std::path::Path;
use std::process;

use hunaffix_core::Inflection;
use hunaffix_engine::Workbench;
use log::{LevelFilter, Log, Metadata, Record};

/// Read a whole text file, naming the file in the error.
pub fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))
}

/// Load an affix file and a dictionary file into a workbench.
///
/// Unreadable dictionary lines are logged and skipped; only an unreadable
/// file or a malformed affix file is an error.
pub fn load_workbench(aff: &Path, dic: &Path) -> Result<Workbench, String> {
    let aff_text = read_file(aff)?;
    let dic_text = read_file(dic)?;
    let (workbench, failures) = Workbench::from_texts(&aff_text, &dic_text)
        .map_err(|e| format!("{}: {e}", aff.display()))?;
    if !failures.is_empty() {
        log::warn!(
            "{}: {} unreadable lines skipped",
            dic.display(),
            failures.len()
        );
    }
    log::info!(
        "loaded {} dictionary entries and {} rules",
        workbench.entries().len(),
        workbench.table().len()
    );
    Ok(workbench)
}

/// One output line: the word followed by its morphological fields.
pub fn render(inflection: &Inflection) -> String {
    let mut line = inflection.word.clone();
    for field in &inflection.morph_fields {
        line.push('\t');
        line.push_str(field);
    }
    line
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Log level for a number of `-v` flags.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger. Later calls do nothing.
pub fn init_logging(verbosity: u8) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_for(verbosity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hunaffix_core::DictionaryEntry;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }

    #[test]
    fn render_word_and_fields() {
        let entry = DictionaryEntry::new(
            "cat".to_string(),
            Vec::new(),
            vec!["po:noun".to_string(), "is:sg".to_string()],
        );
        assert_eq!(render(&Inflection::base(&entry)), "cat\tpo:noun\tis:sg");
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_file(Path::new("/nonexistent/hunaffix.aff")).unwrap_err();
        assert!(err.contains("/nonexistent/hunaffix.aff"));
    }
}
