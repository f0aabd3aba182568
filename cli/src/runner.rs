use std::path::{Path, PathBuf};

use blocks::{ExampleBlock, ParseWarning, Parser};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use log::info;
use playground::{Engine, ParityOutcome, check_parity};

use crate::config::SiteConfig;

/// A parsed markdown document registered in the codespan file database.
pub struct LoadedDocument {
    pub path: PathBuf,
    pub file_id: usize,
    pub blocks: Vec<ExampleBlock>,
    pub warnings: Vec<ParseWarning>,
}

/// Resolve a command-line path into documents: a `.toml` site config lists its
/// pages, a directory is searched for `.md` files, anything else is one document.
pub fn resolve_documents(path: &Path) -> Result<Vec<PathBuf>, String> {
    if path.extension().is_some_and(|ext| ext == "toml") {
        let config = SiteConfig::load_from_path(path).map_err(|e| e.to_string())?;
        return Ok(config
            .document_paths()
            .into_iter()
            .map(|(_, doc)| doc)
            .collect());
    }
    if path.is_dir() {
        let mut docs = Vec::new();
        collect_documents(path, &mut docs);
        docs.sort();
        if docs.is_empty() {
            return Err(format!("no .md files found in {}", path.display()));
        }
        return Ok(docs);
    }
    Ok(vec![path.to_path_buf()])
}

fn collect_documents(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_documents(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "md") {
            out.push(path);
        }
    }
}

pub fn load_document(
    files: &mut SimpleFiles<String, String>,
    path: &Path,
) -> Result<LoadedDocument, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    let file_id = files.add(path.display().to_string(), source.clone());
    let (blocks, warnings) = Parser::new(source, file_id).parse_with_warnings();
    info!(
        "{}: {} blocks, {} warnings",
        path.display(),
        blocks.len(),
        warnings.len()
    );
    Ok(LoadedDocument {
        path: path.to_path_buf(),
        file_id,
        blocks,
        warnings,
    })
}

pub fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

pub fn emit_warnings(
    writer: &StandardStream,
    files: &SimpleFiles<String, String>,
    warnings: &[ParseWarning],
) {
    let config = term::Config::default();
    for warning in warnings {
        let diagnostic = warning.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn ok_label(no_color: bool) -> &'static str {
    if no_color { "ok" } else { "\x1b[32mok\x1b[0m" }
}

fn failed_label(no_color: bool) -> &'static str {
    if no_color { "FAILED" } else { "\x1b[31mFAILED\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

/// Report parser warnings and snippets without an output section.
/// Returns exit code: 0 = every snippet has output, 1 = otherwise.
pub fn run_check(path: &Path, no_color: bool) -> i32 {
    let documents = match resolve_documents(path) {
        Ok(docs) => docs,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let writer = StandardStream::stderr(color_choice(no_color));
    let mut files = SimpleFiles::new();
    let mut examples = 0usize;
    let mut missing = 0usize;
    let mut unreadable = 0usize;

    for doc_path in &documents {
        let doc = match load_document(&mut files, doc_path) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("error: {}", e);
                unreadable += 1;
                continue;
            }
        };

        let mut warnings = doc.warnings;
        for block in doc.blocks.iter().filter(|b| b.has_code()) {
            examples += 1;
            if block.output_text().trim().is_empty() {
                missing += 1;
                warnings.push(ParseWarning::missing_output(block, doc.file_id));
            }
        }
        warnings.sort_by_key(|w| w.span.start);
        emit_warnings(&writer, &files, &warnings);
    }

    eprintln!();
    if missing == 0 && unreadable == 0 {
        eprintln!(
            "check result: {}. {} examples in {} documents",
            ok_label(no_color),
            examples,
            documents.len()
        );
        0
    } else {
        eprintln!(
            "check result: {}. {} of {} examples without output, {} unreadable documents",
            failed_label(no_color),
            missing,
            examples,
            unreadable
        );
        1
    }
}

/// Evaluate every snippet under `path` and compare with its recorded output.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_verify<E: Engine + ?Sized>(path: &Path, engine: &mut E, no_color: bool) -> i32 {
    let documents = match resolve_documents(path) {
        Ok(docs) => docs,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let mut files = SimpleFiles::new();
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut failures: Vec<(PathBuf, String, String)> = Vec::new();

    for doc_path in &documents {
        eprintln!();
        eprintln!("{}", bold(&doc_path.display().to_string(), no_color));

        let doc = match load_document(&mut files, doc_path) {
            Ok(doc) => doc,
            Err(e) => {
                failed += 1;
                eprintln!("  {}  {}", fail_label(no_color), doc_path.display());
                failures.push((doc_path.clone(), "(document)".to_string(), e));
                continue;
            }
        };

        let report = check_parity(&doc.blocks, engine);
        for result in &report.results {
            match &result.outcome {
                ParityOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), result.label);
                }
                ParityOutcome::Fail(mismatch) => {
                    failed += 1;
                    eprintln!("  {}  {}", fail_label(no_color), result.label);
                    failures.push((doc.path.clone(), result.label.clone(), mismatch.to_string()));
                }
            }
        }
    }

    // Print failure details
    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for (path, label, reason) in &failures {
            eprintln!();
            eprintln!("  --- {} ({}) ---", path.display(), label);
            for line in reason.lines() {
                eprintln!("  {}", line);
            }
        }
    }

    // Summary
    eprintln!();
    if failed == 0 {
        eprintln!("verify result: {}. {} passed, 0 failed", ok_label(no_color), passed);
        0
    } else {
        eprintln!(
            "verify result: {}. {} passed, {} failed (of {})",
            failed_label(no_color),
            passed,
            failed,
            passed + failed
        );
        1
    }
}
