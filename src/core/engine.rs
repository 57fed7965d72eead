//! Conversion engine
//!
//! Finds Python files, converts every docstring in each file, and either
//! rewrites the files in place or prints unified diffs. Files are converted
//! on blocking worker tasks with no shared mutable state; within one file,
//! replacements are applied from the highest starting line to the lowest so
//! earlier replacements never invalidate later offsets.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use similar::TextDiff;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::locator::ModuleLocator;
use crate::core::parser::DocstringParser;
use crate::core::writer::write_docstring;
use crate::error::{DocshiftError, Result};

/// Main orchestration engine for docshift.
pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        debug!("Loaded configuration: {:?}", config);
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Converts every Python file under `source`, fanning out across up to
    /// `threads` blocking tasks (0 means the available parallelism). Diffs
    /// are printed to stdout unless `in_place` is set.
    pub async fn convert(&self, source: &Path, threads: usize, in_place: bool) -> Result<()> {
        if !source.exists() {
            return Err(DocshiftError::Config(format!(
                "Path does not exist: {}",
                source.display()
            )));
        }
        let files = if source.is_file() {
            vec![source.to_path_buf()]
        } else {
            info!("Finding files within {}...", source.display());
            self.find_python_files(source)?
        };
        for file in &files {
            debug!("Found file: {}", file.display());
        }
        info!("Converting {} files...", files.len());

        let threads = if threads == 0 {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            threads
        };

        let mut tasks = JoinSet::new();
        let mut pending = files.into_iter();
        let mut active = 0usize;
        loop {
            while active < threads {
                let Some(file) = pending.next() else { break };
                let config = self.config.clone();
                tasks.spawn_blocking(move || {
                    let result = convert_file(&file, &config, in_place);
                    (file, result)
                });
                active += 1;
            }
            match tasks.join_next().await {
                Some(Ok((_, Ok(Some(diff))))) => {
                    active -= 1;
                    print!("{}", diff);
                }
                Some(Ok((_, Ok(None)))) => active -= 1,
                Some(Ok((file, Err(err)))) => {
                    active -= 1;
                    warn!("Failed to convert '{}': {}", file.display(), err);
                }
                Some(Err(err)) => {
                    active -= 1;
                    warn!("Conversion task failed: {}", err);
                }
                None => break,
            }
        }
        info!("Conversion complete");
        Ok(())
    }

    /// Finds Python files under a directory: any `.py` file, plus any
    /// extensionless file whose shebang matches the accepted list. Hidden
    /// files and ignore rules are respected by the walker.
    fn find_python_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut src_files = Vec::new();
        let walker = WalkBuilder::new(path).git_ignore(true).build();
        for entry in walker {
            let entry = entry.map_err(|e| DocshiftError::FileSystem(e.to_string()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("py") => src_files.push(path.to_path_buf()),
                Some(_) => {}
                None => {
                    if has_python_shebang(path, &self.config.accepted_shebangs) {
                        src_files.push(path.to_path_buf());
                    }
                }
            }
        }
        src_files.sort();
        Ok(src_files)
    }
}

/// Checks whether the file's first line is a shebang naming one of the
/// accepted interpreters. Unreadable or non-text files are not scripts.
pub fn has_python_shebang(path: &Path, accepted_shebangs: &[String]) -> bool {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };
    let mut first_line = String::new();
    if std::io::BufReader::new(file).read_line(&mut first_line).is_err() {
        return false;
    }
    let first_line = first_line.trim();
    first_line.starts_with("#!")
        && accepted_shebangs
            .iter()
            .any(|shebang| first_line.contains(shebang.as_str()))
}

/// Converts all docstrings in one file. Returns the unified diff when not
/// converting in place, or `None` when the file is unchanged or was
/// rewritten on disk.
pub fn convert_file(path: &Path, config: &Config, in_place: bool) -> Result<Option<String>> {
    let text = std::fs::read_to_string(path)?;
    let src_lines: Vec<String> = text.lines().map(String::from).collect();
    let new_lines = convert_source(&src_lines, config)?;
    let mut new_text = new_lines.join("\n");
    if text.ends_with('\n') {
        new_text.push('\n');
    }
    if in_place {
        std::fs::write(path, new_text)?;
        return Ok(None);
    }
    if new_text == text {
        return Ok(None);
    }
    let diff = TextDiff::from_lines(text.as_str(), new_text.as_str())
        .unified_diff()
        .header(
            &format!("a/{}", path.display()),
            &format!("b/{}", path.display()),
        )
        .to_string();
    Ok(Some(diff))
}

/// Converts all docstrings in one file's lines, returning the new lines.
///
/// A docstring that fails to parse is reported and skipped without
/// affecting its siblings. Replacements are applied bottom-up so the
/// remaining captures' line offsets stay valid.
pub fn convert_source(src_lines: &[String], config: &Config) -> Result<Vec<String>> {
    let mut locator = ModuleLocator::new(src_lines.to_vec());
    locator.parse()?;
    let mut captures = std::mem::take(&mut locator.docstrings);
    captures.sort_by(|a, b| b.start.cmp(&a.start));

    let mut new_lines = src_lines.to_vec();
    for capture in &captures {
        let mut keywords = capture.keywords.clone();
        if let Some(kwarg) = &capture.kwarg {
            keywords.push(kwarg.clone());
        }
        let grammar = config.input_style.grammar_for(&capture.lines);
        let mut parser = match DocstringParser::new(grammar, &capture.lines, keywords) {
            Ok(parser) => parser,
            Err(err) => {
                warn!("Skipping docstring at line {}: {}", capture.start + 1, err);
                continue;
            }
        };
        parser.parse();
        let replacement = write_docstring(
            &parser.doc,
            config.output_style,
            &parser.raw_indent,
            &config.output,
            capture.vararg.as_deref(),
            capture.kwarg.as_deref(),
        )?;
        let end = capture.end.min(new_lines.len());
        new_lines.splice(capture.start..end, replacement);
    }
    Ok(new_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::InputStyle;
    use crate::core::writer::OutputStyle;
    use std::io::Write;

    fn to_lines(source: &str) -> Vec<String> {
        source.lines().map(String::from).collect()
    }

    fn rest_to_google_config() -> Config {
        let mut config = Config::default();
        config.input_style = InputStyle::Rest;
        config.output_style = OutputStyle::Google;
        config
    }

    #[test]
    fn test_convert_source_rest_to_google() {
        let source = "\
def func(arg1, kwarg1=None):
    \"\"\"Summary.

    :param arg1: Desc for arg1.
    :type arg1: str
    :param kwarg1: Desc for kwarg1.
    :returns: The result.
    :rtype: int
    \"\"\"
    return arg1
";
        let converted = convert_source(&to_lines(source), &rest_to_google_config()).unwrap();
        assert_eq!(
            converted,
            [
                "def func(arg1, kwarg1=None):",
                "    \"\"\"Summary.",
                "",
                "    Args:",
                "        arg1 (str): Desc for arg1.",
                "        kwarg1: Desc for kwarg1.",
                "",
                "    Returns:",
                "        int: The result.",
                "    \"\"\"",
                "    return arg1",
            ]
        );
    }

    #[test]
    fn test_convert_source_replaces_bottom_up() {
        let source = "\
\"\"\"Module summary.

:var attr1: Desc.
\"\"\"


def first():
    \"\"\":returns: One.
    :rtype: int
    \"\"\"


def second():
    \"\"\":returns: Two.
    :rtype: int
    \"\"\"
";
        let converted = convert_source(&to_lines(source), &rest_to_google_config()).unwrap();
        assert_eq!(
            converted,
            [
                "\"\"\"Module summary.",
                "",
                "Attributes:",
                "    attr1: Desc.",
                "\"\"\"",
                "",
                "",
                "def first():",
                "    \"\"\"",
                "    Returns:",
                "        int: One.",
                "    \"\"\"",
                "",
                "",
                "def second():",
                "    \"\"\"",
                "    Returns:",
                "        int: Two.",
                "    \"\"\"",
            ]
        );
    }

    #[test]
    fn test_convert_source_guesses_style_per_docstring() {
        let source = "\
def rest_style(arg1):
    \"\"\"Summary.

    :param arg1: Rest desc.
    \"\"\"


def epytext_style(arg1):
    \"\"\"Summary.

    @param arg1: Epytext desc.
    \"\"\"
";
        let mut config = Config::default();
        config.output_style = OutputStyle::Rest;
        let converted = convert_source(&to_lines(source), &config).unwrap();
        assert_eq!(
            converted,
            [
                "def rest_style(arg1):",
                "    \"\"\"Summary.",
                "",
                "    :param arg1: Rest desc.",
                "    \"\"\"",
                "",
                "",
                "def epytext_style(arg1):",
                "    \"\"\"Summary.",
                "",
                "    :param arg1: Epytext desc.",
                "    \"\"\"",
            ]
        );
    }

    #[test]
    fn test_convert_file_in_place() {
        let mut config = rest_to_google_config();
        config.output_style = OutputStyle::Epytext;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module.py");
        std::fs::write(
            &path,
            "def func(arg1):\n    \"\"\":param arg1: Desc.\"\"\"\n",
        )
        .unwrap();

        let diff = convert_file(&path, &config, true).unwrap();
        assert!(diff.is_none());
        let converted = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            converted,
            "def func(arg1):\n    \"\"\"\n    @param arg1: Desc.\n    \"\"\"\n"
        );
    }

    #[test]
    fn test_convert_file_diff_output() {
        let config = rest_to_google_config();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module.py");
        let original = "def func(arg1):\n    \"\"\":param arg1: Desc.\"\"\"\n";
        std::fs::write(&path, original).unwrap();

        let diff = convert_file(&path, &config, false).unwrap().unwrap();
        assert!(diff.contains("-    \"\"\":param arg1: Desc.\"\"\""));
        // the file itself is untouched in diff mode
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_convert_file_without_changes_has_no_diff() {
        let mut config = Config::default();
        config.output_style = OutputStyle::Rest;
        config.input_style = InputStyle::Rest;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module.py");
        std::fs::write(&path, "x = 1\n").unwrap();
        assert!(convert_file(&path, &config, false).unwrap().is_none());
    }

    #[test]
    fn test_has_python_shebang() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script");
        let mut file = std::fs::File::create(&script).unwrap();
        writeln!(file, "#!/usr/bin/env python3").unwrap();
        writeln!(file, "print('hi')").unwrap();
        assert!(has_python_shebang(&script, &["python".to_string()]));
        assert!(!has_python_shebang(&script, &["ruby".to_string()]));

        let plain = dir.path().join("plain");
        std::fs::write(&plain, "not a script\n").unwrap();
        assert!(!has_python_shebang(&plain, &["python".to_string()]));
    }
}
