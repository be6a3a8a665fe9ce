use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use itertools::Itertools;

use crate::backdoor::Fitness;
use crate::variables::PropositionalVariable;

/// The append-only results log: one `Best fitness …` line per completed run,
/// with a `---` separator between batches of runs on the same solver state.
/// Append failures are reported and swallowed; losing a log line must not
/// stop the search.
#[derive(Debug)]
pub struct OutputLog {
    path: PathBuf,
}

impl OutputLog {
    /// Creates the log, truncating whatever was at `path` before.
    pub fn create(path: impl Into<PathBuf>) -> std::io::Result<OutputLog> {
        let path = path.into();
        let _ = File::create(&path)?;
        Ok(OutputLog { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_best(
        &mut self,
        fitness: &Fitness,
        best_iteration: usize,
        variables: &[PropositionalVariable],
    ) {
        self.append_line(&format!(
            "Best fitness {} on iteration {} with {} variables: [{}]",
            fitness,
            best_iteration,
            variables.len(),
            variables.iter().join(", ")
        ));
    }

    /// Marks the boundary between batches of runs.
    pub fn append_separator(&mut self) {
        self.append_line("---");
    }

    fn append_line(&mut self, line: &str) {
        let result = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", line));
        if let Err(error) = result {
            log::error!("failed to append to {}: {}", self.path.display(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_follow_the_log_format() {
        let directory = tempfile::tempdir().expect("temporary directory");
        let path = directory.path().join("backdoors.txt");

        let mut output = OutputLog::create(&path).expect("log is created");
        output.append_best(
            &Fitness {
                fitness: 0.5,
                rho: 0.5,
                num_hard: 1,
            },
            7,
            &[
                PropositionalVariable::new(2),
                PropositionalVariable::new(5),
            ],
        );
        output.append_separator();

        let contents = std::fs::read_to_string(&path).expect("log is readable");
        assert_eq!(
            contents,
            "Best fitness 0.5 (rho=0.5, hard=1) on iteration 7 with 2 variables: [2, 5]\n---\n"
        );
    }

    #[test]
    fn creation_truncates_an_existing_log() {
        let directory = tempfile::tempdir().expect("temporary directory");
        let path = directory.path().join("backdoors.txt");

        std::fs::write(&path, "stale contents\n").expect("file is writable");
        let _output = OutputLog::create(&path).expect("log is created");

        let contents = std::fs::read_to_string(&path).expect("log is readable");
        assert!(contents.is_empty());
    }
}
