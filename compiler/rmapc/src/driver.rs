//! Compilation driver: load, build, then run every requested output.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rmap_build::Corpus;
use rmap_diagnostic::Diagnostic;
use rmap_ir::visitor::VisitError;
use rmap_ir::{ElementPath, ElementRef};
use thiserror::Error;

use crate::input::load_sources;
use crate::output::render;
use crate::{Config, OutputFormat};

/// Errors that stop a run before any output is produced.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("`{}` is not a valid declaration file: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no declaration files found in `{}`", path.display())]
    NoSources { path: PathBuf },

    #[error("{diagnostic}")]
    Build { diagnostic: Box<Diagnostic> },

    #[error("cannot create output directory `{}`: {source}", path.display())]
    OutputDir { path: PathBuf, source: io::Error },
}

/// Outcome of a run that got as far as producing output.
///
/// A failed traversal does not stop the others; each failure is recorded
/// here instead.
#[derive(Debug, Default)]
pub struct Report {
    /// Files written, in root then output order.
    pub written: Vec<PathBuf>,
    pub failures: Vec<Diagnostic>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One root rendered by one backend.
#[derive(Copy, Clone)]
struct Job<'c> {
    root: ElementRef<'c>,
    format: OutputFormat,
}

enum Rendered {
    File(PathBuf),
    Buffer(Vec<u8>),
}

/// Build the corpus described by `config` and run every output over every
/// root.
///
/// Without an output directory, rendered output goes to `stdout` in root
/// order, whatever order the traversals finished in.
///
/// # Errors
///
/// Fails when the sources cannot be loaded, the corpus does not build, or
/// the output directory cannot be created. Traversal failures are reported
/// in the returned [`Report`].
#[tracing::instrument(level = "debug", skip_all, fields(source = %config.source.display()))]
pub fn run(config: &Config, stdout: &mut dyn Write) -> Result<Report, DriverError> {
    let (paths, decls): (Vec<_>, Vec<_>) = load_sources(&config.source)?
        .into_iter()
        .map(|source| (source.path, source.decl))
        .unzip();

    let corpus = Corpus::build_roots(&decls, &config.build).map_err(|err| {
        let mut diagnostic = Diagnostic::from(&err.error);
        if let Some(path) = paths.get(err.index) {
            diagnostic = diagnostic.with_source(path.display().to_string());
        }
        DriverError::Build {
            diagnostic: Box::new(diagnostic),
        }
    })?;

    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir).map_err(|source| DriverError::OutputDir {
            path: dir.clone(),
            source,
        })?;
    }

    let jobs: Vec<Job<'_>> = corpus
        .roots()
        .flat_map(|root| {
            config
                .outputs
                .iter()
                .map(move |&format| Job { root, format })
        })
        .collect();
    tracing::debug!(jobs = jobs.len(), parallel = config.parallel, "running outputs");

    let dir = config.output_dir.as_deref();
    let results = if config.parallel {
        run_parallel(&jobs, dir)
    } else {
        jobs.iter().map(|job| run_job(*job, dir)).collect()
    };

    let mut report = Report::default();
    for result in results {
        match result {
            Ok(Rendered::File(path)) => report.written.push(path),
            Ok(Rendered::Buffer(bytes)) => {
                if let Err(err) = stdout.write_all(&bytes) {
                    let err = VisitError::emit(&ElementPath::default(), err);
                    report.failures.push(Diagnostic::from(&err));
                }
            }
            Err(err) => {
                tracing::warn!(path = %err.path(), "output failed");
                report.failures.push(Diagnostic::from(&err));
            }
        }
    }
    Ok(report)
}

/// Run `jobs` on a scoped thread pool, falling back to sequential when the
/// pool cannot be created. Results keep the order of `jobs`.
fn run_parallel(jobs: &[Job<'_>], dir: Option<&Path>) -> Vec<Result<Rendered, VisitError>> {
    rayon::ThreadPoolBuilder::new()
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| {
                jobs.par_iter()
                    .map(|job| run_job(*job, dir))
                    .collect::<Vec<_>>()
            })
        })
        .unwrap_or_else(|e| {
            tracing::warn!("failed to create thread pool ({e}), running sequentially");
            jobs.iter().map(|job| run_job(*job, dir)).collect()
        })
}

fn run_job(job: Job<'_>, dir: Option<&Path>) -> Result<Rendered, VisitError> {
    let Job { root, format } = job;
    let _span = tracing::debug_span!("output", root = %root.path(), %format).entered();

    match dir {
        Some(dir) => {
            let path = dir.join(format!("{}{}", root.name(), format.extension()));
            let file = File::create(&path).map_err(|err| VisitError::emit(root.path(), err))?;
            render(format, root, BufWriter::new(file))?;
            tracing::debug!(path = %path.display(), "wrote output");
            Ok(Rendered::File(path))
        }
        None => render(format, root, Vec::new()).map(Rendered::Buffer),
    }
}
