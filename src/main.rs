use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use parrot_dtw::{Aligner, AlignmentCost, Metric};
use parrot_io::{ExperimentName, LibraryReader, ResultWriter, SequenceReader};
use parrot_recog::{Label, RecognizerConfig, TemplateLibrary};

/// Spoken digits in recognition order.
const DIGITS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

#[derive(Parser)]
#[command(name = "parrot")]
#[command(about = "Isolated-word recognition by dynamic time warping against reference templates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Options shared by every command that compares sequences.
#[derive(Args, Debug, Clone)]
struct MatchArgs {
    /// Local frame distance: "euclidean", "manhattan", or "squared-euclidean"
    #[arg(long, default_value = "euclidean")]
    metric: String,

    /// Feature CSV files start with a header row
    #[arg(long, default_value_t = false)]
    headers: bool,
}

/// Where reference templates come from.
#[derive(Args, Debug, Clone)]
struct TemplateArgs {
    /// Directory of template CSV files named `{label}{suffix}.csv`
    #[arg(long, required_unless_present = "library", conflicts_with = "library")]
    templates: Option<PathBuf>,

    /// File-name suffix of template files
    #[arg(long, default_value = "")]
    template_suffix: String,

    /// Compiled template library (see `compile`)
    #[arg(long)]
    library: Option<PathBuf>,
}

/// Optional JSON artifact destination.
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    experiment: Option<String>,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Align two feature sequences and report the distance and warping path
    Align {
        /// First feature CSV file
        #[arg(long)]
        a: PathBuf,

        /// Second feature CSV file
        #[arg(long)]
        b: PathBuf,

        /// Include the cumulative cost matrix in the JSON artifact
        #[arg(long, default_value_t = false)]
        include_matrix: bool,

        #[command(flatten)]
        matching: MatchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Recognize one query as the label of its nearest template
    Recognize {
        #[command(flatten)]
        source: TemplateArgs,

        /// Query feature CSV file
        #[arg(long)]
        query: PathBuf,

        /// Template labels, comma separated
        #[arg(long, value_delimiter = ',', default_values = DIGITS)]
        labels: Vec<String>,

        /// Number of nearest templates to report
        #[arg(long, default_value_t = 3)]
        top_k: usize,

        /// Align against templates in parallel
        #[arg(long, default_value_t = false)]
        parallel: bool,

        #[command(flatten)]
        matching: MatchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Measure recognition accuracy over one or more labeled test sets
    Evaluate {
        #[command(flatten)]
        source: TemplateArgs,

        /// Directory of test CSV files named `{label}{suffix}.csv`
        #[arg(long)]
        test_dir: PathBuf,

        /// One file-name suffix per test set, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        test_suffixes: Vec<String>,

        /// Class labels, comma separated
        #[arg(long, value_delimiter = ',', default_values = DIGITS)]
        labels: Vec<String>,

        /// Align against templates in parallel
        #[arg(long, default_value_t = false)]
        parallel: bool,

        #[command(flatten)]
        matching: MatchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Read a template directory once and save it as a binary library
    Compile {
        /// Directory of template CSV files named `{label}{suffix}.csv`
        #[arg(long)]
        templates: PathBuf,

        /// File-name suffix of template files
        #[arg(long, default_value = "")]
        template_suffix: String,

        /// Template labels, comma separated
        #[arg(long, value_delimiter = ',', default_values = DIGITS)]
        labels: Vec<String>,

        /// Feature CSV files start with a header row
        #[arg(long, default_value_t = false)]
        headers: bool,

        /// Output library file (defaults to `{output_dir}/{experiment}_library.bin`)
        #[arg(long, required_unless_present = "experiment")]
        out: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct AlignOutput {
    metric: &'static str,
    n_frames_a: usize,
    n_frames_b: usize,
    dim: usize,
    distance: Option<f64>,
    path_len: usize,
}

#[derive(Serialize)]
struct RecognizeOutput {
    query: String,
    metric: &'static str,
    label: Option<String>,
    distance: Option<f64>,
    nearest: Vec<ScoreOutput>,
}

#[derive(Serialize)]
struct ScoreOutput {
    label: String,
    distance: Option<f64>,
}

#[derive(Serialize)]
struct EvaluateOutput {
    experiment: Option<String>,
    metric: &'static str,
    n_test_sets: usize,
    n_tested: usize,
    n_correct: usize,
    n_unrecognized: usize,
    accuracy: f64,
}

#[derive(Serialize)]
struct CompileOutput {
    path: PathBuf,
    n_labels: usize,
    n_present: usize,
}

fn parse_metric(s: &str) -> Result<Metric> {
    match s {
        "euclidean" => Ok(Metric::Euclidean),
        "manhattan" => Ok(Metric::Manhattan),
        "squared-euclidean" => Ok(Metric::SquaredEuclidean),
        other => anyhow::bail!(
            "unknown metric: {other} (expected euclidean, manhattan, or squared-euclidean)"
        ),
    }
}

fn parse_labels(labels: &[String]) -> Result<Vec<Label>> {
    if labels.iter().any(|l| l.trim().is_empty()) {
        anyhow::bail!("labels must not be empty");
    }
    Ok(labels.iter().map(|l| Label::new(l.trim())).collect())
}

fn finite(cost: AlignmentCost) -> Option<f64> {
    cost.is_finite().then(|| cost.value())
}

fn result_writer(output: &OutputArgs) -> Result<Option<ResultWriter>> {
    output
        .experiment
        .as_deref()
        .map(|name| -> Result<ResultWriter> {
            let experiment = ExperimentName::new(name)?;
            Ok(ResultWriter::new(&output.output_dir, experiment)?)
        })
        .transpose()
}

fn load_templates(source: &TemplateArgs, labels: &[Label], headers: bool) -> Result<TemplateLibrary> {
    let library = match (&source.library, &source.templates) {
        (Some(path), _) => TemplateLibrary::load(path)
            .with_context(|| format!("failed to load template library {}", path.display()))?,
        (None, Some(dir)) => read_feature_set(dir, &source.template_suffix, labels, headers)
            .context("failed to read template directory")?,
        (None, None) => anyhow::bail!("either --templates or --library is required"),
    };
    info!(
        n_labels = library.len(),
        n_present = library.n_present(),
        "templates loaded"
    );
    Ok(library)
}

fn read_feature_set(
    dir: &Path,
    suffix: &str,
    labels: &[Label],
    headers: bool,
) -> Result<TemplateLibrary> {
    Ok(LibraryReader::new(dir)
        .with_suffix(suffix)
        .with_headers(headers)
        .read(labels)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Align {
            a,
            b,
            include_matrix,
            matching,
            output,
        } => {
            let metric = parse_metric(&matching.metric)?;

            // 1. Read both sequences
            let seq_a = SequenceReader::new(&a)
                .with_headers(matching.headers)
                .read()
                .with_context(|| format!("failed to read {}", a.display()))?;
            let seq_b = SequenceReader::new(&b)
                .with_headers(matching.headers)
                .read()
                .with_context(|| format!("failed to read {}", b.display()))?;

            // 2. Align
            let alignment = Aligner::new(metric)
                .align(seq_a.as_view(), seq_b.as_view())
                .context("alignment failed")?;
            info!(distance = alignment.distance().value(), "alignment complete");

            // 3. Optional JSON artifact
            if let Some(writer) = result_writer(&output)? {
                writer.write_alignment(metric, &alignment, include_matrix)?;
            }

            let summary = AlignOutput {
                metric: metric.name(),
                n_frames_a: seq_a.len(),
                n_frames_b: seq_b.len(),
                dim: seq_a.dim(),
                distance: finite(alignment.distance()),
                path_len: alignment.path().len(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Recognize {
            source,
            query,
            labels,
            top_k,
            parallel,
            matching,
            output,
        } => {
            let metric = parse_metric(&matching.metric)?;
            let labels = parse_labels(&labels)?;

            // 1. Load templates and the query
            let library = load_templates(&source, &labels, matching.headers)?;
            let query_seq = SequenceReader::new(&query)
                .with_headers(matching.headers)
                .read()
                .context("failed to read query")?;

            // 2. Recognize and rank
            let recognizer = RecognizerConfig::new()
                .with_metric(metric)
                .with_parallel(parallel)
                .build();
            let recognition = recognizer
                .recognize(&library, Some(query_seq.as_view()))
                .context("recognition failed")?;
            let ranking = recognizer
                .rank(&library, query_seq.as_view())
                .context("ranking failed")?;
            info!(
                label = recognition.label().map(Label::as_str),
                distance = recognition.distance().value(),
                "recognition complete"
            );

            // 3. Optional JSON artifact
            let query_name = query.display().to_string();
            if let Some(writer) = result_writer(&output)? {
                writer.write_recognition(metric, &query_name, &recognition, &ranking)?;
            }

            let summary = RecognizeOutput {
                query: query_name,
                metric: metric.name(),
                label: recognition.label().map(Label::to_string),
                distance: finite(recognition.distance()),
                nearest: ranking
                    .iter()
                    .take(top_k)
                    .map(|s| ScoreOutput {
                        label: s.label.to_string(),
                        distance: finite(s.distance),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Evaluate {
            source,
            test_dir,
            test_suffixes,
            labels,
            parallel,
            matching,
            output,
        } => {
            let metric = parse_metric(&matching.metric)?;
            let classes = parse_labels(&labels)?;

            // 1. Load templates and every test set
            let library = load_templates(&source, &classes, matching.headers)?;
            let test_sets = test_suffixes
                .iter()
                .map(|suffix| {
                    read_feature_set(&test_dir, suffix, &classes, matching.headers)
                        .with_context(|| format!("failed to read test set \"{suffix}\""))
                })
                .collect::<Result<Vec<_>>>()?;
            info!(n_test_sets = test_sets.len(), "test sets loaded");

            // 2. Evaluate
            let evaluation = RecognizerConfig::new()
                .with_metric(metric)
                .with_parallel(parallel)
                .build()
                .evaluate(&library, &test_sets, &classes)
                .context("evaluation failed")?;
            info!("confusion matrix (rows: true, columns: predicted)\n{}", evaluation.confusion);

            // 3. Optional JSON artifact
            if let Some(writer) = result_writer(&output)? {
                writer.write_evaluation(metric, test_sets.len(), &evaluation)?;
            }

            let summary = EvaluateOutput {
                experiment: output.experiment,
                metric: metric.name(),
                n_test_sets: test_sets.len(),
                n_tested: evaluation.n_tested,
                n_correct: evaluation.n_correct,
                n_unrecognized: evaluation.n_unrecognized,
                accuracy: evaluation.accuracy,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Compile {
            templates,
            template_suffix,
            labels,
            headers,
            out,
            output,
        } => {
            let labels = parse_labels(&labels)?;

            // 1. Read templates
            let library = read_feature_set(&templates, &template_suffix, &labels, headers)
                .context("failed to read template directory")?;

            // 2. Resolve destination and save
            let path = match (out, result_writer(&output)?) {
                (Some(path), _) => path,
                (None, Some(writer)) => writer.library_path(),
                (None, None) => anyhow::bail!("either --out or --experiment is required"),
            };
            library
                .save(&path)
                .with_context(|| format!("failed to save library to {}", path.display()))?;

            let summary = CompileOutput {
                path,
                n_labels: library.len(),
                n_present: library.n_present(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
