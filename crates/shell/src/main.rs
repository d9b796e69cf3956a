//! CLI for k-NN undersampling of CSV datasets.

mod data;
mod logger;
mod metrics;
mod search;

use std::path::PathBuf;

use clap::Parser;
use knn_undersampling::{undersample::LogSubscriber, ClassLabel, Params, SelfMatch};

use metrics::Metric;
use search::Search;

/// Removes majority-class instances surrounded by other classes from a CSV dataset.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the input CSV file. The first row must name the columns.
    #[arg(short('i'), long)]
    input: PathBuf,

    /// Path to write the cleaned CSV file.
    #[arg(short('o'), long)]
    output: PathBuf,

    /// The number of nearest neighbors to examine.
    #[arg(short('k'), long, default_value = "5")]
    k: usize,

    /// The minimum number of neighbors from other classes for an instance to
    /// be removed.
    #[arg(short('t'), long, default_value = "1")]
    threshold: usize,

    /// The majority class, by label or by index among the labels in the
    /// order they first appear. A number that is itself a label names that
    /// label.
    #[arg(short('w'), long, default_value = "0")]
    majority: ClassLabel,

    /// The index of the class column. Defaults to the last column.
    #[arg(long)]
    class_column: Option<usize>,

    /// Let an instance be its own nearest neighbor.
    #[arg(long)]
    include_self: bool,

    /// Evaluate instances in parallel.
    #[arg(long)]
    parallel: bool,

    /// The neighbor search to use.
    #[arg(long, value_enum, default_value = "linear")]
    search: Search,

    /// The distance metric to use.
    #[arg(long, value_enum, default_value = "euclidean")]
    metric: Metric,

    /// The largest number of instances in a leaf of the ball tree.
    #[arg(long, default_value = "8")]
    leaf_size: usize,

    /// The directory to write logs to.
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

impl Args {
    /// The parameters of the filtering pass.
    fn params(&self) -> Params {
        let self_match = if self.include_self {
            SelfMatch::Include
        } else {
            SelfMatch::Exclude
        };
        Params::default()
            .with_k(self.k)
            .with_threshold(self.threshold)
            .with_majority_label(self.majority.clone())
            .with_self_match(self_match)
            .with_parallel(self.parallel)
    }
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    println!("Args: {args:?}");

    let (_guard, log_path) = logger::configure_logger(&args.log_dir, "knn-undersample")?;
    println!("Logging to {}", log_path.display());

    let params = args.params();
    ftlog::info!("Running with {}", params.to_args().join(" "));

    let data = data::read_csv(&args.input, args.class_column)?;
    ftlog::info!(
        "Read {} instances with {} attributes from {}",
        data.cardinality(),
        data.header().num_attributes(),
        args.input.display()
    );

    let mut filter = args
        .search
        .filter(params, args.metric.shell_metric(), args.leaf_size)
        .with_subscriber(LogSubscriber);
    ftlog::info!("Filtering with {} and {:?} distance", filter.search_name(), args.metric);
    let out = filter.apply(&data).map_err(|e| e.to_string())?;

    data::write_csv(&args.output, &out.dataset)?;
    ftlog::info!("Wrote {} instances to {}", out.dataset.cardinality(), args.output.display());

    println!(
        "Removed {} of {} instances in {:.3} s. Wrote {}.",
        out.report.removed,
        out.report.input_size,
        out.report.elapsed.as_secs_f64(),
        args.output.display()
    );
    if out.report.unevaluated > 0 {
        println!(
            "{} instances could not be evaluated and were kept. See {}.",
            out.report.unevaluated,
            log_path.display()
        );
    }

    Ok(())
}
