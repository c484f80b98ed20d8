//! pdkernel Command Line Interface
//!
//! Computes kernel matrices between collections of persistence diagrams and
//! inspects saved matrices.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use pdkernel::approx::{RandomFourierFeatures, DEFAULT_SEED};
use pdkernel::core::{KernelError, KernelMatrix, Result};
use pdkernel::persistence::SerializableKernelMatrix;
use pdkernel::{
    pairwise_diagram_kernels, DiagramCollection, DiagramCollectionStats, KernelParams, Metric,
    PersistenceDiagram, Weight,
};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pdkernel")]
#[command(about = "Kernels between persistence diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a kernel matrix
    Compute(ComputeArgs),
    /// Display a saved kernel matrix
    Info(InfoArgs),
}

#[derive(Args)]
struct ComputeArgs {
    /// Diagram file (text or .json)
    #[arg(short, long)]
    input: PathBuf,

    /// Second diagram file; the self-kernel of --input is computed if omitted
    #[arg(short, long)]
    against: Option<PathBuf>,

    /// Kernel: sliced_wasserstein, persistence_fisher,
    /// persistence_scale_space or persistence_weighted_gaussian
    #[arg(short, long)]
    metric: String,

    /// Kernel bandwidth
    #[arg(short, long)]
    bandwidth: Option<f64>,

    /// Bandwidth of the density smoothing (persistence_fisher)
    #[arg(long)]
    bandwidth_fisher: Option<f64>,

    /// Number of projection directions (sliced_wasserstein)
    #[arg(short, long)]
    num_directions: Option<usize>,

    /// Point weight (persistence_weighted_gaussian)
    #[arg(short, long, default_value = "uniform")]
    weight: CliWeight,

    /// Arctan weight scale c in atan(c·persistence^p)
    #[arg(long, default_value = "1.0")]
    arctan_c: f64,

    /// Arctan weight exponent p in atan(c·persistence^p)
    #[arg(long, default_value = "1.0")]
    arctan_p: f64,

    /// Approximate the Gaussian with this many random Fourier features
    #[arg(long)]
    approx_components: Option<usize>,

    /// Seed for the random Fourier features
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output matrix file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Debug)]
enum CliWeight {
    /// Every point weighs 1
    #[value(name = "uniform")]
    Uniform,
    /// atan(c·persistence^p)
    #[value(name = "arctan")]
    Arctan,
}

#[derive(Args)]
struct InfoArgs {
    /// Saved matrix file
    matrix: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Compute(args) => compute_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn compute_command(args: ComputeArgs) -> Result<()> {
    let metric: Metric = args.metric.parse()?;
    let params = build_params(&args, &metric)?;
    info!("Computing {} kernel with {params:?}", metric.name());

    let x = load_collection(&args.input)?;
    let y = match &args.against {
        Some(path) => Some(load_collection(path)?),
        None => None,
    };

    let matrix = pairwise_diagram_kernels(&x, y.as_deref(), &metric, &params)?;
    info!("Computed {} x {} kernel matrix", matrix.rows(), matrix.cols());

    match &args.output {
        Some(path) => {
            SerializableKernelMatrix::from_matrix(&matrix, &metric, &params).save_to_file(path)?;
            info!("Matrix saved to: {path:?}");
        }
        None => print_matrix(&matrix),
    }

    Ok(())
}

fn build_params(args: &ComputeArgs, metric: &Metric) -> Result<KernelParams> {
    let mut params = KernelParams::new();
    params.bandwidth = args.bandwidth;
    params.bandwidth_fisher = args.bandwidth_fisher;
    params.num_directions = args.num_directions;

    if let CliWeight::Arctan = args.weight {
        params.weight = Some(Weight::arctan(args.arctan_c, args.arctan_p));
    }

    if let Some(n_components) = args.approx_components {
        // The feature map approximates the Gaussian each kernel smooths with
        let gaussian_bandwidth = match metric {
            Metric::PersistenceFisher => args.bandwidth_fisher,
            Metric::PersistenceScaleSpace | Metric::PersistenceWeightedGaussian => args.bandwidth,
            _ => {
                warn!("--approx-components has no effect on {}", metric.name());
                None
            }
        };
        if let Some(bandwidth) = gaussian_bandwidth {
            let features = RandomFourierFeatures::new(bandwidth, n_components, args.seed)?;
            params.kernel_approx = Some(Arc::new(features));
        }
    }

    Ok(params)
}

fn load_collection(path: &Path) -> Result<Vec<PersistenceDiagram>> {
    info!("Loading diagrams from: {path:?}");
    let collection = DiagramCollection::from_file(path)?;
    if collection.is_empty() {
        return Err(KernelError::ParseError(format!(
            "No diagrams found in {path:?}"
        )));
    }

    let stats = DiagramCollectionStats::from_diagrams(collection.diagrams());
    info!(
        "Loaded {} diagrams: {} points (mean {:.1}, max {}), {} empty, max persistence {:.4}",
        stats.n_diagrams,
        stats.total_points,
        stats.mean_points(),
        stats.max_points,
        stats.n_empty,
        stats.max_persistence
    );

    Ok(collection.into_diagrams())
}

fn print_matrix(matrix: &KernelMatrix) {
    for i in 0..matrix.rows() {
        let row: Vec<String> = matrix.row(i).iter().map(|v| format!("{v:.6}")).collect();
        println!("{}", row.join(" "));
    }
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading matrix from: {:?}", args.matrix);
    let serializable = SerializableKernelMatrix::load_from_file(&args.matrix)?;

    serializable.print_summary();

    let matrix = serializable.to_matrix()?;
    let n_show = matrix.rows().min(5);
    if n_show > 0 {
        println!("\nFirst rows:");
        for i in 0..n_show {
            let row = matrix.row(i);
            let shown: Vec<String> = row.iter().take(5).map(|v| format!("{v:.6}")).collect();
            let more = if row.len() > 5 { " ..." } else { "" };
            println!("  {}{more}", shown.join(" "));
        }
        if matrix.rows() > n_show {
            println!("  ... ({} more)", matrix.rows() - n_show);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(metric: &str) -> ComputeArgs {
        ComputeArgs {
            input: PathBuf::from("diagrams.txt"),
            against: None,
            metric: metric.to_string(),
            bandwidth: Some(0.5),
            bandwidth_fisher: Some(2.0),
            num_directions: None,
            weight: CliWeight::Uniform,
            arctan_c: 1.0,
            arctan_p: 1.0,
            approx_components: None,
            seed: DEFAULT_SEED,
            output: None,
        }
    }

    #[test]
    fn test_arctan_weight_param() {
        let mut a = args("persistence_weighted_gaussian");
        a.weight = CliWeight::Arctan;
        let params = build_params(&a, &Metric::PersistenceWeightedGaussian).unwrap();
        assert_eq!(params.weight.map(|w| w.name()), Some("arctan"));
    }

    #[test]
    fn test_approx_uses_smoothing_bandwidth() {
        let mut a = args("persistence_fisher");
        a.approx_components = Some(16);
        let params = build_params(&a, &Metric::PersistenceFisher).unwrap();
        assert_eq!(params.kernel_approx.map(|f| f.dim()), Some(32));

        let params = build_params(&a, &Metric::SlicedWasserstein).unwrap();
        assert!(params.kernel_approx.is_none());
    }

    #[test]
    fn test_unknown_metric() {
        assert!(matches!(
            "wasserstein".parse::<Metric>(),
            Err(KernelError::UnknownMetric(_))
        ));
    }
}
