//! Gram Matrix Demonstration
//!
//! Fits each kernel estimator on a small collection of persistence diagrams
//! and prints the resulting Gram matrices.
//!
//! Run with a diagram file (text or .json) to use your own data:
//!
//! ```text
//! cargo run --example gram_matrix -- diagrams.txt
//! ```

use pdkernel::{
    DiagramCollection, KernelEstimator, KernelMatrix, PersistenceDiagram,
    PersistenceFisherKernel, PersistenceScaleSpaceKernel, PersistenceWeightedGaussianKernel,
    SlicedWassersteinKernel, Weight,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Gram Matrix Demonstration ===");
    println!();

    let diagrams = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading diagrams from {path}");
            DiagramCollection::from_file(&path)?.into_diagrams()
        }
        None => {
            println!("No diagram file given, using built-in diagrams");
            sample_diagrams()
        }
    };
    println!("{} diagrams", diagrams.len());
    println!();

    println!("📊 Sliced Wasserstein (bandwidth 1.0, 10 directions)");
    let mut sw = SlicedWassersteinKernel::new()
        .with_bandwidth(1.0)
        .with_num_directions(10);
    print_matrix(&sw.fit_transform(&diagrams)?);

    println!("📊 Persistence Fisher (bandwidth 1.0, smoothing 0.5)");
    let mut pf = PersistenceFisherKernel::new()
        .with_bandwidth(1.0)
        .with_bandwidth_fisher(0.5);
    print_matrix(&pf.fit_transform(&diagrams)?);

    println!("📊 Persistence Scale Space (bandwidth 0.5)");
    let mut pss = PersistenceScaleSpaceKernel::new().with_bandwidth(0.5);
    print_matrix(&pss.fit_transform(&diagrams)?);

    println!("📊 Persistence Weighted Gaussian (bandwidth 0.5, arctan weight)");
    let mut pwg = PersistenceWeightedGaussianKernel::new()
        .with_bandwidth(0.5)
        .with_weight(Weight::arctan(1.0, 1.0));
    print_matrix(&pwg.fit_transform(&diagrams)?);

    Ok(())
}

fn sample_diagrams() -> Vec<PersistenceDiagram> {
    vec![
        PersistenceDiagram::from_pairs(&[(0.0, 1.0), (0.2, 0.7)]),
        PersistenceDiagram::from_pairs(&[(0.1, 1.5)]),
        PersistenceDiagram::from_pairs(&[(0.4, 2.0), (0.5, 0.6), (0.3, 0.9)]),
        PersistenceDiagram::empty(),
    ]
}

fn print_matrix(matrix: &KernelMatrix) {
    for i in 0..matrix.rows() {
        let row: Vec<String> = matrix.row(i).iter().map(|v| format!("{v:8.4}")).collect();
        println!("  {}", row.join(" "));
    }
    println!();
}
