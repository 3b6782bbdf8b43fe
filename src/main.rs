//! TSP Genetic Algorithm Solver - Command Line Interface

use clap::{Args, Parser, Subcommand};
use tsp_ga_solver::benchmark::{Benchmark, BenchmarkConfig};
use tsp_ga_solver::config::GAConfig;
use tsp_ga_solver::driver::{run, Termination};
use tsp_ga_solver::genetic::GeneticAlgorithm;
use tsp_ga_solver::instance::TspInstance;
use tsp_ga_solver::visualization::Visualizer;

use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tsp-ga-solver")]
#[command(version = "1.0")]
#[command(about = "A genetic algorithm solver for the Euclidean TSP")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single instance
    Solve {
        #[command(flatten)]
        ga: GaArgs,

        /// Output report to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save an SVG drawing of the best tour
        #[arg(long)]
        visualize: Option<PathBuf>,
    },

    /// Run the solver over consecutive seeds
    Benchmark {
        #[command(flatten)]
        ga: GaArgs,

        /// Number of runs
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Seed of the first run
        #[arg(long, default_value = "0")]
        first_seed: u64,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },
}

/// Solver parameters; each flag overrides the configuration file
#[derive(Args)]
struct GaArgs {
    /// TSP-LIB instance file (EUC_2D); a random instance is generated if absent
    #[arg(short, long)]
    instance: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of cities in a random instance
    #[arg(long)]
    cities: Option<usize>,

    /// Population size
    #[arg(short, long)]
    population: Option<usize>,

    /// Crossover probability
    #[arg(long)]
    crossover_prob: Option<f64>,

    /// Mutation probability
    #[arg(long)]
    mutation_prob: Option<f64>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many generations
    #[arg(long)]
    max_generations: Option<usize>,

    /// Stop after this many generations without improvement
    #[arg(long)]
    max_no_improve: Option<usize>,
}

impl GaArgs {
    fn load_config(&self) -> Result<GAConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => GAConfig::from_json_file(path)?,
            None => GAConfig::default(),
        };

        if let Some(cities) = self.cities {
            config.city_count = cities;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(p) = self.crossover_prob {
            config.crossover_prob = p;
        }
        if let Some(p) = self.mutation_prob {
            config.mutation_prob = p;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.max_generations.is_some() {
            config.max_generations = self.max_generations;
        }
        if self.max_no_improve.is_some() {
            config.max_no_improve = self.max_no_improve;
        }

        Ok(config)
    }

    fn load_instance(&self) -> Result<Option<TspInstance>, Box<dyn Error>> {
        match &self.instance {
            Some(path) => {
                println!("Loading instance from {:?}...", path);
                Ok(Some(TspInstance::from_file(path)?))
            }
            None => Ok(None),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Solve { ga, output, visualize } => {
            solve_instance(&ga, output, visualize, cli.verbose)
        }
        Commands::Benchmark { ga, runs, first_seed, output } => {
            run_benchmark(&ga, runs, first_seed, &output)
        }
    };

    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn solve_instance(
    args: &GaArgs,
    output: Option<PathBuf>,
    visualize: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    let config = args.load_config()?;
    let termination = Termination::from_config(&config)?;

    let mut ga = match args.load_instance()? {
        Some(instance) => GeneticAlgorithm::with_instance(config, instance)?,
        None => GeneticAlgorithm::new(config)?,
    };

    if verbose {
        println!("{}", ga.instance().statistics());
    }

    let report = run(&mut ga, &termination);

    println!("\n========== Results ==========");
    println!("{}", report);

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&out_path, json)?;
        println!("\nReport saved to {:?}", out_path);
    }

    if let Some(svg_path) = visualize {
        let viz = Visualizer::new();
        let svg = viz.generate_svg(ga.instance(), ga.best_tour());
        viz.save_svg(&svg, &svg_path)?;
        println!("Visualization saved to {:?}", svg_path);
    }

    Ok(())
}

fn run_benchmark(
    args: &GaArgs,
    runs: usize,
    first_seed: u64,
    output: &PathBuf,
) -> Result<(), Box<dyn Error>> {
    let ga = args.load_config()?;
    let instance = args.load_instance()?;

    std::fs::create_dir_all(output)?;

    let config = BenchmarkConfig {
        num_runs: runs,
        first_seed,
        ga,
    };

    let mut benchmark = Benchmark::new(config);
    benchmark.run(instance.as_ref())?;

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}
