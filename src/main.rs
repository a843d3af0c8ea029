//! Rule 30 CLI - Run simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use rule30::{compute::EvolutionEngine, schema::SimulationConfig};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [steps]", args[0]);
        eprintln!();
        eprintln!("Run a Rule 30 simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  steps        Override for the configured generation count");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");

        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: SimulationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Some(steps) = args.get(2).and_then(|s| s.parse().ok()) {
        config.steps = steps;
    }

    println!("Rule 30 Simulation");
    println!("==================");
    println!("Lattice: {} cells", config.width);
    println!("Seed position: {}", config.center());
    println!("Generations: {}", config.steps);
    println!("Workers: {}", config.n_cores);
    println!();

    let engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // Run simulation
    println!("Running simulation...");
    let start = Instant::now();

    let result = engine.evolve().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    let steps = engine.config().steps;

    println!();
    println!("Final state:");
    println!("  Entropy: {:.6}", result.entropy[steps]);
    println!("  Complexity: {:.6}", result.complexity[steps]);
    println!("  Active density: {:.6}", result.stats.final_density);
    println!();
    println!(
        "Mean entropy: {:.6} (std {:.6})",
        result.stats.mean_entropy, result.stats.std_entropy
    );
    println!(
        "Mean complexity: {:.6} (std {:.6})",
        result.stats.mean_complexity, result.stats.std_complexity
    );
    println!(
        "Time: {:.2}s ({:.1} generations/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = SimulationConfig::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
