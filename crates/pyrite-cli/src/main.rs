use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pyrite")]
#[command(about = "Pyrite - control-flow and dominance analysis for Python source")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a control-flow graph and emit it as Graphviz DOT
    Graph {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file of executed (line, line) arcs; colors covered edges
        #[arg(long)]
        coverage: Option<PathBuf>,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Emit the line-indexed flow summary as JSON
    Export {
        /// A Python file, or a directory to scan for .py files
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print dominator sets from the start sentinel
    Dominators {
        input: PathBuf,

        /// Post-dominators from the stop sentinel instead
        #[arg(long)]
        post: bool,
    },

    /// Parse a requirements.txt and report the declared version ranges
    Requirements {
        input: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Graph {
            input,
            output,
            coverage,
            verbose,
        } => cmd_graph(input, output, coverage, verbose),
        Commands::Export { input, output } => cmd_export(input, output),
        Commands::Dominators { input, post } => cmd_dominators(input, post),
        Commands::Requirements { input, json } => cmd_requirements(input, json),
    }
}

fn cmd_graph(
    input: PathBuf,
    output: Option<PathBuf>,
    coverage: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    use colored::*;
    use pyrite_core::{parse_module, CfgBuilder};
    use pyrite_render::{to_dot, to_dot_with_coverage, CoverageArcs};
    use std::fs;

    if verbose {
        println!("{}", "Pyrite Graph".bright_blue().bold());
        println!("{}", "=".repeat(50).bright_blue());
        println!("Input: {}", input.display());
        println!();
    }

    if input.is_dir() {
        anyhow::bail!(
            "{} is a directory; `graph` takes a single Python file (use `export` for directories)",
            input.display()
        );
    }
    let source = fs::read_to_string(&input)?;
    let tree = parse_module(&source)?;
    let cfg = CfgBuilder::build(&tree, &source)?;

    if verbose {
        println!("Nodes: {}", cfg.len());
        println!("Functions: {}", cfg.functions().len());
    }

    let dot = match coverage {
        Some(arcs_path) => {
            let arcs_json = fs::read_to_string(&arcs_path)?;
            let arcs: CoverageArcs = serde_json::from_str::<Vec<(usize, usize)>>(&arcs_json)?
                .into_iter()
                .collect();
            to_dot_with_coverage(&cfg, &arcs)
        }
        None => to_dot(&cfg),
    };

    match output {
        Some(output_path) => {
            fs::write(&output_path, &dot)?;
            if verbose {
                println!(
                    "\n{} DOT written to: {}",
                    "SUCCESS:".bright_green().bold(),
                    output_path.display()
                );
            }
        }
        None => println!("{dot}"),
    }

    Ok(())
}

fn cmd_export(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    use pyrite_core::{export_lines, parse_module, CfgBuilder, LineFlow};
    use std::collections::BTreeMap;
    use std::fs;

    fn export_file(path: &std::path::Path) -> Result<BTreeMap<usize, LineFlow>> {
        let source = fs::read_to_string(path)?;
        let tree = parse_module(&source)?;
        let cfg = CfgBuilder::build(&tree, &source)?;
        Ok(export_lines(&cfg))
    }

    let json = if input.is_dir() {
        let mut files: BTreeMap<String, BTreeMap<usize, LineFlow>> = BTreeMap::new();
        for entry in walkdir::WalkDir::new(&input) {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("py") {
                files.insert(path.display().to_string(), export_file(path)?);
            }
        }
        serde_json::to_string_pretty(&files)?
    } else {
        serde_json::to_string_pretty(&export_file(&input)?)?
    };

    match output {
        Some(output_path) => fs::write(&output_path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

fn cmd_dominators(input: PathBuf, post: bool) -> Result<()> {
    use colored::*;
    use pyrite_core::{parse_module, CfgBuilder, Direction};
    use std::fs;

    if input.is_dir() {
        anyhow::bail!(
            "{} is a directory; `dominators` takes a single Python file",
            input.display()
        );
    }
    let source = fs::read_to_string(&input)?;
    let tree = parse_module(&source)?;
    let cfg = CfgBuilder::build(&tree, &source)?;

    let (start, direction, heading) = if post {
        (cfg.stop(), Direction::Post, "Post-dominators")
    } else {
        (cfg.start(), Direction::Forward, "Dominators")
    };
    let doms = cfg.dominators(start, direction)?;

    println!("{}", heading.bright_blue().bold());
    for id in cfg.ids() {
        let Some(text) = cfg.annotation(id) else {
            continue;
        };
        let mut set: Vec<_> = doms
            .set(id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        set.sort();
        let names: Vec<String> = set.iter().map(|d| d.to_string()).collect();
        println!("{} {}  <-  {}", id.to_string().bold(), text, names.join(", "));
    }

    Ok(())
}

fn cmd_requirements(input: PathBuf, json: bool) -> Result<()> {
    use colored::*;
    use pyrite_requirements::parse_requirements;
    use std::fs;

    let text = fs::read_to_string(&input)?;
    let requirements = parse_requirements(&text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&requirements)?);
        return Ok(());
    }

    println!(
        "{} ({} packages)",
        "Declared requirements".bright_blue().bold(),
        requirements.len()
    );
    for requirement in &requirements {
        let admitted = if requirement.is_unconstrained() {
            "any version".to_string()
        } else {
            requirement.range.to_string()
        };
        println!("  {}  {}", requirement.name.bright_green(), admitted);
    }

    Ok(())
}
