// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Qubitslice CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use nalgebra::{Point2, Point3};
use qubitslice::geometry::Color;
use qubitslice::{EngineConfig, TetrahedronKernel, TetrahedronSnapshot, TriangleKernel, TriangleSnapshot};

#[derive(Parser)]
#[command(name = "qubitslice")]
#[command(about = "Qubitslice - probability slices of qutrit and ququart simplices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to qubitslice.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Print snapshots as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Triangle,
    Tetrahedron,
}

#[derive(Subcommand)]
enum Commands {
    /// Probabilities for a point in the triangle
    Triangle {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Probabilities for a point in the tetrahedron
    Tetrahedron {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,

        /// Control axis to slide along after the update
        #[arg(long, requires = "value")]
        axis: Option<usize>,

        /// Slider position in [0, 1]
        #[arg(long, requires = "axis")]
        value: Option<f64>,
    },

    /// Measure from the centroid (or a given point) and report the outcome
    Measure {
        #[arg(short, long, value_enum, default_value = "triangle")]
        shape: Shape,

        /// RNG seed, overrides the configuration
        #[arg(long)]
        seed: Option<u64>,

        /// Starting point coordinates
        #[arg(long, num_args = 2..=3, allow_negative_numbers = true)]
        at: Option<Vec<f64>>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::load()?,
    };

    match cli.command {
        Commands::Triangle { x, y } => {
            let mut kernel = TriangleKernel::new(config)?;
            kernel.update(Point2::new(x, y))?;
            let snapshot = kernel.snapshot().context("no snapshot after update")?;
            report_triangle(&kernel, snapshot, cli.json, cli.verbose)?;
        }
        Commands::Tetrahedron { x, y, z, axis, value } => {
            let mut kernel = TetrahedronKernel::new(config)?;
            kernel.update(Point3::new(x, y, z))?;
            if let (Some(axis), Some(value)) = (axis, value) {
                kernel.slide(axis, value)?;
            }
            let snapshot = kernel.snapshot().context("no snapshot after update")?;
            report_tetrahedron(&kernel, snapshot, cli.json, cli.verbose)?;
        }
        Commands::Measure { shape, seed, at } => {
            let config = EngineConfig {
                seed: seed.or(config.seed),
                ..config
            };
            measure_command(config, shape, at.as_deref(), cli.json, cli.verbose)?;
        }
        Commands::Config { output } => {
            match output {
                Some(path) => {
                    config.save(&path)?;
                    println!("{} {}", "Configuration written to".green(), path);
                }
                None => {
                    let toml = toml::to_string_pretty(&config).context("Failed to serialize config")?;
                    print!("{}", toml);
                }
            }
        }
        Commands::Version => {
            println!("Qubitslice v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn measure_command(config: EngineConfig, shape: Shape, at: Option<&[f64]>, json: bool, verbose: bool) -> Result<()> {
    match shape {
        Shape::Triangle => {
            let mut kernel = TriangleKernel::new(config)?;
            let start = match at {
                Some([x, y, ..]) => Point2::new(*x, *y),
                _ => kernel.triangle().centroid(),
            };
            kernel.update(start)?;
            kernel.measure()?;
            let snapshot = kernel.snapshot().context("no snapshot after measurement")?;
            report_triangle(&kernel, snapshot, json, verbose)?;
        }
        Shape::Tetrahedron => {
            let mut kernel = TetrahedronKernel::new(config)?;
            let start = match at {
                Some([x, y, z]) => Point3::new(*x, *y, *z),
                Some(_) => anyhow::bail!("--at needs three coordinates for a tetrahedron"),
                None => kernel.tetrahedron().centroid(),
            };
            kernel.update(start)?;
            kernel.measure()?;
            let snapshot = kernel.snapshot().context("no snapshot after measurement")?;
            report_tetrahedron(&kernel, snapshot, json, verbose)?;
        }
    }
    Ok(())
}

fn paint(text: &str, color: Color) -> colored::ColoredString {
    let [r, g, b] = color.to_rgb().map(|c| (c * 255.0).round() as u8);
    text.truecolor(r, g, b)
}

fn print_probabilities(labels: &[&str], colors: &[Color], percentages: &[String]) {
    for ((label, color), percent) in labels.iter().zip(colors).zip(percentages) {
        println!("  {} {:>6}%", paint(&format!("|{}>", label), *color).bold(), percent);
    }
}

fn report_triangle(kernel: &TriangleKernel, snapshot: &TriangleSnapshot, json: bool, verbose: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    let vertices = kernel.triangle().vertices();
    let labels: Vec<&str> = vertices.iter().map(|v| v.label.as_str()).collect();
    let colors: Vec<Color> = vertices.iter().map(|v| v.color).collect();

    println!("{}", "Triangle".bold());
    println!(
        "  {} ({:.4}, {:.4})",
        "Point:".bright_black(),
        snapshot.point.x,
        snapshot.point.y
    );
    println!("  {} {:.4}", "Radius:".bright_black(), snapshot.radius);
    if let Some(outcome) = snapshot.measured {
        println!("  {} {}", "Measured:".bright_black(), paint(&labels[outcome], colors[outcome]).bold());
    }
    print_probabilities(&labels, &colors, &snapshot.percentages);

    if verbose {
        println!("  {} {}", "Parallel segments:".bright_black(), snapshot.segments.len());
        println!("  {} {}", "Edge segments:".bright_black(), snapshot.edge_segments.len());
    }
    Ok(())
}

fn report_tetrahedron(
    kernel: &TetrahedronKernel,
    snapshot: &TetrahedronSnapshot,
    json: bool,
    verbose: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    let vertices = kernel.tetrahedron().vertices();
    let labels: Vec<&str> = vertices.iter().map(|v| v.label.as_str()).collect();
    let colors: Vec<Color> = vertices.iter().map(|v| v.color).collect();

    println!("{}", "Tetrahedron".bold());
    println!(
        "  {} ({:.4}, {:.4}, {:.4})",
        "Point:".bright_black(),
        snapshot.point.x,
        snapshot.point.y,
        snapshot.point.z
    );
    println!("  {} {:.4}", "Radius:".bright_black(), snapshot.radius);
    if let Some(outcome) = snapshot.measured {
        println!("  {} {}", "Measured:".bright_black(), paint(&labels[outcome], colors[outcome]).bold());
    }
    print_probabilities(&labels, &colors, &snapshot.percentages);

    for (i, slider) in snapshot.sliders.iter().enumerate() {
        match slider {
            Some(value) => println!("  {} {} {:.3}", "Slider".bright_black(), i, value),
            None => println!("  {} {} {}", "Slider".bright_black(), i, "n/a".yellow()),
        }
    }

    if verbose {
        println!("  {} {}", "Face cuts:".bright_black(), snapshot.face_cuts.len());
        println!("  {} {}", "Face pieces:".bright_black(), snapshot.face_segments.len());
        println!("  {} {}", "Side cuts:".bright_black(), snapshot.side_cuts.len());
        let near: Vec<usize> = (0..4).filter(|f| snapshot.near_faces[*f]).collect();
        println!("  {} {:?}", "Near faces:".bright_black(), near);
    }
    Ok(())
}
