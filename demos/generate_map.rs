//! Example: Generate a sector map
//!
//! Usage: cargo run --example generate_map -- [OPTIONS]
//!
//! Set `RUST_LOG=debug` to see every generation stage.

use std::time::Instant;

use clap::{Parser, ValueEnum};

use rust_sector_map::*;

#[derive(Parser)]
#[command(name = "generate_map")]
#[command(about = "Generate a two-level sector map and print statistics", long_about = None)]
struct Cli {
    /// Random seed
    #[arg(short, long, default_value = "316")]
    seed: u64,

    /// Sector point layout
    #[arg(short, long, value_enum, default_value = "spiral")]
    layout: Layout,

    /// Minimum distance between sector points
    #[arg(short, long, default_value = "6.0")]
    min_distance: f64,

    /// Number of point slots (disc layout)
    #[arg(short = 'n', long, default_value = "1000")]
    num_points: usize,

    /// Disc radius (disc layout)
    #[arg(short, long, default_value = "300.0")]
    radius: f64,

    /// Points on the disc edge (disc layout)
    #[arg(long, default_value = "64")]
    boundary_points: usize,

    /// Use triangle centroids instead of circumcenters for region vertices
    #[arg(long)]
    centroids: bool,

    /// Skip subsector generation
    #[arg(long)]
    no_subsectors: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    Spiral,
    Disc,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let layout = match cli.layout {
        Layout::Spiral => PointLayout::Spiral {
            min_distance: cli.min_distance,
        },
        Layout::Disc => PointLayout::Disc {
            num_points: cli.num_points,
            radius: cli.radius,
            min_distance: cli.min_distance,
            boundary_points: cli.boundary_points,
            weight: RadialWeight::Sqrt,
        },
    };
    let rule = if cli.centroids {
        DualVertexRule::Centroid
    } else {
        DualVertexRule::PreferCircumcenter
    };

    let config = SectorMapConfigBuilder::new()
        .seed(cli.seed)
        .layout(layout)?
        .dual_vertex_rule(rule)
        .generate_subsectors(!cli.no_subsectors)
        .build()?;

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Layout: {:?}", config.layout);
    println!("  Dual vertices: {:?}", config.dual_vertex_rule);
    println!();

    let start = Instant::now();
    let map = SectorMap::generate(config)?;
    let elapsed = start.elapsed();

    let sectors = map.sector_mesh();
    println!("Sectors:");
    println!("  Count: {}", map.sector_count());
    println!("  Discarded: {} points, {} regions", map.layout_discarded(), sectors.discarded);
    println!("  Area: {:.2} .. {:.2}", map.min_area(), map.max_area());
    println!(
        "  Dual vertices: {} circumcenters, {} centroids",
        sectors.circumcenter_count, sectors.centroid_count
    );
    println!();

    if !cli.no_subsectors {
        let tiled = (0..map.sector_count()).filter(|&i| map.subsectors(i).is_some()).count();
        println!("Subsectors:");
        println!("  Count: {}", map.subsector_count());
        println!("  Sectors tiled: {} / {}", tiled, map.sector_count());
        println!();
    }

    println!("Sample sectors:");
    for (index, sector) in map.sectors().iter().enumerate().take(5) {
        let subsectors = map.subsectors(index).map_or(0, |m| m.region_count());
        println!(
            "  Sector {}: centroid=({:.2}, {:.2}), area={:.2}, vertices={}, subsectors={}",
            index,
            sector.centroid.x,
            sector.centroid.y,
            sector.area,
            sector.vertex_count(),
            subsectors
        );
    }

    let sector_mesh = generate_mesh(sectors, &AreaShadeMapper);
    let subsector_mesh = generate_subsector_mesh(&map, &PaletteColorMapper::new(cli.seed));
    println!();
    println!(
        "Render buffers: {} sector triangles, {} subsector triangles",
        sector_mesh.triangle_count(),
        subsector_mesh.triangle_count()
    );

    println!("\nGeneration complete in {:.2?}", elapsed);
    Ok(())
}
