//! Command-line demo for the terrain crates.
//!
//! Generates heightfield and falloff previews as PNGs, reports mesh
//! statistics across the LOD ladder, builds a full planet, and runs a
//! headless chunk-streaming simulation with a scripted viewer.
//!
//! Run with `cargo run -p terra-demo -- heightmap --seed 3 --out out/`.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use glam::DVec2;
use tracing::info;

use terra_heightfield::{
    HeightfieldSettings, NoiseConfig, NormalizeMode, PreviewImage, generate_falloff_map,
    generate_height_map,
};
use terra_mesh::{MeshSettings, NUM_SUPPORTED_LODS, generate_terrain_mesh, skip_increment};
use terra_noise::{FilterVariant, NoiseLayerSettings};
use terra_planet::{Planet, PlanetSettings, ShapeSettings};
use terra_stream::{
    ChunkCoord, EvictionPolicy, StreamerSettings, TerrainStreamer, WorkDispatcher,
};

#[derive(Parser)]
#[command(name = "terra-demo", about = "Procedural terrain generation demos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a heightfield and write grayscale PNG previews.
    Heightmap {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Grid dimension (width and height).
        #[arg(long, default_value_t = 241)]
        size: usize,
        /// Attenuate heights toward the edges, island style.
        #[arg(long)]
        falloff: bool,
        /// Normalize each grid to its own bounds instead of globally.
        #[arg(long)]
        local: bool,
        /// Output directory for PNG files.
        #[arg(long, default_value = "out")]
        out: PathBuf,
    },
    /// Build one chunk mesh at every LOD and report buffer statistics.
    Mesh {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Index into the supported chunk sizes.
        #[arg(long, default_value_t = 0)]
        chunk_size_index: usize,
        #[arg(long)]
        flat_shading: bool,
    },
    /// Generate a planet from a two-layer noise stack and write per-face
    /// elevation previews.
    Planet {
        #[arg(long, default_value_t = 0)]
        seed: u32,
        /// Vertices per side of each cube face.
        #[arg(long, default_value_t = 64)]
        resolution: usize,
        #[arg(long, default_value = "out")]
        out: PathBuf,
    },
    /// Headless streaming run: walk a scripted viewer and report the
    /// chunk registry as it streams.
    Stream {
        /// Simulation steps.
        #[arg(long, default_value_t = 200)]
        steps: usize,
        /// Viewer speed in world units per step.
        #[arg(long, default_value_t = 12.0)]
        speed: f64,
        /// Cap the chunk registry, evicting least recently visible chunks.
        #[arg(long)]
        max_chunks: Option<usize>,
    },
}

fn main() {
    terra_log::init_logging(None);
    let cli = Cli::parse();

    match cli.command {
        Command::Heightmap {
            seed,
            size,
            falloff,
            local,
            out,
        } => run_heightmap(seed, size, falloff, local, &out),
        Command::Mesh {
            seed,
            chunk_size_index,
            flat_shading,
        } => run_mesh(seed, chunk_size_index, flat_shading),
        Command::Planet {
            seed,
            resolution,
            out,
        } => run_planet(seed, resolution, &out),
        Command::Stream {
            steps,
            speed,
            max_chunks,
        } => run_stream(steps, speed, max_chunks),
    }
}

fn run_heightmap(seed: u64, size: usize, falloff: bool, local: bool, out: &Path) {
    let settings = HeightfieldSettings {
        noise: NoiseConfig {
            seed,
            normalize_mode: if local {
                NormalizeMode::Local
            } else {
                NormalizeMode::Global
            },
            ..Default::default()
        },
        use_falloff: falloff,
        ..Default::default()
    };

    let map = generate_height_map(size, size, &settings, DVec2::ZERO);
    info!(
        size,
        seed,
        min = map.min_value(),
        max = map.max_value(),
        "heightfield generated"
    );

    std::fs::create_dir_all(out).expect("failed to create output directory");
    write_png(&out.join("heightmap.png"), &PreviewImage::from_height_map(&map));

    if falloff {
        let grid = generate_falloff_map(size);
        write_png(&out.join("falloff.png"), &PreviewImage::from_unit_grid(size, &grid));
    }
}

fn run_mesh(seed: u64, chunk_size_index: usize, flat_shading: bool) {
    let settings = MeshSettings {
        chunk_size_index,
        use_flat_shading: flat_shading,
        ..Default::default()
    };
    settings.validate().expect("unsupported mesh settings");

    let n = settings.verts_per_line();
    let heightfield = HeightfieldSettings {
        noise: NoiseConfig {
            seed,
            ..Default::default()
        },
        height_multiplier: 20.0,
        ..Default::default()
    };
    let map = generate_height_map(n, n, &heightfield, DVec2::ZERO);

    println!(
        "chunk size {} ({}x{} samples, world size {:.1})",
        n - 5,
        n,
        n,
        settings.mesh_world_size()
    );
    for lod in 0..NUM_SUPPORTED_LODS {
        let mesh = generate_terrain_mesh(&map, &settings, lod);
        println!(
            "  lod {} (skip {}): {} vertices, {} triangles",
            lod,
            skip_increment(lod),
            mesh.vertices().len(),
            mesh.triangles().len()
        );
    }
}

fn run_planet(seed: u32, resolution: usize, out: &Path) {
    // A broad continent layer masking a ridged mountain layer.
    let continents = NoiseLayerSettings {
        num_octaves: 4,
        strength: 0.12,
        base_roughness: 1.1,
        min_value: 0.45,
        ..Default::default()
    };
    let mountains = NoiseLayerSettings {
        variant: FilterVariant::Ridged,
        use_first_layer_as_mask: true,
        num_octaves: 4,
        strength: 0.6,
        base_roughness: 1.6,
        min_value: 0.3,
        ..Default::default()
    };

    let planet = Planet::generate(PlanetSettings {
        resolution,
        shape: ShapeSettings {
            planet_radius: 100.0,
            seed,
            noise_layers: vec![continents, mountains],
        },
        ..Default::default()
    });

    let range = planet.elevation_min_max();
    info!(
        resolution,
        seed,
        min_elevation = range.min(),
        max_elevation = range.max(),
        "planet generated"
    );

    std::fs::create_dir_all(out).expect("failed to create output directory");
    let span = (range.max() - range.min()).max(f64::EPSILON);
    for mesh in planet.face_meshes() {
        let mut image = PreviewImage::new(resolution as u32, resolution as u32);
        for y in 0..resolution {
            for x in 0..resolution {
                let elevation = mesh.uvs()[y * resolution + x].y;
                let level = (((elevation - range.min()) / span) * 255.0).round() as u8;
                image.set_pixel(x as u32, y as u32, level, level, level, 255);
            }
        }
        let name = format!("planet_{:?}.png", mesh.face()).to_lowercase();
        write_png(&out.join(name), &image);
    }
}

fn run_stream(steps: usize, speed: f64, max_chunks: Option<usize>) {
    let settings = StreamerSettings {
        eviction: match max_chunks {
            Some(max_chunks) => EvictionPolicy::LeastRecentlyVisible { max_chunks },
            None => EvictionPolicy::KeepAll,
        },
        ..Default::default()
    };
    let mut streamer = TerrainStreamer::new(settings, WorkDispatcher::with_defaults());

    // Scripted walk: a widening spiral, the usual worst case for
    // streaming since it keeps crossing chunk boundaries.
    let mut position = DVec2::ZERO;
    for step in 0..steps {
        let angle = step as f64 * 0.05;
        position += DVec2::new(angle.cos(), angle.sin()) * speed;
        streamer.tick(position);

        if step % 20 == 0 {
            info!(
                step,
                x = position.x,
                y = position.y,
                chunks = streamer.chunk_count(),
                visible = streamer.visible_chunks().count(),
                pending = streamer.pending_jobs(),
                "streaming"
            );
        }
    }

    // Let in-flight work land so the final report is settled.
    while streamer.pending_jobs() > 0 {
        streamer.tick(position);
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let home = streamer.chunk(ChunkCoord { x: 0, y: 0 });
    println!(
        "final: {} chunks, {} visible, home chunk mesh: {}",
        streamer.chunk_count(),
        streamer.visible_chunks().count(),
        match home.and_then(|chunk| chunk.active_lod_index()) {
            Some(lod_index) => format!("lod index {lod_index}"),
            None => "not resident".to_string(),
        }
    );
}

fn write_png(path: &Path, image: &PreviewImage) {
    let file = std::fs::File::create(path).expect("failed to create PNG file");
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().expect("failed to write PNG header");
    writer
        .write_image_data(&image.pixels)
        .expect("failed to write PNG data");
    info!(path = %path.display(), "wrote image");
}
