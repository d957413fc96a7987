//! Command-line driver for the octree build pipeline: load OBJ meshes,
//! build the tree, print diagnostics, and emit the flat GPU buffers.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glam::Vec3;
use octree::{BuildParams, Octree, TreeStats, TriangleMesh};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "octreetool")]
#[command(about = "Build and inspect triangle-mesh octrees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ParamArgs {
    /// Read build parameters from a RON file (overrides the flags below)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Inclusive maximum subdivision depth (root is depth 0)
    #[arg(long, default_value_t = 8)]
    depth_limit: usize,

    /// Retention budget for promoted triangles per node
    #[arg(long, default_value_t = 64)]
    max_triangles_per_node: usize,

    /// Triangle count at or below which a node stays a leaf
    #[arg(long, default_value_t = 32)]
    max_triangles_per_leaf: usize,

    /// Overlapped-children count at which a triangle is promoted instead of
    /// duplicated
    #[arg(long, default_value_t = 4)]
    overlap_threshold: usize,
}

impl ParamArgs {
    fn resolve(&self) -> Result<BuildParams> {
        if let Some(path) = &self.params {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return ron::from_str(&text).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(BuildParams {
            depth_limit: self.depth_limit,
            max_triangles_per_node: self.max_triangles_per_node,
            max_triangles_per_leaf: self.max_triangles_per_leaf,
            overlap_promotion_threshold: self.overlap_threshold,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build an octree from OBJ meshes and write the flat GPU buffers
    Build {
        /// OBJ files to aggregate into one scene
        #[arg(required = true)]
        meshes: Vec<PathBuf>,

        /// Output directory for the buffer files
        #[arg(short, long, default_value = "octree-out")]
        output: PathBuf,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Build an octree and print its per-level statistics
    Stats {
        /// OBJ files to aggregate into one scene
        #[arg(required = true)]
        meshes: Vec<PathBuf>,

        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Metadata sidecar written next to the binary buffers.
#[derive(Serialize)]
struct SceneMeta {
    params: BuildParams,
    min_bounds: Vec3,
    max_bounds: Vec3,
    node_words: usize,
    triangles: usize,
    vertices: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            meshes,
            output,
            params,
        } => build(&meshes, &output, params.resolve()?),
        Commands::Stats { meshes, params } => stats(&meshes, params.resolve()?),
    }
}

fn load_meshes(paths: &[PathBuf]) -> Result<Vec<TriangleMesh>> {
    let mut meshes = Vec::new();
    for path in paths {
        let loaded =
            octree::io::load_obj(path).with_context(|| format!("loading {}", path.display()))?;
        info!(path = %path.display(), shapes = loaded.len(), "loaded mesh file");
        meshes.extend(loaded);
    }
    Ok(meshes)
}

fn build_tree(paths: &[PathBuf], params: BuildParams) -> Result<Octree> {
    let meshes = load_meshes(paths)?;
    Octree::build(&meshes, params).context("building octree")
}

fn build(paths: &[PathBuf], output: &PathBuf, params: BuildParams) -> Result<()> {
    let tree = build_tree(paths, params)?;
    print_stats(&tree.stats());

    let scene = tree.compact().context("compacting octree")?;

    std::fs::create_dir_all(output)
        .with_context(|| format!("creating {}", output.display()))?;
    std::fs::write(output.join("nodes.bin"), scene.node_bytes())?;
    std::fs::write(output.join("triangles.bin"), scene.triangle_bytes())?;
    std::fs::write(output.join("vertices.bin"), scene.vertex_bytes())?;
    std::fs::write(output.join("normals.bin"), scene.normal_bytes())?;

    let meta = SceneMeta {
        params,
        min_bounds: scene.min_bounds,
        max_bounds: scene.max_bounds,
        node_words: scene.node_buffer.len(),
        triangles: scene.triangle_buffer.len(),
        vertices: scene.vertices.len(),
    };
    let meta_text = ron::ser::to_string_pretty(&meta, ron::ser::PrettyConfig::default())
        .context("serializing scene metadata")?;
    std::fs::write(output.join("scene.ron"), meta_text)?;

    println!(
        "wrote {} node words, {} triangle records, {} vertices to {}",
        scene.node_buffer.len(),
        scene.triangle_buffer.len(),
        scene.vertices.len(),
        output.display()
    );
    Ok(())
}

fn stats(paths: &[PathBuf], params: BuildParams) -> Result<()> {
    let tree = build_tree(paths, params)?;
    print_stats(&tree.stats());
    Ok(())
}

fn print_stats(stats: &TreeStats) {
    let leaves = stats.leaf_depth_histogram();

    println!("depth   nodes  leaves  triangles  avg children");
    for (depth, level) in stats.levels.iter().enumerate() {
        let nodes = level.triangle_counts.len();
        let triangles: usize = level.triangle_counts.iter().sum();
        let children: usize = level.child_counts.iter().sum();
        let avg_children = if level.child_counts.is_empty() {
            0.0
        } else {
            children as f64 / level.child_counts.len() as f64
        };
        println!(
            "{depth:>5} {nodes:>7} {:>7} {triangles:>10} {avg_children:>13.2}",
            leaves[depth]
        );
    }
    println!(
        "total: {} nodes, {} stored triangles, mean branching {:.2}, max depth {}",
        stats.node_count(),
        stats.stored_triangles(),
        stats.mean_branching(),
        stats.max_depth()
    );
}
