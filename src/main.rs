//! Matdedup CLI - Find and remove duplicate materials in scene files.

use std::env;
use std::path::Path;
use std::process::exit;

use tracing_subscriber::EnvFilter;

use matdedup::compare::GraphCheck;
use matdedup::dedup::{remove_duplicates, DedupOptions};
use matdedup::io::{load_scene, save_scene};
use matdedup::scene::{ObjectData, Scene};
use matdedup::util::DEFAULT_TOLERANCE;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "warn",
            _ => filtered_args.push(arg),
        }
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if filtered_args.is_empty() {
        print_usage(&args[0]);
        return;
    }

    match filtered_args[0] {
        "info" | "i" => {
            if filtered_args.len() < 2 {
                eprintln!("Usage: {} info <scene.json>", args[0]);
                exit(1);
            }
            cmd_info(filtered_args[1]);
        }
        "dedup" | "d" => {
            if filtered_args.len() < 2 {
                eprintln!("Usage: {} dedup <scene.json> [options]", args[0]);
                exit(1);
            }
            cmd_dedup(filtered_args[1], &filtered_args[2..]);
        }
        "version" | "V" | "--version" => print_version(),
        "help" | "h" | "-h" | "--help" => print_usage(&args[0]),
        _ => {
            // Assume it's a file path
            if Path::new(filtered_args[0]).exists() {
                cmd_info(filtered_args[0]);
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                print_usage(&args[0]);
                exit(1);
            }
        }
    }
}

fn print_usage(prog: &str) {
    println!("Matdedup - Find and remove duplicate materials in scene files");
    println!();
    println!("Usage: {} [options] <command> <scene.json>", prog);
    println!();
    println!("Commands:");
    println!("  i, info     Show scene summary (materials, objects, slots)");
    println!("  d, dedup    Remove duplicate materials and rewrite face assignments");
    println!("  V, version  Show version info");
    println!("  h, help     Show this help");
    println!();
    println!("Dedup options:");
    println!("  -o, --output <path>    Write the result to a different file");
    println!("  -n, --dry-run          Report changes without writing");
    println!("  -t, --tolerance <f>    Scalar comparison tolerance (default {})", DEFAULT_TOLERANCE);
    println!("  -s, --structural       Compare shader graphs structurally, not by size");
    println!("  --selected-only        Only process objects marked selected in the document");
    println!();
    println!("Options:");
    println!("  -v, --verbose  Debug output");
    println!("  -vv, --trace   Trace output (very verbose)");
    println!("  -q, --quiet    Warnings and errors only");
}

fn print_version() {
    let date = option_env!("MATDEDUP_BUILD_DATE").unwrap_or("unknown");
    let time = option_env!("MATDEDUP_BUILD_TIME").unwrap_or("unknown");
    println!(
        "matdedup {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        date,
        time
    );
}

fn load_or_exit(path: &str) -> Scene {
    match load_scene(path) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path, e);
            exit(1);
        }
    }
}

fn cmd_info(path: &str) {
    let scene = load_or_exit(path);

    let meshes = scene.objects.iter().filter(|o| o.is_mesh()).count();
    let selected = scene.objects.iter().filter(|o| o.selected).count();

    println!("Scene: {}", path);
    println!("Materials: {}", scene.materials.len());
    println!(
        "Objects: {} ({} meshes, {} selected)",
        scene.objects.len(),
        meshes,
        selected
    );
    println!();

    if !scene.materials.is_empty() {
        println!("Materials:");
        for mat in &scene.materials {
            let shading = match &mat.graph {
                Some(g) if mat.use_nodes => {
                    format!("{} nodes, {} links", g.num_nodes(), g.num_links())
                }
                _ => "flat".to_string(),
            };
            println!(
                "  [{}] '{}' - {:?}, {}",
                mat.id, mat.name, mat.blend_method, shading
            );
        }
        println!();
    }

    println!("Objects:");
    for obj in &scene.objects {
        let mark = if obj.selected { "*" } else { " " };
        match &obj.data {
            ObjectData::Mesh(mesh) => {
                println!(
                    "{} {} [Mesh] - {} slots, {} faces",
                    mark,
                    obj.name,
                    mesh.num_slots(),
                    mesh.num_faces()
                );
                for (i, slot) in mesh.slots.iter().enumerate() {
                    match slot.and_then(|id| scene.material(id)) {
                        Some(mat) => println!("      [{}] '{}'", i, mat.name),
                        None => println!("      [{}] <empty>", i),
                    }
                }
            }
            other => println!("{} {} [{}]", mark, obj.name, kind_name(other)),
        }
    }
}

fn kind_name(data: &ObjectData) -> &'static str {
    match data {
        ObjectData::Mesh(_) => "Mesh",
        ObjectData::Camera => "Camera",
        ObjectData::Light => "Light",
        ObjectData::Empty => "Empty",
    }
}

fn cmd_dedup(path: &str, args: &[&str]) {
    let mut opts = DedupOptions::default();
    let mut output: Option<&str> = None;
    let mut dry_run = false;
    let mut selected_only = false;

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "-o" | "--output" => {
                i += 1;
                let Some(&value) = args.get(i) else {
                    eprintln!("Missing value for {}", args[i - 1]);
                    exit(1);
                };
                output = Some(value);
            }
            "-t" | "--tolerance" => {
                i += 1;
                let value = args.get(i).and_then(|v| v.parse::<f32>().ok());
                let Some(value) = value else {
                    eprintln!("Invalid tolerance: expected a number");
                    exit(1);
                };
                opts.tolerance = value;
            }
            "-s" | "--structural" => opts.graph_check = GraphCheck::Structural,
            "-n" | "--dry-run" => dry_run = true,
            "--selected-only" => selected_only = true,
            other => {
                eprintln!("Unknown dedup option: {}", other);
                exit(1);
            }
        }
        i += 1;
    }

    let mut scene = load_or_exit(path);
    if !selected_only {
        scene.select_all();
    } else if !scene.any_selected() {
        println!("No objects selected in {}, nothing to do", path);
        return;
    }

    let summary = remove_duplicates(&mut scene, &opts);

    println!("{}", summary);
    println!("  Objects processed: {}", summary.objects_processed);
    println!("  Duplicate groups:  {}", summary.groups_found);
    println!("  Slots removed:     {}", summary.slots_removed);
    println!("  Materials purged:  {}", summary.materials_purged);

    if dry_run {
        println!("Dry run, nothing written");
        return;
    }
    if !summary.changed() && output.is_none() {
        return;
    }

    let target = output.unwrap_or(path);
    if let Err(e) = save_scene(target, &scene) {
        eprintln!("Failed to save {}: {}", target, e);
        exit(1);
    }
    println!("Wrote {}", target);
}
