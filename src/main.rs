use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use skyline_generator::city::types::FacadeStyle;
use skyline_generator::export::{view_file_stem, view_paths};
use skyline_generator::{CameraConfig, CityModel, CityParams, LineRenderer, RenderAdapter, SeedChoice};

#[derive(Parser, Debug)]
#[command(name = "skyline_generator")]
#[command(about = "Generate line-art city block massing models from a seed")]
struct Args {
    /// Random seed (derived from the clock if not specified)
    #[arg(allow_hyphen_values = true)]
    seed: Option<String>,

    /// JSON file overriding generation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for rendered images
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Keep occluded lines. Much faster, but draws every line of every block
    /// instead of the visible line art.
    #[arg(long)]
    all_lines: bool,

    /// Views to render
    #[arg(long, value_enum, value_delimiter = ',', default_value = "a,b")]
    views: Vec<View>,

    /// Skip SVG output
    #[arg(long)]
    no_svg: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum View {
    /// High oblique view across the block
    A,
    /// Steep view into the middle of the block
    B,
}

impl View {
    fn camera(self, max_height: f64) -> CameraConfig {
        match self {
            View::A => CameraConfig::overview(max_height),
            View::B => CameraConfig::downtown(max_height),
        }
    }

    fn label(self) -> &'static str {
        match self {
            View::A => "A",
            View::B => "B",
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let choice = SeedChoice::resolve(args.seed.as_deref());
    println!("{}", choice);

    let params = match &args.config {
        Some(path) => CityParams::from_json_file(path)?,
        None => CityParams::default(),
    };

    println!("Generating city block...");
    let start = Instant::now();
    let model = CityModel::from_seed(choice.seed, &params)?;
    let stats = model.stats();
    println!(
        "Created {} blocks and {} rooftops ({} line segments) in {:?}",
        stats.block_count,
        stats.rooftop_count,
        model.segment_count(),
        start.elapsed()
    );
    for style in [FacadeStyle::BandedWithBeams, FacadeStyle::PlainGrid] {
        println!("  {} facades: {}", style.display_name(), model.style_count(style));
    }
    println!("Global model height = {:.1}", stats.max_height);

    std::fs::create_dir_all(&args.out_dir)?;
    let renderer = LineRenderer::new(!args.all_lines);

    for &view in &args.views {
        let camera = view.camera(stats.max_height);
        let start = Instant::now();

        let paths = renderer.render(&model, &camera)?;
        let stem = view_file_stem(choice.seed, &camera, view.label());
        let (png, svg) = view_paths(&args.out_dir, &stem);
        let (width, height) = (camera.width as u32, camera.height as u32);

        paths.write_to_png(&png, width, height)?;
        if !args.no_svg {
            paths.write_to_svg(&svg, width, height)?;
        }

        println!("{} view generated ({} lines) -> {}", view.label(), paths.len(), png.display());
        println!("  Duration: {:?}", start.elapsed());
    }

    Ok(())
}
