//! uislice inspection tool.
//!
//! Resolves a sprite the same way the engine would (side-car resolution,
//! border metadata, cache key), renders it once into a destination rect in
//! the chosen mode, and prints the resulting draw commands. Useful for
//! debugging 9-slice borders without starting the whole engine.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use uislice::components::uiimage::ImageType;
use uislice::components::uitransform::UiTransform;
use uislice::resources::deferredrelease::DeferredTextureReleaser;
use uislice::resources::drawlist::{BlendMode, Color, DrawList};
use uislice::resources::spriteconfig::SpriteConfig;
use uislice::resources::spritestore::SpriteStore;
use uislice::resources::texturestore::ImageTextureStore;
use uislice::systems::uiimage_render::render_image;

#[derive(Parser, Debug)]
#[command(
    name = "uislice",
    about = "Inspect a sprite and the draw commands it produces"
)]
struct Args {
    /// Sprite path (image, .sprite side-car, or bare stem).
    sprite: String,

    /// Destination rect width in pixels.
    #[arg(long, default_value_t = 200.0)]
    width: f32,

    /// Destination rect height in pixels.
    #[arg(long, default_value_t = 100.0)]
    height: f32,

    /// Projection mode: stretched, sliced, fixed, tiled, fit, fill.
    #[arg(long, default_value = "sliced")]
    mode: String,

    /// Round vertex positions to whole pixels.
    #[arg(long)]
    pixel_align: bool,

    /// Path to the INI configuration file.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn parse_mode(mode: &str) -> Option<ImageType> {
    match mode {
        "stretched" => Some(ImageType::Stretched),
        "sliced" => Some(ImageType::Sliced),
        "fixed" => Some(ImageType::Fixed),
        "tiled" => Some(ImageType::Tiled),
        "fit" => Some(ImageType::StretchedToFit),
        "fill" => Some(ImageType::StretchedToFill),
        _ => None,
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let Some(mode) = parse_mode(&args.mode) else {
        eprintln!("unknown mode \"{}\"", args.mode);
        return ExitCode::FAILURE;
    };

    let mut config = match &args.config {
        Some(path) => SpriteConfig::with_path(path),
        None => SpriteConfig::new(),
    };
    config.load_from_file().ok(); // ignore errors, use defaults

    // resolve against the asset root when the path does not exist as given
    let mut sprite_path = args.sprite.clone();
    if !Path::new(&sprite_path).exists() {
        let rooted = config.asset_root.join(&sprite_path);
        if rooted.exists() {
            sprite_path = rooted.display().to_string();
        }
    }

    let pixel_align = args.pixel_align || config.pixel_align;

    let mut textures = ImageTextureStore::new();
    let mut store = SpriteStore::new();
    let mut releaser = DeferredTextureReleaser::new();

    let Some(sprite) = store.acquire(&mut textures, &sprite_path) else {
        eprintln!("could not acquire sprite \"{}\"", sprite_path);
        return ExitCode::FAILURE;
    };

    let (width, height) = sprite.size(&textures);
    println!("key:     {}", sprite.key());
    println!("texture: {}x{} px", width, height);
    println!("borders: {:?}", sprite.borders());

    let transform = UiTransform::from_rect(0.0, 0.0, args.width, args.height);
    let mut draw = DrawList::new();
    render_image(
        &mut draw,
        &textures,
        Some(&sprite),
        mode,
        &transform,
        Color::WHITE,
        1.0,
        1.0,
        BlendMode::Normal,
        pixel_align,
        true,
    );

    println!(
        "\n{} draw command(s) for a {}x{} rect in {:?} mode:",
        draw.len(),
        args.width,
        args.height,
        mode
    );
    for command in &draw.commands {
        println!("{:#?}", command);
    }

    drop(sprite);
    store.shutdown(&releaser);
    releaser.drain(&mut textures);

    ExitCode::SUCCESS
}
