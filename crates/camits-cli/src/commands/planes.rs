use std::path::PathBuf;

use anyhow::{Context, Result};
use camits_core::io::image_io::write_image;
use camits_core::planes::{convert_capture_to_planes, Planes};
use camits_core::quality::image_means;
use clap::Args;

use super::CaptureInput;

#[derive(Args)]
pub struct PlanesArgs {
    #[command(flatten)]
    pub input: CaptureInput,

    /// Directory the plane images are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File name prefix of each plane image
    #[arg(long, default_value = "plane")]
    pub prefix: String,

    /// Image extension (png or tiff)
    #[arg(long, default_value = "png")]
    pub ext: String,
}

pub fn run(args: &PlanesArgs) -> Result<()> {
    let (cap, props) = args.input.load()?;
    let planes = convert_capture_to_planes(&cap, props.as_ref())?;

    if let Planes::RawStats { mean, variance } = &planes {
        let (h, w, c) = mean.dim();
        println!("rawStats grid {}x{} with {} channels", w, h, c);
        println!("Mean range:     {:.2} .. {:.2}", min_of(mean.iter()), max_of(mean.iter()));
        println!(
            "Variance range: {:.2} .. {:.2}",
            min_of(variance.iter()),
            max_of(variance.iter())
        );
        return Ok(());
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    for (name, img) in planes.names().iter().zip(planes.to_images()?) {
        let path = args
            .output_dir
            .join(format!("{}_{}.{}", args.prefix, name, args.ext));
        write_image(&img, &path, false)?;
        println!(
            "{:<3} {}x{}  mean {:.4}  -> {}",
            name,
            img.width(),
            img.height(),
            image_means(&img)[0],
            path.display()
        );
    }
    Ok(())
}

fn min_of<'a>(values: impl Iterator<Item = &'a f32>) -> f32 {
    values.copied().fold(f32::INFINITY, f32::min)
}

fn max_of<'a>(values: impl Iterator<Item = &'a f32>) -> f32 {
    values.copied().fold(f32::NEG_INFINITY, f32::max)
}
