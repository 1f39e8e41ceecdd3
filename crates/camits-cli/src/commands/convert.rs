use std::path::PathBuf;

use anyhow::Result;
use camits_core::color::convert_capture_to_rgb_image;
use camits_core::io::image_io::write_image;
use camits_core::pipeline::config::ProcessingConfig;
use clap::Args;

use super::CaptureInput;

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: CaptureInput,

    /// Apply the display gamma curve before writing
    #[arg(long)]
    pub gamma: bool,

    /// Output file path (PNG, JPEG or TIFF by extension)
    #[arg(short, long, default_value = "rgb.png")]
    pub output: PathBuf,
}

pub fn run(args: &ConvertArgs, config: &ProcessingConfig) -> Result<()> {
    let (cap, props) = args.input.load()?;
    println!("Converting {} {}x{} capture...", cap.format, cap.width, cap.height);

    let rgb = convert_capture_to_rgb_image(&cap, props.as_ref(), &config.yuv)?;
    write_image(&rgb, &args.output, args.gamma)?;
    println!(
        "Saved {}x{} RGB image to {}",
        rgb.width(),
        rgb.height(),
        args.output.display()
    );
    Ok(())
}
