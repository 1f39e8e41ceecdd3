use std::path::PathBuf;

use anyhow::{bail, Result};
use camits_core::filters::normalize::normalize_image;
use camits_core::io::image_io::load_rgb_image;
use camits_core::quality::{
    image_means, image_sharpness, image_snrs, image_snrs_checked, image_variances,
};
use clap::Args;

use crate::summary::print_image_stats;

#[derive(Args)]
pub struct StatsArgs {
    /// Input image file
    pub file: PathBuf,

    /// Normalized patch "x,y,w,h" to analyse instead of the whole image
    #[arg(long)]
    pub patch: Option<String>,

    /// Stretch the analysed region to [0, 1] first
    #[arg(long)]
    pub normalize: bool,

    /// Fail on flat channels instead of reporting infinite or NaN SNR
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &StatsArgs) -> Result<()> {
    let mut img = load_rgb_image(&args.file)?;
    if let Some(ref patch) = args.patch {
        let [x, y, w, h] = parse_patch(patch)?;
        img = img.patch(x, y, w, h);
    }
    if args.normalize {
        img = normalize_image(&img);
    }

    let snrs = if args.strict {
        image_snrs_checked(&img)?
    } else {
        image_snrs(&img)
    };
    print_image_stats(
        &args.file,
        (img.width(), img.height()),
        &image_means(&img),
        &image_variances(&img),
        &snrs,
        image_sharpness(&img)?,
    );
    Ok(())
}

fn parse_patch(text: &str) -> Result<[f64; 4]> {
    let values: Vec<f64> = text
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()?;
    match values.as_slice() {
        &[x, y, w, h] => Ok([x, y, w, h]),
        _ => bail!("Patch must be four comma-separated values, got '{text}'"),
    }
}
