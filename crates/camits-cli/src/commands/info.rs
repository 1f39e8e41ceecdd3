use std::path::PathBuf;

use anyhow::Result;
use camits_core::io::capture_file::{load_camera_properties, load_capture_sidecar};
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// Capture sidecar (JSON)
    pub capture: PathBuf,

    /// Camera properties (JSON)
    #[arg(long)]
    pub props: Option<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let sidecar = load_capture_sidecar(&args.capture)?;
    let format = sidecar.capture_format()?;
    let meta = &sidecar.metadata;

    println!("File:          {}", args.capture.display());
    println!("Dimensions:    {}x{}", sidecar.width, sidecar.height);
    println!("Format:        {}", format);
    if let Some(gains) = meta.color_gains {
        println!("WB gains:      {:?}", gains);
    }
    if let Ok(ccm) = meta.ccm() {
        println!("CCM:           {:?}", ccm);
    }
    if let Some(focal) = meta.focal_length {
        println!("Focal length:  {:.2} mm", focal);
    }
    if let Some(exp) = meta.exposure_time_ns {
        println!("Exposure:      {:.3} ms", exp as f64 / 1e6);
    }
    if let Some(iso) = meta.sensitivity {
        println!("Sensitivity:   {}", iso);
    }
    if let Some(state) = meta.lens_state {
        println!("Lens state:    {}", if state == 0 { "stationary" } else { "moving" });
    }

    if let Some(ref path) = args.props {
        let props = load_camera_properties(path)?;
        println!();
        println!("Properties:    {}", path.display());
        if let Some(white) = props.white_level {
            println!("White level:   {}", white);
        }
        if let Some(black) = props.black_level_pattern {
            println!("Black levels:  {:?}", black);
        }
        if let Ok(cfa) = props.cfa_arrangement() {
            println!("CFA:           {:?}", cfa);
        }
        if let Some(size) = props.pixel_array_size {
            println!("Pixel array:   {}x{}", size.width, size.height);
        }
        if let Some(rect) = props.active_array_size {
            println!(
                "Active array:  {}x{} at ({}, {})",
                rect.width(),
                rect.height(),
                rect.left,
                rect.top
            );
        }
        if let Some(phys) = props.physical_size {
            println!("Sensor size:   {:.2} x {:.2} mm", phys.width, phys.height);
        }
    }

    Ok(())
}
