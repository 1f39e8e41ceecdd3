use std::path::Path;

use camits_core::chart::LocatedChart;
use camits_core::pipeline::config::{ChartConfig, LocatePolicy};
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            warn: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_located_chart(
    scene: &Path,
    located: &LocatedChart,
    scale_factor: f64,
    config: &ChartConfig,
) {
    let s = Styles::new();
    print_title(&s, "Chart Location");

    println!("  {:<14}{}", s.label.apply_to("Scene"), s.path.apply_to(scene.display()));
    println!("  {:<14}{}", s.label.apply_to("Metric"), s.method.apply_to(config.metric));
    println!("  {:<14}{}", s.label.apply_to("Policy"), s.method.apply_to(config.policy));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Sweep"),
        s.value.apply_to(format!(
            "{:.3} .. {:.3} step {:.3}",
            config.scale_start * scale_factor,
            config.scale_stop * scale_factor,
            config.scale_step * scale_factor
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("Result"));
    if config.policy == LocatePolicy::FullFrameFallback && *located == LocatedChart::full_frame() {
        println!("    {:<12}{}", s.label.apply_to("Region"), s.warn.apply_to("full frame"));
    }
    for (label, v) in [
        ("x", located.xnorm),
        ("y", located.ynorm),
        ("width", located.wnorm),
        ("height", located.hnorm),
    ] {
        println!("    {:<12}{}", s.label.apply_to(label), s.value.apply_to(format!("{v:.4}")));
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!("{:.3}", located.scale))
    );
    println!();
}

pub fn print_image_stats(
    file: &Path,
    dims: (usize, usize),
    means: &[f64],
    variances: &[f64],
    snrs: &[f64],
    sharpness: f64,
) {
    let s = Styles::new();
    print_title(&s, "Image Statistics");

    println!("  {:<14}{}", s.label.apply_to("File"), s.path.apply_to(file.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Region"),
        s.value.apply_to(format!("{}x{}", dims.0, dims.1))
    );
    println!();

    let names: &[&str] = if means.len() == 3 { &["R", "G", "B"] } else { &["Y"] };
    println!(
        "  {}",
        s.header.apply_to(format!(
            "{:<8}{:>10}{:>14}{:>10}",
            "Channel", "Mean", "Variance", "SNR dB"
        ))
    );
    for (i, name) in names.iter().enumerate() {
        println!(
            "  {:<8}{:>10.4}{:>14.6}{:>10.2}",
            s.label.apply_to(name),
            means[i],
            variances[i],
            snrs[i]
        );
    }
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Sharpness"),
        s.value.apply_to(format!("{sharpness:.5}"))
    );
    println!();
}
