use console::style;
use tui_banner::{Align, Banner, ColorMode, Fill, Gradient, GradientDirection, Palette};

const DIM: u8 = 240;

const TAGLINE: &str = "BLE exploration & security auditing toolkit";

/// Print the session banner.
pub fn show_banner() {
    let palette = Palette::from_hex(&[
        "#87D7FF", // pale sky
        "#00AFFF", // signal blue
        "#005FD7", // deep blue
        "#5F5FAF", // muted indigo
    ]);
    let gradient = Gradient::new(palette.colors().to_vec(), GradientDirection::Diagonal);

    let banner_text = match Banner::new("BLESCOPE") {
        Ok(b) => b
            .gradient(gradient)
            .fill(Fill::Keep)
            .align(Align::Left)
            .trim_vertical(true)
            .color_mode(ColorMode::TrueColor)
            .render(),
        Err(_) => {
            // Fallback if FIGlet font fails
            format!("{}\n", style("BLESCOPE").cyan().bold())
        }
    };

    println!();
    print!("{banner_text}");
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");
    println!("{}", style(format!("v{version} ({git_hash})")).color256(DIM));
    println!("{}", style(TAGLINE).white().bold());
    println!();
}
