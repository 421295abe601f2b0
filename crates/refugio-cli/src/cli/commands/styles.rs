//! `refugio styles` – list wallpaper styles.

use refugio_core::generate::STYLES;

pub fn run_styles() {
    println!("{:<10} {:<10} {}", "ID", "NAME", "PROMPT");
    for s in STYLES {
        println!("{:<10} {:<10} {}", s.id, s.name, s.prompt);
    }
}
