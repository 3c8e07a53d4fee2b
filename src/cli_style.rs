use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Stylize};
use unicode_width::UnicodeWidthStr;

const SECTION_WIDTH: usize = 48;

pub fn get_styles() -> Styles {
    let cyan = Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
    let green = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let red = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Red)));

    Styles::styled()
        .usage(cyan)
        .header(cyan)
        .literal(green)
        .valid(green)
        .invalid(red)
        .error(red)
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

mod colors {
    use crossterm::style::Color;

    pub const CYAN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 255,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 136,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
}

pub fn print_success(message: &str) {
    println!(" {} {}", "✓".with(colors::GREEN).bold(), message.with(colors::GREEN));
}

pub fn print_error(message: &str) {
    eprintln!(" {} {}", "✗".with(colors::RED).bold(), message.with(colors::RED));
}

pub fn print_warning(message: &str) {
    println!(" {} {}", "⚠".with(colors::ORANGE).bold(), message.with(colors::ORANGE));
}

/// Title centered in a rule of box drawing characters, measured in terminal
/// columns so artist names with wide glyphs line up.
fn section_rule(title: &str) -> (usize, usize) {
    let taken = title.width() + 2;
    let left = SECTION_WIDTH.saturating_sub(taken) / 2;
    let right = SECTION_WIDTH.saturating_sub(taken + left);
    (left, right)
}

pub fn print_section_header(title: &str) {
    let (left, right) = section_rule(title);
    println!(
        "{}{} {} {}{}",
        "╭".with(colors::CYAN),
        "─".repeat(left).with(colors::CYAN),
        title.with(colors::CYAN).bold(),
        "─".repeat(right).with(colors::CYAN),
        "╮".with(colors::CYAN),
    );
}

pub fn print_list_item(item: &str) {
    println!("  {}  {}", "▶".with(colors::CYAN), item);
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        "○".with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}
