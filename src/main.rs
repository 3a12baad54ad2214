//! Guobiao - Chinese Official Mahjong hand analyzer
//!
//! A command-line tool for computing shanten, useful tiles and discard
//! choices for the five recognized winning shapes.

use std::process;

use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use colored::Colorize;
use serde::Serialize;

use guobiao::{
    discard::{DiscardResult, Shape, ShapeFlags, enum_discards},
    display::{shanten_description, table_tiles, tile_to_ascii, tile_to_unicode, tiles_to_unicode},
    hand::{Hand, count_useful_tiles, hand_to_table},
    parse::{parse_hand, parse_single_tile},
    shanten::{
        SHANTEN_INVALID, basic_shanten, honors_and_knitted_shanten, knitted_straight_shanten,
        seven_pairs_shanten, thirteen_orphans_shanten,
    },
    tile::Tile,
};

const AFTER_HELP: &str = r#"HAND FORMAT:
    Standard notation: numbers followed by suit letter
    m = Characters, p = Dots, s = Bamboo, z = Honors
    Honors (numeric): 1z=East, 2z=South, 3z=West, 4z=North, 5z=White, 6z=Green, 7z=Red
    Honors (letters): e=East, s=South, w=West, n=North, wh=White, g=Green, r=Red

    Fixed melds:
    (234m)   = Claimed chow of 2-3-4 man
    (111p)   = Claimed pung of 1-pin
    (1111s)  = Claimed kong of 1-sou
    [1111m]  = Concealed kong of 1-man

EXAMPLES:
    guobiao 1112345678999m                 Nine gates, all shapes
    guobiao 147m258p369s1122z              Knitted straight wait
    guobiao 1112345678999m -d 5m           Enumerate discards after drawing 5m
    guobiao "(234m)567m99p12345s" -d 6s    10-tile hand with one fixed chow
    guobiao 19m19p19s1234567z --shapes orphans
    guobiao 1122334455667m --json          Machine-readable output"#;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser)]
#[command(name = "guobiao")]
#[command(version)]
#[command(styles = styles())]
#[command(about = "Chinese Official Mahjong hand analyzer")]
#[command(after_help = AFTER_HELP)]
struct Args {
    /// Hand notation (e.g., 123m456p789s1122z)
    hand: String,

    /// Drawn tile: enumerate every discard instead of analyzing the hand
    #[arg(short = 'd', long = "draw")]
    drawn_tile: Option<String>,

    /// Shapes to evaluate (comma-separated): basic, pairs, orphans,
    /// knitted, honors, or all
    #[arg(long, default_value = "all")]
    shapes: String,

    /// Use ASCII output instead of Unicode tiles
    #[arg(long)]
    ascii: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

// JSON output structures

#[derive(Serialize)]
struct JsonShapeAnalysis {
    shape: Shape,
    shanten: i8,
    description: String,
    useful: Vec<String>,
    useful_count: u8,
}

#[derive(Serialize)]
struct JsonAnalysis {
    hand: String,
    shapes: Vec<JsonShapeAnalysis>,
}

#[derive(Serialize)]
struct JsonDiscardRow {
    discard: String,
    shape: Shape,
    shanten: i8,
    useful: Vec<String>,
    useful_count: u8,
}

#[derive(Serialize)]
struct JsonDiscards {
    hand: String,
    drawn: String,
    discards: Vec<JsonDiscardRow>,
}

fn parse_shape_flags(input: &str) -> Result<ShapeFlags, String> {
    let mut flags = ShapeFlags::NONE;
    for part in input.split(',') {
        let part = part.trim().to_lowercase();
        if part.is_empty() {
            continue;
        }
        flags = flags
            | match part.as_str() {
                "all" => ShapeFlags::ALL,
                "basic" => ShapeFlags::BASIC,
                "pairs" | "seven-pairs" => ShapeFlags::SEVEN_PAIRS,
                "orphans" | "thirteen-orphans" => ShapeFlags::THIRTEEN_ORPHANS,
                "knitted" | "knitted-straight" => ShapeFlags::KNITTED_STRAIGHT,
                "honors" | "honors-and-knitted" => ShapeFlags::HONORS_AND_KNITTED,
                other => {
                    return Err(format!(
                        "Unknown shape '{}'. Use basic, pairs, orphans, knitted, honors or all",
                        other
                    ));
                }
            };
    }
    if flags.is_empty() {
        return Err("No shapes selected".to_string());
    }
    Ok(flags)
}

/// Shanten and useful set of one shape for the standing tiles
fn analyze_shape(standing: &[Tile], shape: Shape) -> (i8, [bool; 34]) {
    let mut useful = [false; 34];
    let shanten = match shape {
        Shape::Basic => basic_shanten(standing, Some(&mut useful)),
        Shape::SevenPairs => seven_pairs_shanten(standing, Some(&mut useful)),
        Shape::ThirteenOrphans => thirteen_orphans_shanten(standing, Some(&mut useful)),
        Shape::KnittedStraight => knitted_straight_shanten(standing, Some(&mut useful)),
        Shape::HonorsAndKnitted => honors_and_knitted_shanten(standing, Some(&mut useful)),
    };
    (shanten, useful)
}

const ALL_SHAPES: [Shape; 5] = [
    Shape::Basic,
    Shape::SevenPairs,
    Shape::ThirteenOrphans,
    Shape::KnittedStraight,
    Shape::HonorsAndKnitted,
];

fn format_tile(tile: &Tile, use_unicode: bool) -> String {
    if use_unicode {
        tile_to_unicode(tile)
    } else {
        format!("{} ", tile_to_ascii(tile))
    }
}

fn format_useful(useful: &[bool; 34], use_unicode: bool) -> String {
    let tiles = table_tiles(useful);
    if tiles.is_empty() {
        return "-".to_string();
    }
    tiles
        .iter()
        .map(|t| format_tile(t, use_unicode))
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let hand = match parse_hand(&args.hand) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("{} {}", "Error parsing hand:".red().bold(), e);
            process::exit(1);
        }
    };

    let used_table = match hand_to_table(&hand) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{} {}", "Invalid hand:".red().bold(), e);
            process::exit(1);
        }
    };

    let shapes = match parse_shape_flags(&args.shapes) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    let drawn = match args.drawn_tile.as_deref().map(parse_single_tile).transpose() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{} {}", "Error parsing drawn tile:".red().bold(), e);
            process::exit(1);
        }
    };

    if drawn.is_some() && !matches!(hand.concealed.len(), 1 | 4 | 7 | 10 | 13) {
        eprintln!(
            "{} discard analysis needs a pre-draw hand (1, 4, 7, 10 or 13 concealed tiles), got {}",
            "Error:".red().bold(),
            hand.concealed.len()
        );
        process::exit(1);
    }

    let use_unicode = !args.ascii;

    match drawn {
        Some(drawn_tile) => {
            print_discards(&hand, drawn_tile, shapes, &args, use_unicode);
        }
        None => {
            print_analysis(&hand, &used_table, shapes, &args, use_unicode);
        }
    }
}

fn print_analysis(
    hand: &Hand,
    used_table: &[u8; 34],
    shapes: ShapeFlags,
    args: &Args,
    use_unicode: bool,
) {
    let standing = &hand.concealed;

    let mut rows = Vec::new();
    for shape in ALL_SHAPES {
        if !shapes.contains(shape.flag()) {
            continue;
        }
        let (shanten, useful) = analyze_shape(standing, shape);
        if shanten == SHANTEN_INVALID {
            continue; // shape does not apply to this tile count
        }
        let remaining = count_useful_tiles(used_table, &useful);
        rows.push((shape, shanten, useful, remaining));
    }

    if rows.is_empty() {
        eprintln!(
            "{}",
            "No selected shape applies to this tile count.".red().bold()
        );
        process::exit(1);
    }

    if args.json {
        let output = JsonAnalysis {
            hand: args.hand.clone(),
            shapes: rows
                .into_iter()
                .map(|(shape, shanten, useful, remaining)| JsonShapeAnalysis {
                    shape,
                    shanten,
                    description: shanten_description(shanten),
                    useful: table_tiles(&useful).iter().map(Tile::to_string).collect(),
                    useful_count: remaining,
                })
                .collect(),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("{} {}", "JSON error:".red().bold(), e);
                process::exit(1);
            }
        }
        return;
    }

    println!("\n{}", "Hand:".yellow().bold());
    println!("   {}", tiles_to_unicode_or_notation(standing, use_unicode));
    for meld in &hand.melds {
        println!("   fixed: {}", meld);
    }

    println!("\n{}", "Shanten by shape:".yellow().bold());
    for (shape, shanten, useful, remaining) in rows {
        let shanten_str = match shanten {
            -1 => shanten.to_string().green().bold(),
            0 => shanten.to_string().cyan().bold(),
            _ => shanten.to_string().white(),
        };
        println!(
            "   {:<24} {}  ({})",
            shape.name(),
            shanten_str,
            shanten_description(shanten).dimmed()
        );
        if shanten >= 0 {
            println!(
                "   {:<24} {} ({} left)",
                "".dimmed(),
                format_useful(&useful, use_unicode),
                remaining
            );
        }
    }
    println!();
}

fn print_discards(
    hand: &Hand,
    drawn_tile: Tile,
    shapes: ShapeFlags,
    args: &Args,
    use_unicode: bool,
) {
    let mut results: Vec<DiscardResult> = Vec::new();
    enum_discards(hand, drawn_tile, shapes, |r| {
        results.push(r.clone());
        true
    });

    if results.is_empty() {
        eprintln!(
            "{}",
            "No selected shape applies to this tile count.".red().bold()
        );
        process::exit(1);
    }

    // Visible tiles after the draw, for remaining-useful counts
    let mut used_table = guobiao::hand::tiles_to_table(&hand.concealed);
    used_table[guobiao::tile::tile_index(drawn_tile)] += 1;

    if args.json {
        let output = JsonDiscards {
            hand: args.hand.clone(),
            drawn: drawn_tile.to_string(),
            discards: results
                .iter()
                .map(|r| JsonDiscardRow {
                    discard: r.discard.to_string(),
                    shape: r.shape,
                    shanten: r.shanten,
                    useful: table_tiles(&r.useful).iter().map(Tile::to_string).collect(),
                    useful_count: count_useful_tiles(&used_table, &r.useful),
                })
                .collect(),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("{} {}", "JSON error:".red().bold(), e);
                process::exit(1);
            }
        }
        return;
    }

    println!("\n{}", "Hand:".yellow().bold());
    println!(
        "   {} drawing {}",
        tiles_to_unicode_or_notation(&hand.concealed, use_unicode),
        format_tile(&drawn_tile, use_unicode).trim_end()
    );

    println!("\n{}", "Discard options:".yellow().bold());
    let mut current_discard: Option<Tile> = None;
    for r in &results {
        if current_discard != Some(r.discard) {
            current_discard = Some(r.discard);
            println!(
                "\n   discard {}",
                format_tile(&r.discard, use_unicode).trim_end().bold()
            );
        }
        let shanten_str = match r.shanten {
            -1 => "win".green().bold().to_string(),
            n => n.to_string(),
        };
        println!(
            "     {:<24} {:<4} {}",
            r.shape.name().dimmed(),
            shanten_str,
            format_useful(&r.useful, use_unicode)
        );
    }
    println!();
}

fn tiles_to_unicode_or_notation(tiles: &[Tile], use_unicode: bool) -> String {
    if use_unicode {
        tiles_to_unicode(tiles)
    } else {
        guobiao::display::tiles_to_notation(tiles)
    }
}
