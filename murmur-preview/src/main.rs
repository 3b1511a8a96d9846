//! Murmur preview - lay out a message script in the terminal.
//!
//! Reads a JSON script, runs every message through the layout engine and
//! prints the resulting lines. An optional selection prints the copied text.

mod script;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use murmur_layout::{
    CosmicMetrics, LayoutElement, LayoutKind, MessageColors, MessageLayout, MetricsProvider,
    MonospaceMetrics, RenderingContext, Selection, SelectionItem, Settings, selected_text,
};
use tracing_subscriber::EnvFilter;

use crate::script::Script;

/// Lay out chat messages and print their lines.
#[derive(Debug, Parser)]
#[command(name = "murmur-preview", version)]
struct Args {
    /// JSON message script
    script: PathBuf,

    /// Canvas width in logical pixels
    #[arg(long, short = 'w', default_value = "400")]
    width: f32,

    /// UI scale
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Settings file (JSON); defaults are used when omitted
    #[arg(long, short = 's')]
    settings: Option<PathBuf>,

    /// Shape text with cosmic-text instead of fixed 8px cells
    #[arg(long)]
    cosmic: bool,

    /// Base font size for --cosmic
    #[arg(long, default_value = "13.0")]
    font_size: f32,

    /// Print the copy text of a selection, e.g. `0:0-2:5`
    #[arg(long)]
    select: Option<String>,

    /// Dump content elements as JSON instead of laying them out
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };
    let (images, messages) = Script::load(&args.script)?.build();

    if args.json {
        for message in &messages {
            let elements: Vec<_> = message.elements.iter().map(|element| element.to_json()).collect();
            println!("{}", serde_json::to_string_pretty(&elements)?);
        }
        return Ok(());
    }

    let metrics: Box<dyn MetricsProvider> = if args.cosmic {
        Box::new(CosmicMetrics::new(args.font_size))
    } else {
        Box::new(MonospaceMetrics::default())
    };
    let colors = MessageColors::default();
    let ctx = RenderingContext::new(&settings, &colors, metrics.as_ref(), &images)
        .with_width(args.width)
        .with_scale(args.scale);

    let mut layouts: Vec<MessageLayout> = messages
        .into_iter()
        .map(|message| MessageLayout::new(Arc::new(message)))
        .collect();

    let mut y = 0.0;
    for (index, layout) in layouts.iter_mut().enumerate() {
        layout.layout(&ctx);
        print_layout(index, y, layout);
        y += layout.height();
    }
    tracing::info!(messages = layouts.len(), total_height = y, "layout finished");

    if let Some(range) = &args.select {
        let selection = parse_selection(range)?;
        println!("--- selection {range}");
        println!("{}", selected_text(&layouts, &selection, settings.copy_mode));
    }
    Ok(())
}

fn print_layout(index: usize, y: f32, layout: &MessageLayout) {
    let container = layout.container();
    let collapsed = if layout.is_collapsed() { " collapsed" } else { "" };
    println!(
        "#{index} id={} y={y} height={}{collapsed}",
        layout.message().id,
        layout.height()
    );
    for (line_index, line) in container.lines().iter().enumerate() {
        let words: Vec<String> = container.elements()[line.start_index..line.end_index]
            .iter()
            .map(describe)
            .collect();
        println!(
            "  {line_index:>2} chars {:>3}..{:<3} {}",
            line.start_char_index,
            line.end_char_index,
            words.join(" ")
        );
    }
}

fn describe(element: &LayoutElement) -> String {
    match &element.kind {
        LayoutKind::Text { text, .. } => text.clone(),
        LayoutKind::TextIcon { line1, line2, .. } => format!("[{line1}/{line2}]"),
        LayoutKind::Image { image, .. } => {
            let name = element.copy_text.as_deref().unwrap_or(image.as_str());
            format!("<{name}>")
        }
        LayoutKind::LayeredImage { .. } => {
            format!("<{}>", element.copy_text.as_deref().unwrap_or("layered"))
        }
        LayoutKind::ReplyCurve { .. } => "\u{2570}".to_string(),
    }
}

/// Parse `message:char-message:char`.
fn parse_selection(range: &str) -> Result<Selection> {
    let Some((start, end)) = range.split_once('-') else {
        bail!("selection must look like 0:0-2:5, got {range:?}");
    };
    Ok(Selection::new(parse_item(start)?, parse_item(end)?))
}

fn parse_item(item: &str) -> Result<SelectionItem> {
    let Some((message, char_index)) = item.split_once(':') else {
        bail!("selection endpoint must look like 2:5, got {item:?}");
    };
    let message = message.trim().parse().with_context(|| format!("message index in {item:?}"))?;
    let char_index = char_index.trim().parse().with_context(|| format!("char index in {item:?}"))?;
    Ok(SelectionItem::new(message, char_index))
}
