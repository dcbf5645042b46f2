//! Subcommand handlers. Each loads the deck, does one thing, and saves.

use std::path::Path;
use std::time::Duration;

use announce_core::notes::{parse, parse_timestamp};
use announce_core::qr::{extract_links, plan_tiles};
use announce_core::{
    load_config, AnnounceError, AnnouncementEngine, DailyTimer, Deck, Presentation, Result,
    RunGuard, RunReport, SlideId, SlideState,
};
use chrono::{Local, NaiveDateTime};
use tracing::info;

fn resolve_now(now: Option<&str>) -> Result<NaiveDateTime> {
    match now {
        Some(text) => parse_timestamp(text).ok_or_else(|| AnnounceError::InvalidTimestamp {
            key: "now",
            value: text.to_string(),
        }),
        None => Ok(Local::now().naive_local()),
    }
}

pub fn update(
    deck_path: &Path,
    config_path: Option<&Path>,
    now: Option<&str>,
    scheduled: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let now = resolve_now(now)?;

    let stale_after = Duration::from_secs(config.guard.stale_after_secs);
    let _guard = RunGuard::acquire(&RunGuard::lock_path_for(deck_path), stale_after)?;

    let mut deck = Deck::load(deck_path)?;
    if scheduled && !deck.is_timer_due(now) {
        info!(deck = %deck_path.display(), "Timer not due, nothing to do");
        return Ok(());
    }

    let report = AnnouncementEngine::new(config).run(&mut deck, now);
    deck.record_run(now);
    deck.save(deck_path)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "{} slides: {} new badges, {} badges cleared, {} expired, {} zombies, {} copies reset",
        report.slides_seen,
        report.badges_added.len(),
        report.badges_removed.len(),
        report.expired.len(),
        report.zombies.len(),
        report.copies_reset.len(),
    );
    for fault in &report.faults {
        println!("  skipped {fault}");
    }
}

pub fn add(deck_path: &Path, lines: &[String]) -> Result<()> {
    let mut deck = Deck::load_or_default(deck_path)?;
    let id = deck.push_slide(&lines.join("\n"));
    deck.save(deck_path)?;
    println!("{id}");
    Ok(())
}

pub fn duplicate(deck_path: &Path, slide: &str) -> Result<()> {
    let mut deck = Deck::load(deck_path)?;
    let copy = deck.duplicate_slide(&SlideId::from(slide))?;
    deck.save(deck_path)?;
    println!("{copy}");
    Ok(())
}

pub fn move_slide(deck_path: &Path, slide: &str, index: usize) -> Result<()> {
    let mut deck = Deck::load(deck_path)?;
    deck.move_slide(&SlideId::from(slide), index)?;
    deck.save(deck_path)
}

pub fn show(deck_path: &Path, now: Option<&str>) -> Result<()> {
    let deck = Deck::load(deck_path)?;
    let now = resolve_now(now)?;

    for (position, slide) in deck.slides().iter().enumerate() {
        let state = match parse(&slide.notes) {
            Ok(fields) => SlideState::classify(&fields, now).to_string(),
            Err(e) => format!("unreadable ({e})"),
        };
        println!("[{position}] {} {state}", slide.id);
        for marker in &slide.markers {
            println!("    marker: {} ({})", marker.label, marker.color);
        }
        for line in slide.notes.lines().filter(|l| !l.trim().is_empty()) {
            println!("    | {line}");
        }
    }
    Ok(())
}

pub fn qr(deck_path: &Path, slide: &str, text: &str) -> Result<()> {
    let mut deck = Deck::load(deck_path)?;
    let links = extract_links(text);
    let tiles = plan_tiles(&links)?;
    deck.insert_images(&SlideId::from(slide), &tiles)?;
    deck.save(deck_path)?;
    for tile in &tiles {
        println!("{} -> {}", tile.link, tile.image_url);
    }
    Ok(())
}

pub fn timer_set(deck_path: &Path, confirmation: &str, hour: &str) -> Result<()> {
    let timer = DailyTimer::confirm(confirmation, hour)?;
    let mut deck = Deck::load(deck_path)?;
    if let Some(previous) = deck.timer() {
        info!(hour = previous.hour, "Replacing existing timer");
    }
    deck.set_timer(timer);
    deck.save(deck_path)?;
    println!("Daily update set for {:02}:00", timer.hour);
    Ok(())
}

pub fn timer_remove(deck_path: &Path) -> Result<()> {
    let mut deck = Deck::load(deck_path)?;
    match deck.clear_timer() {
        Some(timer) => {
            deck.save(deck_path)?;
            println!("Removed daily update at {:02}:00", timer.hour);
        }
        None => println!("No timer set"),
    }
    Ok(())
}

pub fn timer_show(deck_path: &Path) -> Result<()> {
    let deck = Deck::load(deck_path)?;
    let Some(timer) = deck.timer() else {
        println!("No timer set");
        return Ok(());
    };
    let now = Local::now().naive_local();
    match timer.next_run_after(now) {
        Some(next) => println!("Daily at {:02}:00, next run {next}", timer.hour),
        None => println!("Daily at {:02}:00", timer.hour),
    }
    if let Some(last) = deck.last_run() {
        println!("Last run {last}");
    }
    Ok(())
}
