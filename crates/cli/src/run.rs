//! One generation run: load inputs, rename placeholders, generate, save.

use anyhow::{Context, Result};
use doorplate_core::{
    generate_slides, rename_placeholders, Error, GenerateOptions, ProfileStore, ProfileValues,
    ReportSummary, RunConfig, SlideRef,
};
use doorplate_pptx::PptxDeck;
use doorplate_svg::RoomNameExtractor;
use doorplate_xlsx::SpreadsheetLoader;

/// Execute a resolved configuration and return the run summary.
///
/// Nothing is written unless every step succeeds.
pub fn execute(config: &RunConfig) -> Result<ReportSummary> {
    let rooms = SpreadsheetLoader::new(config.sheet.clone())
        .load(&config.excel_path)
        .with_context(|| format!("Failed to load {}", config.excel_path.display()))?;
    log::info!(
        "Loaded {} rooms of section '{}'",
        rooms.len(),
        config.sheet.section_value
    );

    let names = RoomNameExtractor::new(config.svg_name_attribute.as_str())
        .extract_from_path(&config.svg_path)
        .with_context(|| format!("Failed to read room names from {}", config.svg_path.display()))?;
    log::info!("Found {} rooms in the floor plan", names.len());

    let mut deck = PptxDeck::open(&config.pptx_path)
        .with_context(|| format!("Failed to open {}", config.pptx_path.display()))?;

    rename_placeholders(
        &mut deck,
        SlideRef(config.pptx_slide_idx),
        &names,
        &config.pptx_shape_exclude,
    )?;

    let report = generate_slides(&mut deck, &rooms, &GenerateOptions::from(config))?;
    report.log();

    deck.save(&config.result_path)
        .with_context(|| format!("Failed to write {}", config.result_path.display()))?;

    Ok(report.summary())
}

/// Load a stored profile, failing if it does not exist.
pub fn load_profile(store: &dyn ProfileStore, name: &str) -> Result<ProfileValues> {
    Ok(store
        .load(name)?
        .ok_or_else(|| Error::ProfileNotFound(name.to_string()))?)
}
