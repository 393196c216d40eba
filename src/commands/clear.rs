use anyhow::Result;
use quando_core::settings::Settings;
use quando_core::store::Registry;

/// Forget every calendar. Whatever the data file held before is not read.
pub fn run(settings: &Settings) -> Result<()> {
    Registry::empty(&settings.data_file).save()?;
    Ok(())
}
