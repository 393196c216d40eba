use anyhow::Result;
use quando_core::store::Registry;

pub fn run(registry: &mut Registry, name: &str) -> Result<()> {
    if registry.remove(name).is_none() {
        log::warn!("No calendar named {name}");
    }

    registry.save()?;
    Ok(())
}
