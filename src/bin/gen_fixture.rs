use log::LevelFilter;
use pbtrace::fixture::{write_fixture, FIXTURE_PATH};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    write_fixture(FIXTURE_PATH)?;
    Ok(())
}
