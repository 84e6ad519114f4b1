use anyhow::Result;

fn main() -> Result<()> {
    notefind::cli::run()
}
