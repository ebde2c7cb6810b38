mod cli;
mod core;
mod render;

fn main() -> anyhow::Result<()> {
    cli::run::entry()
}
