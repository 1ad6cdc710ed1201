mod classify;
mod options;
mod render;
mod wardstats;
mod webmap;

use anyhow::Result;
use clap::Parser;
use options::Cli;

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse() {
        Cli::Classify(classify) => classify.run(),
        Cli::Zonal(zonal) => zonal.run(),
        Cli::Render(render) => render.run(),
        Cli::Webmap(webmap) => webmap.run(),
    }
}
