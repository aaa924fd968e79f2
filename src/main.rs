use std::process;

use anyhow::Result;
use clap::Parser;
use console::style;

use merch::cmd::App;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{}: {err:#}", style("error").red().bold());
            process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    let app = App::parse();
    app.run().await
}
