//! Binary entrypoint for the `coldsnap` command.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = coldsnap_cli::run().await;
    if exit_code != 0 {
        process::exit(exit_code);
    }
}
