//! The threadgate server binary.
//!
//! See [`threadgate_server::cli`] for the available commands.

fn main() -> anyhow::Result<()> {
    threadgate_server::cli::execute()
}
