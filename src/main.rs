use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    thaw::cli::main().await
}
