use std::process::ExitCode;

use lonk::app::{bootstrap, run};
use tracing::error;

fn main() -> ExitCode {
    bootstrap::init_tracing();
    match bootstrap::build_app() {
        Ok(app) => run(app),
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
