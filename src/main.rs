//! fencecrew main entrypoint.

use fencecrew::run;
use fencecrew::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
