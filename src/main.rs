//! vbsa main entrypoint.

use vbsa::run;
use vbsa::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
