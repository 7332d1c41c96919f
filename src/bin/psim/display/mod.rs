mod banner;
mod error;
mod progress;
mod report;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use report::Report;
pub use tables::{fmt_num, print_lipinski_table};

/// Whether decorations (banner, spinner, file notices) go to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
}

impl Context {
    /// Interactive when stderr is a terminal and `--quiet` was not given.
    pub fn new(quiet: bool) -> Self {
        Self {
            interactive: !quiet && crate::io::stderr_is_tty(),
        }
    }
}
