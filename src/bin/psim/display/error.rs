use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_io_hints(err);
        collector.collect_chem_hints(err);
        collector.collect_pharm_hints(err);
        collector.collect_config_hints(err);
        collector.collect_game_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_io_hints(&mut self, err: &Error) {
        let Some(io_err) = err.downcast_ref::<pharmsim::io::Error>() else {
            return;
        };

        self.mark_typed();
        self.add_io_error_hints(io_err);
    }

    fn add_io_error_hints(&mut self, io_err: &pharmsim::io::Error) {
        use pharmsim::io::Error as IoError;

        match io_err {
            IoError::Io { source } => {
                self.collect_std_io_hints(source);
            }

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue near line {} in {} format",
                    line, format
                ));
                self.add("Inspect the file around that line for malformed entries");
            }

            IoError::UnsupportedWriteFormat(fmt) => {
                self.add(format!("The '{}' format cannot be used for this result", fmt));
                self.add("Curves can be written as csv or json; molecules as sdf or json");
            }

            IoError::Json(_) => {
                self.add("The result could not be encoded as JSON");
                self.add("Non-finite numbers are written as null; check the inputs");
            }

            IoError::RaggedProfile { title, .. } => {
                self.add(format!("A curve in '{}' does not match its x grid", title));
                self.add("This indicates a library bug; please report it");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the directory exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Verify the file is not truncated or corrupted");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe: output consumer terminated");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_chem_hints(&mut self, err: &Error) {
        let chem_err = err.downcast_ref::<pharmsim::chem::Error>().or_else(|| {
            match err.downcast_ref::<pharmsim::game::Error>() {
                Some(pharmsim::game::Error::Chem(inner)) => Some(inner),
                _ => None,
            }
        });
        let Some(chem_err) = chem_err else {
            return;
        };

        self.mark_typed();
        self.add_chem_error_hints(chem_err);
    }

    fn add_chem_error_hints(&mut self, chem_err: &pharmsim::chem::Error) {
        use pharmsim::chem::Error as ChemError;

        match chem_err {
            ChemError::Smiles { position, .. } => {
                self.add(format!("SMILES could not be read past character {}", position + 1));
                self.add("Check ring-closure digits, brackets and parentheses balance");
                self.add("Quote the SMILES in the shell, e.g. 'CC(=O)O'");
            }

            ChemError::Valence { symbol, .. } => {
                self.add(format!("An {} atom has more bonds than it can take", symbol));
                self.add("Use a bracket atom with a charge for hypervalent cases, e.g. [N+]");
            }

            ChemError::AromaticOutsideRing(_) => {
                self.add("Lowercase (aromatic) atoms must be part of a ring");
                self.add("Write chain atoms in uppercase, e.g. C instead of c");
            }

            ChemError::InvalidFragment { .. } => {
                self.add("Functional groups need exactly one attachment point written as *");
                self.add("Example: [*:1]C(=O)O for a carboxylic acid");
            }

            ChemError::NoHydrogen => {
                self.add("Every heavy atom is already fully substituted");
                self.add("Start from a molecule with at least one C-H, N-H or O-H");
            }

            ChemError::AtomIndex { .. } => {
                self.add("An edit referred to an atom that does not exist");
            }

            ChemError::EmptyMolecule => {
                self.add("The SMILES string contains no atoms");
            }
        }
    }

    fn collect_pharm_hints(&mut self, err: &Error) {
        use pharmsim::pharm::Error as PharmError;

        let Some(pharm_err) = err.downcast_ref::<PharmError>() else {
            return;
        };

        self.mark_typed();

        match pharm_err {
            PharmError::InvalidParameter { name, .. } => {
                self.add(format!("Adjust the '{}' input and run again", name));
                self.add("Use --help on the subcommand to see defaults and units");
            }

            PharmError::UnknownEntry { kind, .. } => {
                self.add(format!("No {} by that name in the built-in tables", kind));
                if *kind == "excipient" {
                    self.add("Run 'psim excipient list' to see the available excipients");
                }
            }

            PharmError::FormulationTotal { total } => {
                let gap = 100.0 - total;
                if gap > 0.0 {
                    self.add(format!("Add {:.1}% more excipient, e.g. more filler", gap));
                } else {
                    self.add(format!("Remove {:.1}% of excipient", -gap));
                }
                self.add("Percentages refer to the excipient share of the tablet weight");
            }
        }
    }

    fn collect_config_hints(&mut self, err: &Error) {
        use pharmsim::config::Error as ConfigError;

        let Some(config_err) = err.downcast_ref::<ConfigError>() else {
            return;
        };

        self.mark_typed();

        match config_err {
            ConfigError::Parse(_) => {
                self.add("Configuration file has invalid TOML syntax or a mistyped value");
                self.add("Only the keys you want to change need to be present");
            }

            ConfigError::Read { source, .. } => {
                self.add("Configuration file could not be read");
                self.collect_std_io_hints(source);
            }
        }
    }

    fn collect_game_hints(&mut self, err: &Error) {
        use pharmsim::game::Error as GameError;

        let Some(game_err) = err.downcast_ref::<GameError>() else {
            return;
        };

        self.mark_typed();

        match game_err {
            GameError::Chem(_) => {}

            GameError::Render(inner) => {
                self.add("The molecule could not be rendered");
                self.add_io_error_hints(inner);
            }

            GameError::UnknownSubstituent(_) => {
                self.add("Run 'psim game groups' to list the functional-group library");
            }

            GameError::UnknownMode(_) => {
                self.add("Modes: tutorial, design, fix-it, time-trial");
            }

            GameError::ZeroCapacity => {
                self.add("Set game.render_cache_capacity to 1 or more in the config file");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("session") {
            self.add("The session file may be corrupt; start over with 'psim game new'");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
            return;
        }

        if msg.contains("format") {
            self.add("Pick the format with --format table|csv|json|sdf");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
