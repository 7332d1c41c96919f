use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use serde_json::json;
use tracing::{debug, info};

use pharmsim::chem::{Dimensions, EmbedOptions};
use pharmsim::config::GameSettings;
use pharmsim::game::{Action, Game, GameMode, RenderCache, SessionRecord, Turn};

use super::mol::resolve_fragment;
use super::{Invocation, announce_written};
use crate::cli::{DimsArg, GameAction, GameArgs, OutputFormat};
use crate::display::{Report, print_lipinski_table};
use crate::io::create_output;

pub fn run(args: GameArgs, inv: &Invocation) -> Result<()> {
    let game = Game::new(inv.settings.game.clone());

    let now = unix_now()?;
    let (record, action) = match args.action {
        GameAction::New { mode } => (game.new_session(), Action::SetMode(mode)),
        GameAction::Show => (load_session(&args.session, &game)?, Action::Refresh),
        GameAction::Mode { mode } => (load_session(&args.session, &game)?, Action::SetMode(mode)),
        GameAction::Add { group } => {
            let fragment = resolve_fragment(game.settings(), &group)?;
            (load_session(&args.session, &game)?, Action::AddGroup(fragment))
        }
        GameAction::Smiles { smiles } => {
            (load_session(&args.session, &game)?, Action::SetSmiles(smiles))
        }
        GameAction::View { dims } => (
            load_session(&args.session, &game)?,
            Action::ToggleView(matches!(dims, DimsArg::Three)),
        ),
        GameAction::Groups => return emit_groups(game.settings(), inv),
    };

    debug!(?action, "applying game action");
    let turn = game.handle(record, action, now);
    save_session(&args.session, &turn.record)?;
    info!(
        score = turn.record.score,
        smiles = %turn.record.current_smiles,
        "session saved"
    );

    emit_turn(&turn, inv)
}

fn unix_now() -> Result<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is set before 1970")?;
    Ok(elapsed.as_secs())
}

/// Reads the saved session, or starts a fresh one when none exists yet.
fn load_session(path: &Path, game: &Game) -> Result<SessionRecord> {
    if !path.exists() {
        debug!(path = %path.display(), "no session file, starting fresh");
        return Ok(game.new_session());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse session file '{}'", path.display()))
}

fn save_session(path: &Path, record: &SessionRecord) -> Result<()> {
    let text = serde_json::to_string_pretty(record).context("Failed to encode session")?;
    fs::write(path, text + "\n")
        .with_context(|| format!("Failed to write session file '{}'", path.display()))
}

fn turn_report(turn: &Turn, settings: &GameSettings) -> Report {
    let record = &turn.record;
    let mut rows = vec![
        ("Mode", record.mode.to_string()),
        ("Score", record.score.to_string()),
        ("Molecule", record.current_smiles.clone()),
        ("View", String::from(if record.view_3d { "3D" } else { "2D" })),
    ];
    if let Some(left) = turn.remaining_s {
        rows.push(("Time left (s)", left.max(0).to_string()));
    } else if record.mode == GameMode::TimeTrial {
        rows.push(("Time limit (s)", settings.time_limit_s.to_string()));
    }
    if !record.message.is_empty() {
        rows.push(("Message", record.message.clone()));
    }

    let mut report = Report::new("Lipinski Rule-of-5 Game")
        .metrics("Session", rows)
        .notes("Objective", [record.mode.briefing()]);
    if turn.report.is_none() && !turn.time_up {
        report = report.notes("Status", ["The current molecule could not be evaluated"]);
    }
    report
}

fn emit_turn(turn: &Turn, inv: &Invocation) -> Result<()> {
    let mut writer = create_output(inv.output.path.as_deref())?;
    match inv.output.format {
        OutputFormat::Table => {
            turn_report(turn, &inv.settings.game)
                .write_text(&mut writer)
                .context("Failed to write report")?;
            if let Some(report) = &turn.report {
                print_lipinski_table(&mut writer, report);
                writeln!(writer)?;
            }
        }
        OutputFormat::Json => pharmsim::io::json::write(
            &mut writer,
            &json!({
                "session": &turn.record,
                "report": &turn.report,
                "remaining_s": turn.remaining_s,
                "time_up": turn.time_up,
            }),
        )?,
        OutputFormat::Sdf => {
            let settings = &inv.settings.game;
            let mut cache = RenderCache::new(
                settings.render_cache_capacity,
                EmbedOptions {
                    seed: settings.embed_seed,
                    iterations: settings.embed_iterations,
                },
            )?;
            let dims = if turn.record.view_3d {
                Dimensions::Three
            } else {
                Dimensions::Two
            };
            let block = cache.molblock(&turn.record.current_smiles, dims)?;
            writeln!(writer, "{}$$$$", block)?;
        }
        OutputFormat::Csv => bail!("The game has no curve data; use --format table, json or sdf"),
    }
    writer.flush()?;

    announce_written(inv, &turn.record.current_smiles);
    Ok(())
}

fn emit_groups(settings: &GameSettings, inv: &Invocation) -> Result<()> {
    let rows = settings
        .substituents
        .iter()
        .map(|s| vec![s.key.clone(), s.name.clone(), s.smiles.clone()])
        .collect();
    let entries: Vec<_> = settings
        .substituents
        .iter()
        .map(|s| json!({ "key": s.key, "name": s.name, "smiles": s.smiles }))
        .collect();
    let report = Report::new("Functional Groups")
        .table("Library", &["Key", "Name", "Fragment"], rows)
        .data(&entries)?;
    super::emit(&report, inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("psim-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_session_starts_fresh() {
        let game = Game::default();
        let record = load_session(&scratch("missing"), &game).unwrap();
        assert_eq!(record, game.new_session());
    }

    #[test]
    fn session_survives_save_and_load() {
        let game = Game::default();
        let path = scratch("roundtrip");
        let turn = game.handle(game.new_session(), Action::SetMode(GameMode::DesignChallenge), 10);
        save_session(&path, &turn.record).unwrap();
        let loaded = load_session(&path, &game).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, turn.record);
        assert_eq!(loaded.score, 1);
    }

    #[test]
    fn corrupt_session_is_reported() {
        let path = scratch("corrupt");
        fs::write(&path, "not json").unwrap();
        let err = load_session(&path, &Game::default()).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(err.to_string().contains("session file"));
    }

    #[test]
    fn report_shows_trial_clock() {
        let game = Game::default();
        let turn = game.handle(game.new_session(), Action::SetMode(GameMode::TimeTrial), 100);
        let mut buf = Vec::new();
        turn_report(&turn, game.settings()).write_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Time left (s)"));
        assert!(text.contains("time trial"));
    }
}
