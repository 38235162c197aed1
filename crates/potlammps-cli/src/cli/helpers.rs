use super::CliError;
use super::commands::{PairArgs, PotentialArgs};
use anyhow::Context;
use potlammps_core::common::{MassTable, PromptingMassLookup};
use potlammps_core::modules::serialization::write_text_artifact;
use potlammps_core::{PairInfoOptions, PotentialLammps};
use std::io::{Stderr, StdinLock};
use std::path::Path;
use tracing::{debug, info};

/// `--masses` entry that keeps the potential's own mass for that type.
pub(super) const KEEP_MASS: &str = "_";

pub(super) type CliMassLookup = PromptingMassLookup<MassTable, StdinLock<'static>, Stderr>;

pub(super) fn load_potential(args: &PotentialArgs) -> Result<PotentialLammps, CliError> {
    let potential = PotentialLammps::from_path(
        &args.potential,
        args.name.as_deref(),
        args.pot_dir.as_deref(),
    )?;
    debug!(
        path = %args.potential.display(),
        name = potential.name().unwrap_or_default(),
        "loaded potential"
    );
    Ok(potential)
}

pub(super) fn load_mass_table(path: Option<&Path>) -> Result<MassTable, CliError> {
    let Some(path) = path else {
        return Ok(MassTable::new());
    };
    let table = MassTable::from_path(path)
        .with_context(|| format!("failed to load mass table '{}'", path.display()))?;
    debug!(path = %path.display(), entries = table.len(), "loaded mass table");
    Ok(table)
}

/// Mass table lookup that asks on stderr/stdin, leaving stdout to the script.
pub(super) fn mass_lookup(path: Option<&Path>) -> Result<CliMassLookup, CliError> {
    let table = load_mass_table(path)?;
    Ok(PromptingMassLookup::new(
        table,
        std::io::stdin().lock(),
        std::io::stderr(),
    ))
}

pub(super) fn parse_masses(values: &[String]) -> Result<Vec<Option<f64>>, CliError> {
    values
        .iter()
        .map(|value| {
            let value = value.trim();
            if value == KEEP_MASS {
                return Ok(None);
            }
            value.parse::<f64>().map(Some).map_err(|_| {
                CliError::Usage(format!(
                    "invalid value '{value}' for '--masses': expected a number or '{KEEP_MASS}'"
                ))
            })
        })
        .collect()
}

pub(super) fn pair_options(args: &PairArgs) -> Result<PairInfoOptions, CliError> {
    let masses = args
        .masses
        .as_deref()
        .map(parse_masses)
        .transpose()?;

    Ok(PairInfoOptions {
        symbols: args.symbols.clone(),
        masses,
        prompt: args.prompt,
        comments: !args.no_comments,
    })
}

/// Writes generated text to `output`, or to stdout when no file is given.
pub(super) fn emit(output: Option<&Path>, content: &str) -> Result<(), CliError> {
    match output {
        Some(path) => {
            write_text_artifact(path, content)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            info!(path = %path.display(), "wrote script");
        }
        None => print!("{content}"),
    }
    Ok(())
}
