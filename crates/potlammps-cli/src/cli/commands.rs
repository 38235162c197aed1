use super::CliError;
use super::helpers::*;
use anyhow::Context;
use potlammps_core::modules::query::{DocumentQuery, QueryFilters, TableFilter};
use potlammps_core::{DataScriptOptions, PotentialLammps};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

#[derive(clap::Args)]
pub(super) struct PotentialArgs {
    /// potential-LAMMPS JSON document
    #[arg(long, short = 'p', value_name = "JSON")]
    pub(super) potential: PathBuf,

    /// Directory holding the potential's parameter files
    #[arg(long, value_name = "DIR")]
    pub(super) pot_dir: Option<PathBuf>,

    /// Record name (defaults to the document id)
    #[arg(long)]
    pub(super) name: Option<String>,
}

#[derive(clap::Args)]
pub(super) struct PairArgs {
    /// Atom-model symbol of each atom type, in type order
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub(super) symbols: Option<Vec<String>>,

    /// Mass of each atom type; `_` keeps the potential's default
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub(super) masses: Option<Vec<String>>,

    /// JSON object mapping element names to standard atomic masses
    #[arg(long, value_name = "JSON")]
    pub(super) mass_table: Option<PathBuf>,

    /// Ask on the terminal for masses that are not otherwise known
    #[arg(long)]
    pub(super) prompt: bool,

    /// Omit the print commands echoing comments and references
    #[arg(long)]
    pub(super) no_comments: bool,

    /// Write the script to a file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub(super) output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct PairInfoArgs {
    #[command(flatten)]
    potential: PotentialArgs,

    #[command(flatten)]
    pair: PairArgs,
}

#[derive(clap::Args)]
pub(super) struct DataScriptArgs {
    #[command(flatten)]
    potential: PotentialArgs,

    #[command(flatten)]
    pair: PairArgs,

    /// LAMMPS data file to read
    #[arg(long, value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Boundary along x, y and z: `p` periodic, `m` shrink-wrapped
    #[arg(long, default_value = "ppp", value_parser = parse_boundary)]
    boundary: [bool; 3],

    /// Units overriding the potential's units
    #[arg(long)]
    units: Option<String>,

    /// Atom style overriding the potential's atom style
    #[arg(long)]
    atom_style: Option<String>,
}

#[derive(clap::Args)]
pub(super) struct RestartScriptArgs {
    #[command(flatten)]
    potential: PotentialArgs,

    #[command(flatten)]
    pair: PairArgs,

    /// LAMMPS restart file to read
    #[arg(long, value_name = "FILE")]
    restart_file: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct MetadataArgs {
    #[command(flatten)]
    potential: PotentialArgs,

    /// Print the regenerated document instead of the flat metadata
    #[arg(long)]
    model: bool,

    /// Write the JSON to a file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum QueryBackendKind {
    /// Mongo filter over stored records
    Mongo,
    /// CDCS filter over record content
    Cdcs,
    /// Match local potential files and print the names that pass
    Table,
}

#[derive(clap::Args)]
pub(super) struct QueryArgs {
    /// Query flavour to build
    #[arg(long, value_enum, default_value_t = QueryBackendKind::Mongo)]
    backend: QueryBackendKind,

    /// Potential documents to filter with the table backend
    #[arg(long, value_name = "JSON", num_args = 1.., required_if_eq("backend", "table"))]
    potentials: Vec<PathBuf>,

    #[arg(long, value_delimiter = ',')]
    name: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    key: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    id: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    potid: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    potkey: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    units: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    atom_style: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pair_style: Vec<String>,

    /// Record status; `active` also matches records without one
    #[arg(long, value_delimiter = ',')]
    status: Vec<String>,

    /// Elements that must all be present
    #[arg(long, value_delimiter = ',')]
    elements: Vec<String>,

    /// Symbols that must all be present
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,
}

impl QueryArgs {
    fn filters(&self) -> QueryFilters {
        let fields: [(&str, &Vec<String>); 11] = [
            ("name", &self.name),
            ("key", &self.key),
            ("id", &self.id),
            ("potid", &self.potid),
            ("potkey", &self.potkey),
            ("units", &self.units),
            ("atom_style", &self.atom_style),
            ("pair_style", &self.pair_style),
            ("status", &self.status),
            ("elements", &self.elements),
            ("symbols", &self.symbols),
        ];

        let mut filters = QueryFilters::new();
        for (name, values) in fields {
            if !values.is_empty() {
                filters.set(name, values.iter().cloned());
            }
        }
        filters
    }
}

fn parse_boundary(value: &str) -> Result<[bool; 3], String> {
    let flags: Vec<char> = value.chars().filter(|ch| !ch.is_whitespace()).collect();
    let [x, y, z] = flags.as_slice() else {
        return Err(format!("expected three boundary flags, got '{value}'"));
    };

    let mut pbc = [true; 3];
    for (slot, flag) in pbc.iter_mut().zip([x, y, z]) {
        *slot = match *flag {
            'p' => true,
            'm' => false,
            other => return Err(format!("unknown boundary flag '{other}'; use 'p' or 'm'")),
        };
    }
    Ok(pbc)
}

fn to_json_text(value: &Value) -> Result<String, CliError> {
    let mut text = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    text.push('\n');
    Ok(text)
}

pub(super) fn run_pair_info_command(args: PairInfoArgs) -> Result<i32, CliError> {
    let potential = load_potential(&args.potential)?;
    let options = pair_options(&args.pair)?;
    let lookup = mass_lookup(args.pair.mass_table.as_deref())?;

    let info = potential.pair_info(&options, &lookup)?;
    emit(args.pair.output.as_deref(), &info)?;
    Ok(0)
}

pub(super) fn run_data_script_command(args: DataScriptArgs) -> Result<i32, CliError> {
    let potential = load_potential(&args.potential)?;
    let options = DataScriptOptions {
        filename: args.data_file,
        pbc: args.boundary,
        units: args.units,
        atom_style: args.atom_style,
        pair: pair_options(&args.pair)?,
    };
    let lookup = mass_lookup(args.pair.mass_table.as_deref())?;

    let script = potential.pair_data_info(&options, &lookup)?;
    emit(args.pair.output.as_deref(), &script)?;
    Ok(0)
}

pub(super) fn run_restart_script_command(args: RestartScriptArgs) -> Result<i32, CliError> {
    let potential = load_potential(&args.potential)?;
    let options = pair_options(&args.pair)?;
    let lookup = mass_lookup(args.pair.mass_table.as_deref())?;

    let script = potential.pair_restart_info(&args.restart_file, &options, &lookup)?;
    emit(args.pair.output.as_deref(), &script)?;
    Ok(0)
}

pub(super) fn run_metadata_command(args: MetadataArgs) -> Result<i32, CliError> {
    let potential = load_potential(&args.potential)?;
    let value = if args.model {
        potential.build_model()?
    } else {
        Value::Object(potential.metadata()?)
    };

    emit(args.output.as_deref(), &to_json_text(&value)?)?;
    Ok(0)
}

pub(super) fn run_query_command(args: QueryArgs) -> Result<i32, CliError> {
    let filters = args.filters();
    debug!(backend = ?args.backend, fields = filters.names().count(), "building query");

    match args.backend {
        QueryBackendKind::Mongo => {
            let query = PotentialLammps::query(DocumentQuery::mongo(), &filters);
            print!("{}", to_json_text(&query)?);
        }
        QueryBackendKind::Cdcs => {
            let query = PotentialLammps::query(DocumentQuery::cdcs(), &filters);
            print!("{}", to_json_text(&query)?);
        }
        QueryBackendKind::Table => {
            let mut names = Vec::with_capacity(args.potentials.len());
            let mut rows = Vec::with_capacity(args.potentials.len());
            for path in &args.potentials {
                let potential = PotentialLammps::from_path(path, None, None)?;
                names.push(
                    potential
                        .name()
                        .map(str::to_string)
                        .unwrap_or_else(|| path.display().to_string()),
                );
                rows.push(potential.metadata()?);
            }

            let matches = PotentialLammps::query(TableFilter::new(&rows), &filters);
            for (name, matched) in names.iter().zip(matches) {
                if matched {
                    println!("{name}");
                }
            }
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::parse_boundary;

    #[test]
    fn boundary_flags_map_to_periodicity() {
        assert_eq!(parse_boundary("ppm"), Ok([true, true, false]));
        assert_eq!(parse_boundary("m p m"), Ok([false, true, false]));
        assert!(parse_boundary("pp").is_err());
        assert!(parse_boundary("pps").is_err());
    }
}
