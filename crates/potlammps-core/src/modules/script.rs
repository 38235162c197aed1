//! Script headers that wrap the pair info for data-file and restart-file runs.

use super::pair_info::PairInfoOptions;
use super::potential::PotentialLammps;
use crate::common::AtomicMassLookup;
use crate::domain::PotentialResult;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const SCRIPT_BANNER: &str = "# Script prepared using potlammps";

#[derive(Debug, Clone, PartialEq)]
pub struct DataScriptOptions {
    /// Data file to read; the `read_data` line is omitted when absent.
    pub filename: Option<PathBuf>,
    /// Periodicity along x, y and z.
    pub pbc: [bool; 3],
    pub units: Option<String>,
    pub atom_style: Option<String>,
    pub pair: PairInfoOptions,
}

impl Default for DataScriptOptions {
    fn default() -> Self {
        Self {
            filename: None,
            pbc: [true; 3],
            units: None,
            atom_style: None,
            pair: PairInfoOptions::default(),
        }
    }
}

fn boundary_flag(periodic: bool) -> char {
    if periodic { 'p' } else { 'm' }
}

impl PotentialLammps {
    /// Script that sets up a system from a LAMMPS data file and then defines
    /// the potential.
    pub fn pair_data_info<L>(&self, options: &DataScriptOptions, lookup: &L) -> PotentialResult<String>
    where
        L: AtomicMassLookup + ?Sized,
    {
        let units = match &options.units {
            Some(units) => units.as_str(),
            None => self.units()?,
        };
        let atom_style = match &options.atom_style {
            Some(atom_style) => atom_style.as_str(),
            None => self.atom_style()?,
        };
        let [x, y, z] = options.pbc.map(boundary_flag);

        let mut script = String::new();
        let _ = writeln!(script, "units {units}");
        let _ = writeln!(script, "atom_style {atom_style}");
        script.push('\n');
        let _ = writeln!(script, "boundary {x} {y} {z}");
        if let Some(filename) = &options.filename {
            let _ = writeln!(script, "read_data {}", filename.display());
        }
        script.push('\n');

        script.push_str(&self.pair_info(&options.pair, lookup)?);
        Ok(script)
    }

    /// Script that resumes from a LAMMPS restart file and then redefines the
    /// potential.
    pub fn pair_restart_info<L>(
        &self,
        filename: &Path,
        options: &PairInfoOptions,
        lookup: &L,
    ) -> PotentialResult<String>
    where
        L: AtomicMassLookup + ?Sized,
    {
        let pair_info = self.pair_info(options, lookup)?;
        Ok(format!(
            "{SCRIPT_BANNER}\n\nread_restart {}\n\n{pair_info}",
            filename.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::DataScriptOptions;
    use crate::common::MassTable;
    use crate::domain::PotentialError;
    use crate::modules::pair_info::PairInfoOptions;
    use crate::modules::potential::PotentialLammps;
    use serde_json::json;
    use std::path::{Path, PathBuf};

    fn potential() -> PotentialLammps {
        PotentialLammps::from_model(
            json!({"potential-LAMMPS": {
                "potential": {"id": "2009--Mendelev-M-I--Al"},
                "units": "metal",
                "atom_style": "atomic",
                "atom": {"element": "Al", "mass": 26.982},
                "pair_style": {"type": "eam/fs"},
                "pair_coeff": {"term": [{"file": "Al.eam.fs"}, {"symbols": true}]}
            }}),
            None,
            None,
        )
        .expect("potential should load")
    }

    #[test]
    fn data_script_uses_document_defaults() {
        let options = DataScriptOptions {
            filename: Some(PathBuf::from("init.dat")),
            pbc: [true, true, false],
            pair: PairInfoOptions::default().without_comments(),
            ..DataScriptOptions::default()
        };

        let script = potential()
            .pair_data_info(&options, &MassTable::new())
            .expect("script should render");
        assert_eq!(
            script,
            concat!(
                "units metal\n",
                "atom_style atomic\n",
                "\n",
                "boundary p p m\n",
                "read_data init.dat\n",
                "\n",
                "pair_style eam/fs\n",
                "pair_coeff * * Al.eam.fs Al\n",
                "mass 1 26.982\n",
                "\n",
            )
        );
    }

    #[test]
    fn data_script_overrides_units_and_skips_read_data() {
        let options = DataScriptOptions {
            units: Some("real".to_string()),
            atom_style: Some("charge".to_string()),
            pair: PairInfoOptions::default().without_comments(),
            ..DataScriptOptions::default()
        };

        let script = potential()
            .pair_data_info(&options, &MassTable::new())
            .expect("script should render");
        assert!(script.starts_with("units real\natom_style charge\n\nboundary p p p\n\npair_style"));
        assert!(!script.contains("read_data"));
    }

    #[test]
    fn restart_script_prefixes_banner() {
        let script = potential()
            .pair_restart_info(
                Path::new("run.restart"),
                &PairInfoOptions::default().without_comments(),
                &MassTable::new(),
            )
            .expect("script should render");
        assert!(script.starts_with(
            "# Script prepared using potlammps\n\nread_restart run.restart\n\npair_style eam/fs\n"
        ));
    }

    #[test]
    fn pair_info_errors_abort_the_script() {
        let options = DataScriptOptions {
            pair: PairInfoOptions::default().with_symbols(["Cu"]),
            ..DataScriptOptions::default()
        };
        let error = potential()
            .pair_data_info(&options, &MassTable::new())
            .expect_err("Cu is not a listed symbol");
        assert!(matches!(error, PotentialError::UnknownSymbol { .. }));
    }
}
