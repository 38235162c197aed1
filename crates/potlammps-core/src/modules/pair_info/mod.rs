//! Generation of the LAMMPS `pair_style`, `pair_coeff` and `mass` commands
//! for a chosen list of atom types.

mod symbols;
mod terms;

pub use symbols::normalize_symbols;
pub use terms::render_terms;

use super::potential::PotentialLammps;
use super::serialization::format_float;
use crate::common::AtomicMassLookup;
use crate::domain::{CoeffBlock, PotentialError, PotentialResult};
use std::fmt::Write as _;
use tracing::debug;

/// Pair style whose coefficient blocks may only set diagonal interactions.
const EAM_PAIR_STYLE: &str = "eam";

#[derive(Debug, Clone, PartialEq)]
pub struct PairInfoOptions {
    /// Atom-model symbol of each atom type, in type order. `None` uses every
    /// stored symbol in stored order.
    pub symbols: Option<Vec<String>>,
    /// Per-type mass overrides; `None` entries keep the default.
    pub masses: Option<Vec<Option<f64>>>,
    /// Allow the mass lookup to ask the user.
    pub prompt: bool,
    /// Emit `print` commands describing the potential.
    pub comments: bool,
}

impl Default for PairInfoOptions {
    fn default() -> Self {
        Self {
            symbols: None,
            masses: None,
            prompt: false,
            comments: true,
        }
    }
}

impl PairInfoOptions {
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_masses(mut self, masses: Vec<Option<f64>>) -> Self {
        self.masses = Some(masses);
        self
    }

    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn without_comments(mut self) -> Self {
        self.comments = false;
        self
    }
}

impl PotentialLammps {
    /// Builds the LAMMPS commands that define this potential for a system
    /// whose atom types carry the requested symbols.
    pub fn pair_info<L>(&self, options: &PairInfoOptions, lookup: &L) -> PotentialResult<String>
    where
        L: AtomicMassLookup + ?Sized,
    {
        let content = self.content()?;
        let symbols = self.resolve_symbols(options.symbols.as_deref())?;
        let masses = self.resolve_masses(&symbols, options, lookup)?;
        debug!(
            types = symbols.len(),
            pair_style = %content.pair_style,
            "generating pair info"
        );

        let mut info = String::new();
        if options.comments {
            info.push_str(&self.print_comments()?);
        }

        let style_terms = render_terms(
            &content.pair_style_terms,
            &symbols,
            &symbols,
            self.pot_dir(),
        );
        let _ = writeln!(info, "pair_style {}{}", content.pair_style, style_terms);

        for block in &content.pair_coeff_blocks {
            self.write_coeff_block(&mut info, block, &symbols)?;
        }

        for (index, mass) in masses.iter().enumerate() {
            let _ = writeln!(info, "mass {} {}", index + 1, format_float(*mass));
        }
        info.push('\n');

        for command in &content.commands {
            let line = render_terms(&command.terms, &symbols, &content.symbols, self.pot_dir());
            info.push_str(line.trim());
            info.push('\n');
        }

        Ok(info)
    }

    fn resolve_masses<L>(
        &self,
        symbols: &[String],
        options: &PairInfoOptions,
        lookup: &L,
    ) -> PotentialResult<Vec<f64>>
    where
        L: AtomicMassLookup + ?Sized,
    {
        let overrides = match &options.masses {
            Some(masses) if masses.len() != symbols.len() => {
                return Err(PotentialError::LengthMismatch {
                    expected: symbols.len(),
                    actual: masses.len(),
                });
            }
            Some(masses) => masses.clone(),
            None => vec![None; symbols.len()],
        };

        symbols
            .iter()
            .zip(overrides)
            .map(|(symbol, mass)| match mass {
                Some(mass) => Ok(mass),
                None => self.symbol_mass(symbol, options.prompt, lookup),
            })
            .collect()
    }

    fn write_coeff_block(
        &self,
        info: &mut String,
        block: &CoeffBlock,
        symbols: &[String],
    ) -> PotentialResult<()> {
        let pot_dir = self.pot_dir();

        if block.is_wildcard() {
            let terms = render_terms(&block.terms, symbols, symbols, pot_dir);
            let _ = writeln!(info, "pair_coeff * *{terms}");
            return Ok(());
        }

        let interaction = &block.interaction;
        if block.is_many_body {
            let terms = render_terms(&block.terms, symbols, interaction, pot_dir);
            let _ = writeln!(info, "pair_coeff * *{terms}\n");
            return Ok(());
        }

        if interaction.len() != 2 {
            return Err(PotentialError::invalid_interaction(
                interaction,
                "pair potential interactions need two listed symbols",
            ));
        }

        let terms = render_terms(&block.terms, symbols, interaction, pot_dir);
        if self.pair_style()? == EAM_PAIR_STYLE {
            if interaction[0] != interaction[1] {
                return Err(PotentialError::invalid_interaction(
                    interaction,
                    "only i==j interactions allowed for eam style",
                ));
            }
            for (i, symbol) in symbols.iter().enumerate() {
                if *symbol == interaction[0] {
                    let _ = writeln!(info, "pair_coeff {} {}{terms}", i + 1, i + 1);
                }
            }
            return Ok(());
        }

        for i in 0..symbols.len() {
            for j in i..symbols.len() {
                let forward = symbols[i] == interaction[0] && symbols[j] == interaction[1];
                let reverse = symbols[i] == interaction[1] && symbols[j] == interaction[0];
                if forward || reverse {
                    let _ = writeln!(info, "pair_coeff {} {}{terms}", i + 1, j + 1);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PairInfoOptions;
    use crate::common::MassTable;
    use crate::domain::PotentialError;
    use crate::modules::potential::PotentialLammps;
    use serde_json::{Value, json};
    use std::path::Path;

    fn potential(root: Value) -> PotentialLammps {
        PotentialLammps::from_model(json!({ "potential-LAMMPS": root }), None, None)
            .expect("potential should load")
    }

    fn base(pair_style: &str, atoms: Value, pair_coeff: Value) -> Value {
        json!({
            "potential": {"id": "test"},
            "units": "metal",
            "atom_style": "atomic",
            "atom": atoms,
            "pair_style": {"type": pair_style},
            "pair_coeff": pair_coeff
        })
    }

    fn quiet() -> PairInfoOptions {
        PairInfoOptions::default().without_comments()
    }

    #[test]
    fn eam_emits_diagonal_lines_per_matching_type() {
        let pot = potential(base(
            "eam",
            json!([{"element": "Cu", "mass": 63.546}, {"element": "Ni", "mass": 58.6934}]),
            json!([
                {"interaction": {"symbol": ["Cu", "Cu"]}, "term": {"file": "Cu_u3.eam"}},
                {"interaction": {"symbol": ["Ni", "Ni"]}, "term": {"file": "Ni_u3.eam"}}
            ]),
        ));

        let info = pot
            .pair_info(&quiet(), &MassTable::new())
            .expect("pair info should render");
        assert_eq!(
            info,
            concat!(
                "pair_style eam\n",
                "pair_coeff 1 1 Cu_u3.eam\n",
                "pair_coeff 2 2 Ni_u3.eam\n",
                "mass 1 63.546\n",
                "mass 2 58.6934\n",
                "\n",
            )
        );
    }

    #[test]
    fn eam_off_diagonal_blocks_are_rejected() {
        let pot = potential(base(
            "eam",
            json!([{"element": "Cu", "mass": 63.546}, {"element": "Ni", "mass": 58.6934}]),
            json!({"interaction": {"symbol": ["Cu", "Ni"]}, "term": {"file": "CuNi.eam"}}),
        ));

        let error = pot
            .pair_info(&quiet(), &MassTable::new())
            .expect_err("off-diagonal eam should fail");
        assert!(matches!(error, PotentialError::InvalidInteraction { .. }));
    }

    #[test]
    fn pairwise_blocks_emit_ascending_index_pairs() {
        let pot = potential(base(
            "lj/cut 10.0",
            json!([
                {"symbol": "A", "mass": 1.0},
                {"symbol": "B", "mass": 2.0},
                {"symbol": "C", "mass": 3.0}
            ]),
            json!({"interaction": {"symbol": ["C", "A"]}, "term": [{"parameter": 0.5}, {"parameter": 1.2}]}),
        ));

        let info = pot
            .pair_info(&quiet(), &MassTable::new())
            .expect("pair info should render");
        let coeff_lines: Vec<_> = info.lines().filter(|line| line.starts_with("pair_coeff")).collect();
        assert_eq!(coeff_lines, vec!["pair_coeff 1 3 0.5 1.2"]);
    }

    #[test]
    fn repeated_types_produce_every_matching_pair() {
        let pot = potential(base(
            "lj/cut 10.0",
            json!([{"symbol": "A", "mass": 1.0}, {"symbol": "B", "mass": 2.0}]),
            json!([
                {"interaction": {"symbol": ["A", "A"]}, "term": {"parameter": "0.1 1.0"}},
                {"interaction": {"symbol": ["A", "B"]}, "term": {"parameter": "0.2 1.5"}}
            ]),
        ));

        let options = quiet().with_symbols(["A", "B", "A"]);
        let info = pot
            .pair_info(&options, &MassTable::new())
            .expect("pair info should render");
        let coeff_lines: Vec<_> = info.lines().filter(|line| line.starts_with("pair_coeff")).collect();
        assert_eq!(
            coeff_lines,
            vec![
                "pair_coeff 1 1 0.1 1.0",
                "pair_coeff 1 3 0.1 1.0",
                "pair_coeff 3 3 0.1 1.0",
                "pair_coeff 1 2 0.2 1.5",
                "pair_coeff 2 3 0.2 1.5",
            ]
        );
    }

    #[test]
    fn pairwise_blocks_need_exactly_two_symbols() {
        let pot = potential(base(
            "lj/cut 10.0",
            json!([{"symbol": "A", "mass": 1.0}, {"symbol": "B", "mass": 2.0}]),
            json!({"interaction": {"symbol": ["A", "B", "A"]}, "term": {"parameter": "0.2 1.5"}}),
        ));

        let error = pot
            .pair_info(&quiet(), &MassTable::new())
            .expect_err("three symbols without a symbols term should fail");
        assert!(matches!(error, PotentialError::InvalidInteraction { ref symbols, .. } if symbols.len() == 3));
    }

    #[test]
    fn many_body_blocks_pad_every_type() {
        let pot = potential(base(
            "tersoff",
            json!([
                {"element": "Si", "mass": 28.0855},
                {"element": "C", "mass": 12.011},
                {"element": "Ge", "mass": 72.63}
            ]),
            json!({
                "interaction": {"symbol": ["Si", "C"]},
                "term": [{"file": "SiC.tersoff"}, {"symbols": "True"}]
            }),
        ));

        let options = quiet().with_symbols(["Ge", "Si", "C", "Si"]);
        let mut pot = pot;
        pot.set_pot_dir("/opt/potentials");
        let info = pot
            .pair_info(&options, &MassTable::new())
            .expect("pair info should render");

        assert!(info.contains("pair_coeff * * /opt/potentials/SiC.tersoff NULL Si C Si\n\n"));
        assert!(info.contains("mass 4 28.0855\n"));
    }

    #[test]
    fn wildcard_blocks_always_render_once() {
        let pot = potential(base(
            "eam/alloy",
            json!([{"element": "Ni", "mass": 58.6934}, {"element": "Al", "mass": 26.98}]),
            json!({"term": [{"file": "NiAl.eam.alloy"}, {"symbols": "True"}]}),
        ));

        for symbols in [vec!["Al"], vec!["Ni", "Al", "Ni"]] {
            let options = quiet().with_symbols(symbols);
            let info = pot
                .pair_info(&options, &MassTable::new())
                .expect("pair info should render");
            assert_eq!(info.matches("pair_coeff * *").count(), 1);
        }

        let info = pot
            .pair_info(&quiet().with_symbols(["Al", "Ni"]), &MassTable::new())
            .expect("pair info should render");
        assert!(info.contains("pair_coeff * * NiAl.eam.alloy Al Ni\n"));
    }

    #[test]
    fn default_symbols_match_explicit_stored_order() {
        let pot = potential(base(
            "eam/alloy",
            json!([{"element": "Ni", "mass": 58.6934}, {"element": "Al", "mass": 26.98}]),
            json!({"term": [{"file": "NiAl.eam.alloy"}, {"symbols": "True"}]}),
        ));

        let implicit = pot
            .pair_info(&PairInfoOptions::default(), &MassTable::new())
            .expect("implicit symbols render");
        let explicit = pot
            .pair_info(&PairInfoOptions::default().with_symbols(["Ni", "Al"]), &MassTable::new())
            .expect("explicit symbols render");
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn mass_overrides_must_match_symbol_count() {
        let pot = potential(base(
            "eam/alloy",
            json!([{"element": "Ni"}, {"element": "Al"}]),
            json!({"term": [{"file": "NiAl.eam.alloy"}, {"symbols": "True"}]}),
        ));

        let error = pot
            .pair_info(&quiet().with_masses(vec![Some(1.0)]), &MassTable::new())
            .expect_err("one mass for two types");
        assert!(matches!(
            error,
            PotentialError::LengthMismatch { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn mass_overrides_fill_gaps_from_lookup() {
        let pot = potential(base(
            "eam/alloy",
            json!([{"element": "Ni"}, {"element": "Al"}]),
            json!({"term": [{"file": "NiAl.eam.alloy"}, {"symbols": "True"}]}),
        ));
        let table = MassTable::new().with_mass("Al", 26.9815385);

        let info = pot
            .pair_info(&quiet().with_masses(vec![Some(58.0), None]), &table)
            .expect("masses resolve");
        assert!(info.contains("mass 1 58.0\nmass 2 26.9815385\n\n"));
    }

    #[test]
    fn commands_render_against_stored_symbols_and_are_trimmed() {
        let mut root = base(
            "hybrid/overlay",
            json!([{"element": "Ni", "mass": 58.6934}, {"element": "Al", "mass": 26.98}]),
            json!({"term": {"parameter": "x"}}),
        );
        root["command"] = json!([
            {"term": [{"option": "neighbor"}, {"parameter": "2.0 bin"}]},
            {"term": [{"option": "fix qeq all qeq/point 1 10 1e-6 100"}, {"file": "param.qeq"}, {"symbolsList": true}]}
        ]);
        let pot = potential(root);

        let info = pot
            .pair_info(&quiet().with_symbols(["Al"]), &MassTable::new())
            .expect("pair info should render");
        assert!(info.ends_with(
            "mass 1 26.98\n\nneighbor 2.0 bin\nfix qeq all qeq/point 1 10 1e-6 100 param.qeq Al\n"
        ));
    }

    #[test]
    fn comments_precede_pair_style() {
        let mut root = base(
            "eam/alloy",
            json!([{"element": "Ni", "mass": 58.6934}]),
            json!({"term": [{"file": "Ni.eam.alloy"}, {"symbols": "True"}]}),
        );
        root["comments"] = json!("Ni EAM\n");
        let pot = potential(root);

        let info = pot
            .pair_info(&PairInfoOptions::default(), &MassTable::new())
            .expect("pair info should render");
        assert!(info.starts_with("print \"Ni EAM\"\npair_style eam/alloy\n"));
        assert_eq!(pot.pot_dir(), Path::new(""));
    }
}
