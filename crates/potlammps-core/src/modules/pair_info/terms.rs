use crate::domain::Term;
use std::path::Path;

/// Renders a term list as a space-prefixed fragment.
///
/// `system_symbols` are the atom types of the simulated system in type order;
/// `coeff_symbols` are the symbols a coefficient block applies to.
pub fn render_terms(
    terms: &[Term],
    system_symbols: &[String],
    coeff_symbols: &[String],
    pot_dir: &Path,
) -> String {
    let mut line = String::new();

    for term in terms {
        match term {
            Term::Option(value) | Term::Parameter(value) => {
                line.push(' ');
                line.push_str(value);
            }
            Term::File(value) => {
                line.push(' ');
                line.push_str(&pot_dir.join(value).display().to_string());
            }
            Term::SymbolsList(true) => {
                for symbol in coeff_symbols {
                    if system_symbols.contains(symbol) {
                        line.push(' ');
                        line.push_str(symbol);
                    }
                }
            }
            // every system type gets a slot; types outside the block are NULL
            Term::Symbols(true) => {
                for symbol in system_symbols {
                    line.push(' ');
                    if coeff_symbols.contains(symbol) {
                        line.push_str(symbol);
                    } else {
                        line.push_str("NULL");
                    }
                }
            }
            Term::SymbolsList(false) | Term::Symbols(false) => {}
        }
    }

    line
}
