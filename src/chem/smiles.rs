//! SMILES parsing.
//!
//! Covers the OpenSMILES constructs found in drug-like input: the organic
//! subset, bracket atoms (isotope, chirality, hydrogen count, charge, atom
//! class), explicit bonds, branches, ring closures including `%nn`, and
//! dot-disconnected fragments. Stereo markers are accepted and dropped.

use std::collections::BTreeMap;

use super::element::{self, Element, WILDCARD};
use super::molecule::{Atom, Bond, BondOrder, Molecule};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SmilesError {
    #[error("empty SMILES")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("unknown element '{symbol}' at position {pos}")]
    UnknownElement { pos: usize, symbol: String },

    #[error("bracket atom opened at position {pos} is never closed")]
    UnclosedBracket { pos: usize },

    #[error("unbalanced parenthesis at position {pos}")]
    UnbalancedParenthesis { pos: usize },

    #[error("bond at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize },

    #[error("ring closure {label} is never closed")]
    UnclosedRing { label: u16 },

    #[error("invalid ring closure {label} at position {pos}")]
    InvalidRingClosure { pos: usize, label: u16 },

    #[error("ring closure {label} has conflicting bond orders")]
    RingBondConflict { label: u16 },

    #[error("atom {atom} ({symbol}) is marked aromatic outside a ring")]
    NonRingAromatic { atom: usize, symbol: String },

    #[error("atom {atom} ({symbol}) has explicit valence {valence}, more than allowed")]
    ValenceExceeded { atom: usize, symbol: String, valence: u32 },

    #[error("aromatic system cannot be kekulized at atom {atom} ({symbol})")]
    NotKekulizable { atom: usize, symbol: String },
}

/// Parse a SMILES string into a [`Molecule`].
///
/// Leading/trailing whitespace is ignored and anything after the first
/// internal whitespace is treated as a title, as in `.smi` files.
pub fn parse(smiles: &str) -> Result<Molecule, SmilesError> {
    let text = smiles.split_whitespace().next().unwrap_or("");
    if text.is_empty() {
        return Err(SmilesError::Empty);
    }
    let mut parser = Parser::new(text);
    parser.run()?;
    Molecule::from_parts(parser.atoms, parser.bonds)
}

struct RingOpen {
    atom: usize,
    order: Option<BondOrder>,
}

struct Branch {
    anchor: usize,
    atoms_at_open: usize,
    pos: usize,
}

struct Parser<'a> {
    text: &'a str,
    src: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    prev: Option<usize>,
    pending: Option<(BondOrder, usize)>,
    branches: Vec<Branch>,
    rings: BTreeMap<u16, RingOpen>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser {
            text,
            src: text.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            prev: None,
            pending: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
        }
    }

    fn run(&mut self) -> Result<(), SmilesError> {
        while let Some(&c) = self.src.get(self.pos) {
            match c {
                b'(' => self.open_branch()?,
                b')' => self.close_branch()?,
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => self.bond_symbol(c)?,
                b'.' => self.dot()?,
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.add_atom(atom);
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.add_atom(atom);
                }
            }
        }

        if let Some((_, pos)) = self.pending {
            return Err(SmilesError::DanglingBond { pos });
        }
        if let Some(branch) = self.branches.last() {
            return Err(SmilesError::UnbalancedParenthesis { pos: branch.pos });
        }
        if let Some(&label) = self.rings.keys().next() {
            return Err(SmilesError::UnclosedRing { label });
        }
        if self.atoms.is_empty() {
            return Err(SmilesError::Empty);
        }
        Ok(())
    }

    fn unexpected(&self) -> SmilesError {
        match self.text[self.pos..].chars().next() {
            Some(ch) => SmilesError::UnexpectedChar { pos: self.pos, ch },
            None => SmilesError::UnexpectedChar {
                pos: self.pos,
                ch: '\0',
            },
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn add_atom(&mut self, atom: Atom) {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        if let Some(prev) = self.prev {
            let order = match self.pending.take() {
                Some((order, _)) => order,
                None => self.default_order(prev, idx),
            };
            self.bonds.push(Bond { a: prev, b: idx, order });
        }
        self.prev = Some(idx);
    }

    fn open_branch(&mut self) -> Result<(), SmilesError> {
        let Some(anchor) = self.prev else {
            return Err(self.unexpected());
        };
        if self.pending.is_some() {
            return Err(self.unexpected());
        }
        self.branches.push(Branch {
            anchor,
            atoms_at_open: self.atoms.len(),
            pos: self.pos,
        });
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self) -> Result<(), SmilesError> {
        let Some(branch) = self.branches.pop() else {
            return Err(SmilesError::UnbalancedParenthesis { pos: self.pos });
        };
        if let Some((_, pos)) = self.pending {
            return Err(SmilesError::DanglingBond { pos });
        }
        if self.atoms.len() == branch.atoms_at_open {
            return Err(self.unexpected());
        }
        self.prev = Some(branch.anchor);
        self.pos += 1;
        Ok(())
    }

    fn bond_symbol(&mut self, c: u8) -> Result<(), SmilesError> {
        if self.prev.is_none() || self.pending.is_some() {
            return Err(self.unexpected());
        }
        let order = match c {
            b'=' => BondOrder::Double,
            b'#' => BondOrder::Triple,
            b'$' => BondOrder::Quadruple,
            b':' => BondOrder::Aromatic,
            // '-', '/' and '\' are all single bonds; direction is stereo only.
            _ => BondOrder::Single,
        };
        self.pending = Some((order, self.pos));
        self.pos += 1;
        Ok(())
    }

    fn dot(&mut self) -> Result<(), SmilesError> {
        if let Some((_, pos)) = self.pending {
            return Err(SmilesError::DanglingBond { pos });
        }
        if self.prev.is_none() {
            return Err(self.unexpected());
        }
        self.prev = None;
        self.pos += 1;
        Ok(())
    }

    fn ring_closure(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let Some(current) = self.prev else {
            return Err(self.unexpected());
        };

        let src = self.src;
        let label = if self.peek() == Some(b'%') {
            self.pos += 1;
            let digits = src.get(self.pos..self.pos + 2).unwrap_or(&[]);
            if digits.len() != 2 || !digits.iter().all(u8::is_ascii_digit) {
                return Err(self.unexpected());
            }
            self.pos += 2;
            u16::from(digits[0] - b'0') * 10 + u16::from(digits[1] - b'0')
        } else {
            let d = src[self.pos] - b'0';
            self.pos += 1;
            u16::from(d)
        };

        let pending = self.pending.take().map(|(order, _)| order);
        match self.rings.remove(&label) {
            Some(open) => {
                let duplicate = self
                    .bonds
                    .iter()
                    .any(|b| (b.a == open.atom && b.b == current) || (b.a == current && b.b == open.atom));
                if open.atom == current || duplicate {
                    return Err(SmilesError::InvalidRingClosure { pos: start, label });
                }
                let order = match (open.order, pending) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(SmilesError::RingBondConflict { label })
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.default_order(open.atom, current),
                };
                self.bonds.push(Bond {
                    a: open.atom,
                    b: current,
                    order,
                });
            }
            None => {
                self.rings.insert(
                    label,
                    RingOpen {
                        atom: current,
                        order: pending,
                    },
                );
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<Atom, SmilesError> {
        let c = self.src[self.pos];
        let next = self.src.get(self.pos + 1).copied();
        let (symbol, width, aromatic) = match (c, next) {
            (b'B', Some(b'r')) => ("Br", 2, false),
            (b'C', Some(b'l')) => ("Cl", 2, false),
            (b'B', _) => ("B", 1, false),
            (b'C', _) => ("C", 1, false),
            (b'N', _) => ("N", 1, false),
            (b'O', _) => ("O", 1, false),
            (b'P', _) => ("P", 1, false),
            (b'S', _) => ("S", 1, false),
            (b'F', _) => ("F", 1, false),
            (b'I', _) => ("I", 1, false),
            (b'b', _) => ("B", 1, true),
            (b'c', _) => ("C", 1, true),
            (b'n', _) => ("N", 1, true),
            (b'o', _) => ("O", 1, true),
            (b'p', _) => ("P", 1, true),
            (b's', _) => ("S", 1, true),
            (b'*', _) => ("*", 1, false),
            _ => return Err(self.unexpected()),
        };
        let element = if symbol == "*" {
            WILDCARD
        } else {
            self.lookup(symbol)?
        };
        self.pos += width;
        Ok(Atom {
            element,
            aromatic,
            charge: 0,
            isotope: None,
            hydrogens: 0,
            bracket: false,
        })
    }

    fn lookup(&self, symbol: &str) -> Result<Element, SmilesError> {
        element::by_symbol(symbol).ok_or_else(|| SmilesError::UnknownElement {
            pos: self.pos,
            symbol: symbol.to_string(),
        })
    }

    fn digits(&mut self, max: usize) -> Option<u32> {
        let start = self.pos;
        while self.pos - start < max && self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        self.text[start..self.pos].parse().ok()
    }

    fn bracket_atom(&mut self) -> Result<Atom, SmilesError> {
        let open = self.pos;
        self.pos += 1;

        let isotope = match self.digits(4) {
            Some(n) => Some(u16::try_from(n).map_err(|_| self.unexpected())?),
            None => None,
        };

        let (element, aromatic) = self.bracket_symbol(open)?;

        // Chirality: @, @@, @TH1, @SP2, @OH15 ...
        let src = self.src;
        if self.peek() == Some(b'@') {
            self.pos += 1;
            if self.peek() == Some(b'@') {
                self.pos += 1;
            } else if let Some(class) = src.get(self.pos..self.pos + 2) {
                if matches!(class, b"TH" | b"AL" | b"SP" | b"TB" | b"OH") {
                    self.pos += 2;
                    self.digits(2);
                }
            }
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            hydrogens = self.digits(1).map_or(1, |n| n as u8);
        }

        let mut charge = 0i8;
        if let Some(sign @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let magnitude = match self.digits(2) {
                Some(n) if n <= 15 => n as i8,
                Some(_) => return Err(self.unexpected()),
                None => {
                    let mut count = 1i8;
                    while self.peek() == Some(sign) && count < 15 {
                        self.pos += 1;
                        count += 1;
                    }
                    count
                }
            };
            charge = if sign == b'+' { magnitude } else { -magnitude };
        }

        if self.peek() == Some(b':') {
            self.pos += 1;
            if self.digits(6).is_none() {
                return Err(self.unexpected());
            }
        }

        match self.peek() {
            Some(b']') => self.pos += 1,
            None => return Err(SmilesError::UnclosedBracket { pos: open }),
            Some(_) => return Err(self.unexpected()),
        }

        Ok(Atom {
            element,
            aromatic,
            charge,
            isotope,
            hydrogens,
            bracket: true,
        })
    }

    fn bracket_symbol(&mut self, open: usize) -> Result<(Element, bool), SmilesError> {
        let Some(c) = self.peek() else {
            return Err(SmilesError::UnclosedBracket { pos: open });
        };
        let next = self.src.get(self.pos + 1).copied();

        if c == b'*' {
            self.pos += 1;
            return Ok((WILDCARD, false));
        }

        if c.is_ascii_uppercase() {
            // Nothing that may follow a symbol inside brackets is lowercase,
            // so an uppercase-lowercase pair is always a two-letter symbol.
            if let Some(l) = next.filter(u8::is_ascii_lowercase) {
                let two = format!("{}{}", c as char, l as char);
                let element = self.lookup(&two)?;
                self.pos += 2;
                return Ok((element, false));
            }
            let one = (c as char).to_string();
            let element = self.lookup(&one)?;
            self.pos += 1;
            return Ok((element, false));
        }

        if c.is_ascii_lowercase() {
            for two in ["se", "as"] {
                if self.src[self.pos..].starts_with(two.as_bytes()) {
                    let element = self.lookup(&capitalize(two))?;
                    self.pos += 2;
                    return Ok((element, true));
                }
            }
            if matches!(c, b'b' | b'c' | b'n' | b'o' | b'p' | b's') {
                let element = self.lookup(&capitalize(&(c as char).to_string()))?;
                self.pos += 1;
                return Ok((element, true));
            }
            return Err(SmilesError::UnknownElement {
                pos: self.pos,
                symbol: (c as char).to_string(),
            });
        }

        Err(self.unexpected())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_drugs() {
        let drugs = [
            "CC(=O)OC1=CC=CC=C1C(=O)O",           // aspirin
            "CC(=O)Nc1ccc(O)cc1",                 // paracetamol
            "CN1C=NC2=C1C(=O)N(C(=O)N2C)C",       // caffeine
            "CC(C)Cc1ccc(cc1)[C@@H](C)C(=O)O",    // ibuprofen
            "OC[C@H]1OC(O)[C@H](O)[C@@H](O)[C@@H]1O",
            "c1ccc2[nH]ccc2c1",                   // indole
            "C1CC1.[Na+].[O-]C(=O)C",
            "F/C=C/F",
            "C%10CCCCC%10",
            "[13CH4]",
            "c1ccsc1",
            "c1cc[se]c1",
        ];
        for smiles in drugs {
            assert!(parse(smiles).is_ok(), "{smiles} should parse");
        }
    }

    #[test]
    fn counts_atoms_and_bonds() {
        let mol = parse("CC(=O)O").unwrap();
        assert_eq!(mol.atoms().len(), 4);
        assert_eq!(mol.bonds().len(), 3);
        assert_eq!(mol.bonds()[1].order, BondOrder::Double);
    }

    #[test]
    fn bracket_atom_fields() {
        let mol = parse("[15NH4+]").unwrap();
        let atom = &mol.atoms()[0];
        assert_eq!(atom.element.symbol, "N");
        assert_eq!(atom.isotope, Some(15));
        assert_eq!(atom.hydrogens, 4);
        assert_eq!(atom.charge, 1);

        let mol = parse("[O--]").unwrap();
        assert_eq!(mol.atoms()[0].charge, -2);
        let mol = parse("[Fe+3]").unwrap();
        assert_eq!(mol.atoms()[0].charge, 3);
        let mol = parse("[CH3:1]C").unwrap();
        assert_eq!(mol.atoms()[0].hydrogens, 3);
    }

    #[test]
    fn bracket_symbols_across_the_table() {
        for (smiles, symbol) in [("[W]", "W"), ("[Ir]", "Ir"), ("[La+3]", "La"), ("[Hf]", "Hf"), ("[Rn]", "Rn")] {
            let mol = parse(smiles).unwrap();
            assert_eq!(mol.atoms()[0].element.symbol, symbol);
        }
        assert_eq!(
            parse("[Ix]").err(),
            Some(SmilesError::UnknownElement {
                pos: 1,
                symbol: "Ix".into()
            })
        );
        assert!(matches!(
            parse("C[Qq]C"),
            Err(SmilesError::UnknownElement { ref symbol, .. }) if symbol == "Qq"
        ));
    }

    #[test]
    fn trailing_title_is_ignored() {
        let mol = parse("  CCO ethanol").unwrap();
        assert_eq!(mol.atoms().len(), 3);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(parse(""), Err(SmilesError::Empty)));
        assert!(matches!(parse("   "), Err(SmilesError::Empty)));
        assert!(matches!(
            parse("BADSMILES###"),
            Err(SmilesError::UnexpectedChar { pos: 1, ch: 'A' })
        ));
        assert!(matches!(parse("C(C"), Err(SmilesError::UnbalancedParenthesis { .. })));
        assert!(matches!(parse("CC)"), Err(SmilesError::UnbalancedParenthesis { .. })));
        assert!(matches!(parse("C()C"), Err(SmilesError::UnexpectedChar { .. })));
        assert!(matches!(parse("CC="), Err(SmilesError::DanglingBond { .. })));
        assert!(matches!(parse("C1CC"), Err(SmilesError::UnclosedRing { label: 1 })));
        assert!(matches!(parse("C11"), Err(SmilesError::InvalidRingClosure { .. })));
        assert!(matches!(parse("C=1CC#1"), Err(SmilesError::RingBondConflict { .. })));
        assert!(matches!(parse("[C"), Err(SmilesError::UnclosedBracket { .. })));
        assert!(matches!(parse("[Xx]"), Err(SmilesError::UnknownElement { .. })));
        assert!(matches!(parse("1CC"), Err(SmilesError::UnexpectedChar { .. })));
        assert!(matches!(parse("=C"), Err(SmilesError::UnexpectedChar { .. })));
    }

    #[test]
    fn rejects_chemically_invalid_input() {
        assert!(matches!(parse("cc"), Err(SmilesError::NonRingAromatic { .. })));
        assert!(matches!(
            parse("C(C)(C)(C)(C)C"),
            Err(SmilesError::ValenceExceeded { atom: 1, .. })
        ));
        assert!(matches!(parse("O=O=O"), Err(SmilesError::ValenceExceeded { .. })));
    }
}
