use std::collections::VecDeque;

use super::element::{self, Element};
use super::smiles::SmilesError;

// ---------------------------------------------------------------------------
// Atom / Bond
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub aromatic: bool,
    pub charge: i8,
    pub isotope: Option<u16>,
    /// Attached hydrogens not present as graph atoms.
    /// Written count for bracket atoms, computed for the organic subset.
    pub hydrogens: u8,
    /// Bracket atoms never receive implicit hydrogens.
    pub bracket: bool,
}

impl Atom {
    pub fn is_hydrogen(&self) -> bool {
        self.element.atomic_number == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to the explicit valence; aromatic bonds count as one,
    /// the extra pi electron is added per atom.
    pub fn valence(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }

    pub fn code(self) -> u64 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
            BondOrder::Aromatic => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn other(&self, atom: usize) -> usize {
        if self.a == atom {
            self.b
        } else {
            self.a
        }
    }
}

// ---------------------------------------------------------------------------
// Molecule – the parsed graph with ring perception done
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// atom index → bond indices touching it.
    adjacency: Vec<Vec<usize>>,
    ring_bond: Vec<bool>,
    components: usize,
}

impl Molecule {
    /// Assemble a molecule from parser output: perceive rings, check
    /// aromaticity and valence, assign implicit hydrogens.
    pub(crate) fn from_parts(mut atoms: Vec<Atom>, mut bonds: Vec<Bond>) -> Result<Self, SmilesError> {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.a].push(idx);
            adjacency[bond.b].push(idx);
        }

        let (ring_bond, components) = perceive_rings(&adjacency, &bonds);

        for (idx, atom) in atoms.iter().enumerate() {
            if atom.aromatic && !adjacency[idx].iter().any(|&b| ring_bond[b]) {
                return Err(SmilesError::NonRingAromatic {
                    atom: idx + 1,
                    symbol: atom.element.symbol.to_string(),
                });
            }
        }
        // Biaryl links written without a bond symbol.
        for (idx, bond) in bonds.iter_mut().enumerate() {
            if bond.order == BondOrder::Aromatic && !ring_bond[idx] {
                bond.order = BondOrder::Single;
            }
        }

        let mut pi_atoms = vec![false; atoms.len()];
        for (idx, atom) in atoms.iter_mut().enumerate() {
            let mut used: u32 = adjacency[idx]
                .iter()
                .map(|&b| u32::from(bonds[b].order.valence()))
                .sum();
            if atom.bracket {
                used += u32::from(atom.hydrogens);
            }
            let Some(valences) = element::allowed_valences(atom.element.atomic_number, atom.charge) else {
                continue;
            };
            let exceeded = || SmilesError::ValenceExceeded {
                atom: idx + 1,
                symbol: atom.element.symbol.to_string(),
                valence: used,
            };
            let target = valences
                .iter()
                .map(|&v| u32::from(v))
                .find(|&v| v >= used)
                .ok_or_else(exceeded)?;
            let free = target - used;

            if atom.aromatic {
                // One ring double bond unless the atom already carries one
                // (pyridone C=O) or has no valence left (pyrrole [nH], furan o).
                let has_double = adjacency[idx]
                    .iter()
                    .any(|&b| bonds[b].order == BondOrder::Double);
                pi_atoms[idx] = free >= 1 && !has_double;
                if !atom.bracket {
                    atom.hydrogens = (free - u32::from(pi_atoms[idx])) as u8;
                }
            } else if !atom.bracket {
                atom.hydrogens = free as u8;
            }
        }

        if let Some(idx) = unmatched_pi_atom(&pi_atoms, &bonds) {
            return Err(SmilesError::NotKekulizable {
                atom: idx + 1,
                symbol: atoms[idx].element.symbol.to_string(),
            });
        }

        Ok(Molecule {
            atoms,
            bonds,
            adjacency,
            ring_bond,
            components,
        })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Bonds touching `atom`.
    pub fn bonds_of(&self, atom: usize) -> impl Iterator<Item = &Bond> + '_ {
        self.adjacency[atom].iter().map(move |&b| &self.bonds[b])
    }

    /// Neighbour indices of `atom`, explicit hydrogens included.
    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.bonds_of(atom).map(move |b| b.other(atom))
    }

    /// Number of non-hydrogen neighbours.
    pub fn heavy_degree(&self, atom: usize) -> usize {
        self.neighbors(atom)
            .filter(|&n| !self.atoms[n].is_hydrogen())
            .count()
    }

    /// Implicit plus explicit-atom hydrogens on `atom`.
    pub fn total_hydrogens(&self, atom: usize) -> usize {
        let explicit = self
            .neighbors(atom)
            .filter(|&n| self.atoms[n].is_hydrogen())
            .count();
        usize::from(self.atoms[atom].hydrogens) + explicit
    }

    pub fn is_ring_bond(&self, bond: usize) -> bool {
        self.ring_bond[bond]
    }

    pub fn atom_in_ring(&self, atom: usize) -> bool {
        self.adjacency[atom].iter().any(|&b| self.ring_bond[b])
    }

    /// Cyclomatic number: independent rings (SSSR size).
    pub fn ring_count(&self) -> usize {
        (self.bonds.len() + self.components).saturating_sub(self.atoms.len())
    }

    /// Disconnected fragments (salts, solvates).
    pub fn fragment_count(&self) -> usize {
        self.components
    }
}

// ---------------------------------------------------------------------------
// Ring perception
// ---------------------------------------------------------------------------

/// Flag ring bonds and count connected components in one pass.
///
/// A bond is a ring bond unless it is a bridge; bridges are found with an
/// iterative low-link DFS so deep chains cannot overflow the call stack.
fn perceive_rings(adjacency: &[Vec<usize>], bonds: &[Bond]) -> (Vec<bool>, usize) {
    let n_atoms = adjacency.len();
    let mut ring = vec![true; bonds.len()];
    // Discovery time, 0 = unvisited.
    let mut disc = vec![0usize; n_atoms];
    let mut low = vec![0usize; n_atoms];
    let mut timer = 0;
    let mut components = 0;

    for root in 0..n_atoms {
        if disc[root] != 0 {
            continue;
        }
        components += 1;
        timer += 1;
        disc[root] = timer;
        low[root] = timer;
        // (atom, bond we arrived through, next adjacency slot)
        let mut stack: Vec<(usize, Option<usize>, usize)> = vec![(root, None, 0)];

        while let Some(&(atom, via, slot)) = stack.last() {
            let Some(&b) = adjacency[atom].get(slot) else {
                stack.pop();
                if let (Some(&(parent, _, _)), Some(via)) = (stack.last(), via) {
                    low[parent] = low[parent].min(low[atom]);
                    if low[atom] > disc[parent] {
                        ring[via] = false;
                    }
                }
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.2 += 1;
            }
            if via == Some(b) {
                continue;
            }
            let next = bonds[b].other(atom);
            if disc[next] == 0 {
                timer += 1;
                disc[next] = timer;
                low[next] = timer;
                stack.push((next, Some(b), 0));
            } else {
                low[atom] = low[atom].min(disc[next]);
            }
        }
    }
    (ring, components)
}

// ---------------------------------------------------------------------------
// Kekulé check
// ---------------------------------------------------------------------------

/// Every atom that needs a ring double bond must get exactly one: a perfect
/// matching over aromatic bonds between such atoms. Returns the first atom
/// left without a partner.
fn unmatched_pi_atom(pi_atoms: &[bool], bonds: &[Bond]) -> Option<usize> {
    let members: Vec<usize> = (0..pi_atoms.len()).filter(|&i| pi_atoms[i]).collect();
    if members.is_empty() {
        return None;
    }
    let mut local = vec![usize::MAX; pi_atoms.len()];
    for (l, &atom) in members.iter().enumerate() {
        local[atom] = l;
    }
    let mut graph = vec![Vec::new(); members.len()];
    for bond in bonds {
        if bond.order == BondOrder::Aromatic && pi_atoms[bond.a] && pi_atoms[bond.b] {
            graph[local[bond.a]].push(local[bond.b]);
            graph[local[bond.b]].push(local[bond.a]);
        }
    }

    let mut matching = Matching::new(graph);
    matching.solve().map(|l| members[l])
}

/// Maximum matching in a general graph (Edmonds' blossom contraction).
/// Fused ring systems such as azulene are not bipartite.
struct Matching {
    graph: Vec<Vec<usize>>,
    mate: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
    base: Vec<usize>,
    used: Vec<bool>,
    blossom: Vec<bool>,
}

impl Matching {
    fn new(graph: Vec<Vec<usize>>) -> Self {
        let n = graph.len();
        Matching {
            graph,
            mate: vec![None; n],
            parent: vec![None; n],
            base: (0..n).collect(),
            used: vec![false; n],
            blossom: vec![false; n],
        }
    }

    /// Match everything possible; the first vertex left unmatched, if any.
    fn solve(&mut self) -> Option<usize> {
        let n = self.graph.len();
        for v in 0..n {
            if self.mate[v].is_some() {
                continue;
            }
            if let Some(&u) = self.graph[v].iter().find(|&&u| self.mate[u].is_none()) {
                self.mate[v] = Some(u);
                self.mate[u] = Some(v);
            }
        }
        for root in 0..n {
            if self.mate[root].is_some() {
                continue;
            }
            match self.find_path(root) {
                Some(end) => self.augment(end),
                None => return Some(root),
            }
        }
        None
    }

    fn augment(&mut self, end: usize) {
        let mut v = Some(end);
        while let Some(x) = v {
            let Some(px) = self.parent[x] else { break };
            let next = self.mate[px];
            self.mate[x] = Some(px);
            self.mate[px] = Some(x);
            v = next;
        }
    }

    fn lowest_common_base(&self, mut a: usize, mut b: usize) -> usize {
        let mut seen = vec![false; self.graph.len()];
        loop {
            a = self.base[a];
            seen[a] = true;
            match self.mate[a].and_then(|m| self.parent[m]) {
                Some(p) => a = p,
                None => break,
            }
        }
        loop {
            b = self.base[b];
            if seen[b] {
                return b;
            }
            match self.mate[b].and_then(|m| self.parent[m]) {
                Some(p) => b = p,
                None => return b,
            }
        }
    }

    fn mark_path(&mut self, mut v: usize, b: usize, mut child: usize) {
        while self.base[v] != b {
            let Some(m) = self.mate[v] else { break };
            self.blossom[self.base[v]] = true;
            self.blossom[self.base[m]] = true;
            self.parent[v] = Some(child);
            child = m;
            match self.parent[m] {
                Some(p) => v = p,
                None => break,
            }
        }
    }

    fn find_path(&mut self, root: usize) -> Option<usize> {
        let n = self.graph.len();
        self.used.iter_mut().for_each(|u| *u = false);
        self.parent.iter_mut().for_each(|p| *p = None);
        for (i, b) in self.base.iter_mut().enumerate() {
            *b = i;
        }

        self.used[root] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(v) = queue.pop_front() {
            for k in 0..self.graph[v].len() {
                let to = self.graph[v][k];
                if self.base[v] == self.base[to] || self.mate[v] == Some(to) {
                    continue;
                }
                let odd_cycle = to == root || self.mate[to].is_some_and(|m| self.parent[m].is_some());
                if odd_cycle {
                    let cur = self.lowest_common_base(v, to);
                    self.blossom.iter_mut().for_each(|b| *b = false);
                    self.mark_path(v, cur, to);
                    self.mark_path(to, cur, v);
                    for i in 0..n {
                        if self.blossom[self.base[i]] {
                            self.base[i] = cur;
                            if !self.used[i] {
                                self.used[i] = true;
                                queue.push_back(i);
                            }
                        }
                    }
                } else if self.parent[to].is_none() {
                    self.parent[to] = Some(v);
                    match self.mate[to] {
                        None => return Some(to),
                        Some(m) => {
                            self.used[m] = true;
                            queue.push_back(m);
                        }
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::BondOrder;
    use crate::chem::smiles::{parse, SmilesError};

    #[test]
    fn benzene_rings_and_hydrogens() {
        let mol = parse("c1ccccc1").unwrap();
        assert_eq!(mol.atoms().len(), 6);
        assert_eq!(mol.ring_count(), 1);
        assert!((0..6).all(|i| mol.total_hydrogens(i) == 1));
        assert!((0..6).all(|i| mol.atom_in_ring(i)));
    }

    #[test]
    fn pyridine_nitrogen_has_no_hydrogen() {
        let mol = parse("c1ccncc1").unwrap();
        assert_eq!(mol.total_hydrogens(3), 0);
        assert_eq!(mol.total_hydrogens(0), 1);
    }

    #[test]
    fn ethanol_hydrogens() {
        let mol = parse("CCO").unwrap();
        assert_eq!(mol.total_hydrogens(0), 3);
        assert_eq!(mol.total_hydrogens(1), 2);
        assert_eq!(mol.total_hydrogens(2), 1);
        assert_eq!(mol.ring_count(), 0);
        assert!(!mol.is_ring_bond(0));
    }

    #[test]
    fn fused_and_disconnected() {
        let naphthalene = parse("c1ccc2ccccc2c1").unwrap();
        assert_eq!(naphthalene.ring_count(), 2);

        let salt = parse("C[NH3+].[Cl-]").unwrap();
        assert_eq!(salt.fragment_count(), 2);
        assert_eq!(salt.ring_count(), 0);
    }

    #[test]
    fn aromatic_hydrogens_follow_the_kekule_form() {
        let pyrrole = parse("c1cc[nH]c1").unwrap();
        assert_eq!(pyrrole.total_hydrogens(3), 1);
        assert!((0..3).all(|i| pyrrole.total_hydrogens(i) == 1));

        let pyridone = parse("O=c1cccc[nH]1").unwrap();
        assert_eq!(pyridone.total_hydrogens(1), 0);

        let pyridinium = parse("C[n+]1ccccc1").unwrap();
        assert_eq!(pyridinium.total_hydrogens(1), 0);

        let furan = parse("c1ccoc1").unwrap();
        assert_eq!(furan.total_hydrogens(3), 0);

        let written_doubles = parse("c1=cc=cc=c1").unwrap();
        assert!((0..6).all(|i| written_doubles.total_hydrogens(i) == 1));
    }

    #[test]
    fn kekulizes_fused_and_odd_ring_systems() {
        for smiles in [
            "c1ccc2ccccc2c1",             // naphthalene
            "c1ccc2cc3ccccc3cc2c1",       // anthracene
            "c1ccc2cccc2cc1",             // azulene
            "c1ccc2[nH]ccc2c1",           // indole
            "Cn1cnc2c1c(=O)n(C)c(=O)n2C", // caffeine
            "[cH-]1cccc1",                // cyclopentadienide
            "c1cc[o+]cc1",                // pyrylium
            "[O-][n+]1ccccc1",            // pyridine N-oxide
        ] {
            assert!(parse(smiles).is_ok(), "{smiles} should kekulize");
        }
    }

    #[test]
    fn rejects_unkekulizable_aromatics() {
        for smiles in ["c1cccc1", "c1cccn1", "c1ccccc1c1cccc1"] {
            assert!(
                matches!(parse(smiles), Err(SmilesError::NotKekulizable { .. })),
                "{smiles} should be rejected"
            );
        }
    }

    #[test]
    fn biaryl_link_is_a_single_non_ring_bond() {
        let biphenyl = parse("c1ccccc1c1ccccc1").unwrap();
        let link = biphenyl
            .bonds()
            .iter()
            .position(|b| (b.a, b.b) == (5, 6))
            .unwrap();
        assert_eq!(biphenyl.bonds()[link].order, BondOrder::Single);
        assert!(!biphenyl.is_ring_bond(link));
        assert_eq!(biphenyl.ring_count(), 2);
    }

    #[test]
    fn bracket_atoms_respect_valence() {
        assert!(matches!(
            parse("[CH4](C)(C)(C)C"),
            Err(SmilesError::ValenceExceeded { atom: 1, valence: 8, .. })
        ));
        assert!(matches!(parse("[OH2]C"), Err(SmilesError::ValenceExceeded { .. })));
        for smiles in ["C[N+](C)(C)C", "[NH4+]", "C[N+](=O)[O-]", "CS(=O)(=O)C", "[Fe+3]", "F[B-](F)(F)F"] {
            assert!(parse(smiles).is_ok(), "{smiles} should parse");
        }
    }

    #[test]
    fn overbonded_atom_is_an_error_not_a_panic() {
        let smiles = format!("C{}", "($C)".repeat(64));
        assert!(matches!(
            parse(&smiles),
            Err(SmilesError::ValenceExceeded { atom: 1, valence: 256, .. })
        ));
    }

    #[test]
    fn long_chain_ring_perception() {
        let chain = "C".repeat(20_000);
        let mol = parse(&chain).unwrap();
        assert_eq!(mol.ring_count(), 0);
        assert!((0..mol.bonds().len()).all(|b| !mol.is_ring_bond(b)));

        let ring = format!("C1{}C1", "C".repeat(20_000));
        let mol = parse(&ring).unwrap();
        assert_eq!(mol.ring_count(), 1);
        assert!((0..mol.bonds().len()).all(|b| mol.is_ring_bond(b)));
    }

    #[test]
    fn explicit_hydrogen_atoms_count() {
        let mol = parse("[H]C([H])([H])[H]").unwrap();
        assert_eq!(mol.total_hydrogens(1), 4);
        assert_eq!(mol.heavy_degree(1), 0);
    }
}
