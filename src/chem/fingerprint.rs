use super::molecule::Molecule;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over a sequence of words. Stable across platforms and
/// runs, unlike `std`'s randomly seeded hasher.
fn fnv1a(words: &[u64]) -> u64 {
    let mut hash = FNV_OFFSET;
    for word in words {
        for byte in word.to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

/// Circular (Morgan-style) fingerprint of `mol`, folded into `bits` bins.
///
/// Hydrogen atoms present in the graph are folded into their neighbour's
/// hydrogen count instead of getting identifiers of their own.
pub fn morgan(mol: &Molecule, radius: u32, bits: usize) -> Vec<f64> {
    let mut out = vec![0.0; bits];
    if bits == 0 {
        return out;
    }

    let atoms = mol.atoms();
    let heavy: Vec<usize> = (0..atoms.len()).filter(|&i| !atoms[i].is_hydrogen()).collect();

    let mut ids = vec![0u64; atoms.len()];
    for &i in &heavy {
        let atom = &atoms[i];
        ids[i] = fnv1a(&[
            u64::from(atom.element.atomic_number),
            mol.heavy_degree(i) as u64,
            mol.total_hydrogens(i) as u64,
            atom.charge as u8 as u64,
            u64::from(mol.atom_in_ring(i)),
            u64::from(atom.aromatic),
        ]);
    }
    set_bits(&mut out, heavy.iter().map(|&i| ids[i]));

    for round in 1..=radius {
        let mut next = ids.clone();
        for &i in &heavy {
            let mut env: Vec<(u64, u64)> = mol
                .bonds_of(i)
                .filter(|b| !atoms[b.other(i)].is_hydrogen())
                .map(|b| (b.order.code(), ids[b.other(i)]))
                .collect();
            env.sort_unstable();

            let mut words = Vec::with_capacity(2 + env.len() * 2);
            words.push(u64::from(round));
            words.push(ids[i]);
            for (bond, neighbor) in env {
                words.push(bond);
                words.push(neighbor);
            }
            next[i] = fnv1a(&words);
        }
        ids = next;
        set_bits(&mut out, heavy.iter().map(|&i| ids[i]));
    }

    out
}

fn set_bits(out: &mut [f64], ids: impl Iterator<Item = u64>) {
    let len = out.len() as u64;
    for id in ids {
        out[(id % len) as usize] = 1.0;
    }
}
