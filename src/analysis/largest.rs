// ============================================================================
// Largest : sélection des N plus grosses transactions
// ============================================================================
// Sélectionne les N transactions au montant signé le plus élevé.
//
// CONCEPTS :
// 1. Montant signé, pas valeur absolue : une dépense de -500 ne bat pas
//    un virement de +5
// 2. Chaque résultat garde l'index de sa ligne : on ne recherche jamais une
//    transaction par son montant (deux montants égaux resteraient ambigus)
// 3. Sélection partielle (select_nth_unstable_by) puis tri final
// ============================================================================

use std::cmp::Ordering;

use tracing::debug;

use crate::models::{Ledger, Transaction};

/// Nombre de transactions annotées par défaut
pub const DEFAULT_TOP_N: usize = 3;

/// Une transaction sélectionnée avec son index de ligne dans le fichier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedTransaction<'a> {
    /// Index de la ligne dans le fichier (0 = première ligne)
    pub index: usize,

    /// La transaction elle-même (empruntée au ledger)
    pub transaction: &'a Transaction,
}

/// Ordre de classement : montant décroissant, puis ordre du fichier
///
/// CONCEPT RUST : f64::total_cmp
/// - f64 n'implémente pas Ord (à cause de NaN)
/// - total_cmp donne un ordre total, utilisable pour trier
fn rank_order(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Retourne les `n` plus grosses transactions, de la plus grosse à la plus petite
///
/// Les égalités de montant sont départagées par l'ordre du fichier.
/// Si `n` dépasse le nombre de lignes, toutes les lignes sont retournées.
pub fn largest_transactions(ledger: &Ledger, n: usize) -> Vec<RankedTransaction<'_>> {
    let mut ranked: Vec<(usize, f64)> = ledger.amounts().enumerate().collect();
    let n = n.min(ranked.len());

    if n == 0 {
        return Vec::new();
    }

    // Partitionne : les n premiers éléments sont les n plus grands (non triés)
    if n < ranked.len() {
        ranked.select_nth_unstable_by(n - 1, rank_order);
        ranked.truncate(n);
    }
    ranked.sort_by(rank_order);

    debug!(requested = n, rows = ledger.len(), "Selected largest transactions");

    ranked
        .into_iter()
        .filter_map(|(index, _)| {
            ledger
                .get(index)
                .map(|transaction| RankedTransaction { index, transaction })
        })
        .collect()
}
