// ============================================================================
// Structure : Transaction
// ============================================================================
// Représente une ligne de l'export bancaire
//
// CONCEPTS RUST :
// 1. NaiveDate : date de chrono sans fuseau horaire (l'export n'en a pas)
// 2. f64 : montant et solde (précision suffisante pour un graphique)
// 3. String : la transaction possède sa description et sa devise
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Une transaction de l'export (une ligne du fichier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date de la transaction
    pub date: NaiveDate,

    /// Libellé (ex: "Netto", "Løn")
    pub description: String,

    /// Montant signé : négatif pour une dépense
    pub amount: f64,

    /// Solde du compte après la transaction
    pub balance: f64,

    /// Devise (ex: "DKK")
    pub currency: String,
}

// ============================================================================
// Structure : Ledger
// ============================================================================
// Toutes les transactions d'un fichier, dans l'ordre du fichier
// (la plus récente en premier).
//
// CONCEPT : Vues parallèles
// - Le stockage est un Vec<Transaction> (une entrée par ligne)
// - dates(), amounts(), ... exposent les colonnes sous forme d'itérateurs
// - Toutes les vues ont donc forcément la même longueur
// ============================================================================

/// Ensemble ordonné des transactions d'un export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    /// Crée un ledger à partir des transactions lues
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Nombre de transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Vrai si le ledger est vide
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Transaction à l'index donné (index de ligne dans le fichier)
    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    /// Colonne des dates
    ///
    /// CONCEPT RUST : impl Iterator
    /// - Retourne un itérateur sans allouer de Vec
    /// - Le lifetime est lié à &self (emprunt du ledger)
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.transactions.iter().map(|t| t.date)
    }

    /// Colonne des libellés
    pub fn descriptions(&self) -> impl Iterator<Item = &str> + '_ {
        self.transactions.iter().map(|t| t.description.as_str())
    }

    /// Colonne des montants
    pub fn amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.transactions.iter().map(|t| t.amount)
    }

    /// Colonne des soldes
    pub fn balances(&self) -> impl Iterator<Item = f64> + '_ {
        self.transactions.iter().map(|t| t.balance)
    }

    /// Colonne des devises
    pub fn currencies(&self) -> impl Iterator<Item = &str> + '_ {
        self.transactions.iter().map(|t| t.currency.as_str())
    }

    /// Première et dernière date (chronologiquement)
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.dates().min()?;
        let last = self.dates().max()?;
        Some((first, last))
    }
}
