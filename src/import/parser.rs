// ============================================================================
// Parser : lecture de l'export CSV de la banque
// ============================================================================
// Format (pas d'en-tête, la plus récente en premier) :
//
//   05-06-2020;Test;1,00;100,00;DKK;
//   04-06-2020;Test;1,00;99,00;DKK;
//
// - Encodage UTF-8, précédé d'un BOM
// - Délimiteur ';', champs éventuellement entre guillemets
// - Nombres au format européen : '.' pour les milliers, ',' pour les décimales
//
// Une seule ligne mal formée (ou vide) fait échouer toute la lecture :
// pas de résultat partiel, pas de ligne ignorée. Les erreurs citent la
// ligne physique du fichier.
// ============================================================================

use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, instrument};

use crate::error::{ChartError, Result};
use crate::models::{Ledger, Transaction};

/// Format des dates de l'export (jour-mois-année)
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Nombre de colonnes utiles : date, libellé, montant, solde, devise
const FIELD_COUNT: usize = 5;

/// Marque d'ordre des octets UTF-8
const BOM: char = '\u{feff}';

/// Lit et parse un fichier d'export
#[instrument(skip_all, fields(file = %path.display()))]
pub fn parse_file(path: &Path) -> Result<Ledger> {
    // Le fichier est lu en entier puis fermé avant le parsing
    let text = std::fs::read_to_string(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let ledger = parse_str(&text)?;
    info!(transactions = ledger.len(), "Export parsed");
    Ok(ledger)
}

/// Parse le contenu d'un export déjà en mémoire
pub fn parse_str(text: &str) -> Result<Ledger> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    reject_blank_lines(text)?;

    // CONCEPT : ReaderBuilder
    // - has_headers(false) : la première ligne est une transaction
    // - flexible(true) : on vérifie nous-mêmes le nombre de champs
    //   pour produire une erreur qui cite la ligne
    // - Trim::None : le libellé est gardé tel quel, dates et montants
    //   sont nettoyés par leurs propres parsers
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .quote(b'"')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let mut transactions = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Ligne physique du fichier (guillemets multi-lignes compris)
        let line = record
            .position()
            .map_or(index + 1, |position| position.line() as usize);
        transactions.push(parse_record(&record, line)?);
    }

    if transactions.is_empty() {
        return Err(ChartError::EmptyLedger);
    }

    debug!(rows = transactions.len(), "All rows parsed");
    Ok(Ledger::new(transactions))
}

/// Refuse les lignes vides : seul le saut de ligne final est toléré
fn reject_blank_lines(text: &str) -> Result<()> {
    match text.lines().position(|line| line.trim().is_empty()) {
        Some(index) => Err(ChartError::Parse {
            line: index + 1,
            message: "blank line".to_string(),
        }),
        None => Ok(()),
    }
}

/// Convertit une ligne CSV en transaction
fn parse_record(record: &StringRecord, line: usize) -> Result<Transaction> {
    check_field_count(record, line)?;

    // Les indices existent : check_field_count l'a garanti
    let field = |i: usize| record.get(i).unwrap_or_default();

    let date = parse_date(field(0)).ok_or_else(|| ChartError::Parse {
        line,
        message: format!("invalid date '{}' (expected DD-MM-YYYY)", field(0)),
    })?;

    let amount = parse_amount(field(2)).ok_or_else(|| ChartError::Parse {
        line,
        message: format!("invalid amount '{}'", field(2)),
    })?;

    let balance = parse_amount(field(3)).ok_or_else(|| ChartError::Parse {
        line,
        message: format!("invalid balance '{}'", field(3)),
    })?;

    Ok(Transaction {
        date,
        description: field(1).to_string(),
        amount,
        balance,
        currency: field(4).to_string(),
    })
}

/// Accepte 5 champs, ou 6 si le dernier est vide (';' final de l'export)
fn check_field_count(record: &StringRecord, line: usize) -> Result<()> {
    let valid = match record.len() {
        FIELD_COUNT => true,
        n if n == FIELD_COUNT + 1 => record.get(FIELD_COUNT).is_some_and(str::is_empty),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ChartError::Parse {
            line,
            message: format!(
                "expected {} fields (date;description;amount;balance;currency), found {}",
                FIELD_COUNT,
                record.len()
            ),
        })
    }
}

/// Parse une date "DD-MM-YYYY"
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse un nombre au format européen ("1.234,56" -> 1234.56)
///
/// Les '.' (milliers) sont supprimés, puis la ',' devient le séparateur décimal.
pub fn parse_amount(s: &str) -> Option<f64> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
