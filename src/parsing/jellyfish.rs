//! Parsers for jellyfish `histo` and `dump -c` output.
//!
//! A histogram line is `<occurrence> <count>`; the final line aggregates every
//! k-mer seen more often than its occurrence and is dropped. A dump line is
//! `<kmer> <count>`.

use std::collections::{BTreeSet, HashMap};

use crate::parsing::ParseError;
use crate::utils::validation::check_kmer_space;

/// K-mer frequency histogram, `(occurrence, occurrence * count)` in file order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Histogram {
    pub bins: Vec<(u64, u64)>,
}

impl Histogram {
    /// The occurrence with the largest value. Ties go to the earliest bin.
    #[must_use]
    pub fn peak(&self) -> Option<u64> {
        let mut best: Option<(u64, u64)> = None;
        for &(occurrence, value) in &self.bins {
            match best {
                Some((_, v)) if value <= v => {}
                _ => best = Some((occurrence, value)),
            }
        }
        best.map(|(occurrence, _)| occurrence)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Parse a `jellyfish histo` file.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a non-blank line is not two
/// non-negative integers.
pub fn parse_histogram(text: &str) -> Result<Histogram, ParseError> {
    let mut bins = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (occurrence, count) = parse_two_fields::<u64, u64>(line).ok_or_else(|| {
            ParseError::InvalidFormat(format!("Invalid histogram line {}: '{}'", i + 1, line))
        })?;
        bins.push((occurrence, occurrence.saturating_mul(count)));
    }

    // Aggregate bucket
    bins.pop();

    Ok(Histogram { bins })
}

/// K-mer counts from one `jellyfish dump -c` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerCounts {
    counts: HashMap<String, u64>,
    symbols: BTreeSet<char>,
    k: usize,
}

impl KmerCounts {
    /// Sorted set of symbols appearing in any k-mer
    #[must_use]
    pub fn symbols(&self) -> &BTreeSet<char> {
        &self.symbols
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Count for a k-mer, 0 when it was not in the dump
    #[must_use]
    pub fn count(&self, kmer: &str) -> u64 {
        self.counts.get(kmer).copied().unwrap_or(0)
    }

    /// Number of distinct k-mers in the dump
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
}

/// Parse a `jellyfish dump -c` file.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line is malformed, the file holds
/// no k-mers, or the k-mers differ in length.
pub fn parse_dump(text: &str) -> Result<KmerCounts, ParseError> {
    let mut counts = HashMap::new();
    let mut symbols = BTreeSet::new();
    let mut k: Option<usize> = None;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (kmer, count) = parse_two_fields::<String, u64>(line).ok_or_else(|| {
            ParseError::InvalidFormat(format!("Invalid dump line {}: '{}'", i + 1, line))
        })?;

        let len = kmer.chars().count();
        match k {
            None => k = Some(len),
            Some(expected) if expected != len => {
                return Err(ParseError::InvalidFormat(format!(
                    "Not all k-mers have the same length: found {len} and {expected}"
                )));
            }
            Some(_) => {}
        }

        symbols.extend(kmer.chars());
        counts.insert(kmer, count);
    }

    let k = k.ok_or_else(|| ParseError::InvalidFormat("No k-mers in dump".to_string()))?;

    Ok(KmerCounts { counts, symbols, k })
}

/// Every k-mer of length `k` over `symbols`, in lexicographic order of the
/// symbol sequence (rightmost position varies fastest).
///
/// # Errors
///
/// Returns `ParseError::KmerSpaceTooLarge` if the space exceeds the k-mer limit.
pub fn all_kmers(symbols: &BTreeSet<char>, k: usize) -> Result<Vec<String>, ParseError> {
    let alphabet: Vec<char> = symbols.iter().copied().collect();
    let total = check_kmer_space(alphabet.len(), k)?;

    if alphabet.is_empty() {
        return Ok(Vec::new());
    }

    let mut kmers = Vec::with_capacity(total);
    let mut indices = vec![0usize; k];

    loop {
        kmers.push(indices.iter().map(|&i| alphabet[i]).collect());

        // Odometer increment from the right
        let mut pos = k;
        loop {
            if pos == 0 {
                return Ok(kmers);
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < alphabet.len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}

fn parse_two_fields<A: std::str::FromStr, B: std::str::FromStr>(line: &str) -> Option<(A, B)> {
    let mut fields = line.split_whitespace();
    let a = fields.next()?.parse().ok()?;
    let b = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_histogram_drops_last_bin() {
        let histogram = parse_histogram("1 100\n2 30\n3 40\n4 1000\n").unwrap();
        assert_eq!(histogram.bins, vec![(1, 100), (2, 60), (3, 120)]);
        assert_eq!(histogram.peak(), Some(3));
    }

    #[test]
    fn test_histogram_peak_ties_go_first() {
        let histogram = parse_histogram("1 10\n2 5\n5 2\n6 0\n").unwrap();
        assert_eq!(histogram.bins, vec![(1, 10), (2, 10), (5, 10)]);
        assert_eq!(histogram.peak(), Some(1));
    }

    #[test]
    fn test_single_line_histogram_is_empty() {
        let histogram = parse_histogram("1 10\n").unwrap();
        assert!(histogram.is_empty());
        assert_eq!(histogram.peak(), None);
    }

    #[test]
    fn test_invalid_histogram_line() {
        assert!(matches!(
            parse_histogram("1 10\nfoo bar\n"),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_dump() {
        let counts = parse_dump("AC 3\nGT 5\nAA 1\n").unwrap();
        assert_eq!(counts.k(), 2);
        assert_eq!(
            counts.symbols().iter().collect::<String>(),
            "ACGT".to_string()
        );
        assert_eq!(counts.count("GT"), 5);
        assert_eq!(counts.count("TT"), 0);
        assert_eq!(counts.distinct(), 3);
    }

    #[test]
    fn test_dump_mixed_lengths_rejected() {
        assert!(matches!(
            parse_dump("ACG 3\nGT 5\n"),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_empty_dump_rejected() {
        assert!(parse_dump("\n").is_err());
    }

    #[test]
    fn test_all_kmers_order() {
        let symbols: BTreeSet<char> = ['T', 'A'].into_iter().collect();
        let kmers = all_kmers(&symbols, 2).unwrap();
        assert_eq!(kmers, vec!["AA", "AT", "TA", "TT"]);
    }

    #[test]
    fn test_all_kmers_size() {
        let symbols: BTreeSet<char> = "ACGT".chars().collect();
        assert_eq!(all_kmers(&symbols, 5).unwrap().len(), 1024);
    }

    #[test]
    fn test_all_kmers_too_large() {
        let symbols: BTreeSet<char> = "ACGT".chars().collect();
        assert!(matches!(
            all_kmers(&symbols, 40),
            Err(ParseError::KmerSpaceTooLarge { symbols: 4, k: 40 })
        ));
    }
}
