//! Word frequencies over product-line labels, for the word cloud.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Transaction;

const STOP_WORDS: [&str; 1] = ["and"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

/// Count the words of every transaction's product line.
///
/// Words are split on anything that is not alphanumeric and compared
/// case-insensitively; the first spelling seen is reported. Sorted by
/// descending count, ties in first-seen order.
pub fn word_frequencies(transactions: &[Transaction]) -> Vec<WordFrequency> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut words: Vec<WordFrequency> = Vec::new();

    for tx in transactions {
        for word in tx.product_line.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            let key = word.to_lowercase();
            if STOP_WORDS.contains(&key.as_str()) {
                continue;
            }
            match index.get(&key) {
                Some(&i) => words[i].count += 1,
                None => {
                    index.insert(key, words.len());
                    words.push(WordFrequency {
                        word: word.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    words.sort_by(|a, b| b.count.cmp(&a.count));
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::tx;

    #[test]
    fn counts_words_without_stop_words() {
        let rows = vec![
            tx("1", "Health and beauty", 1, 1.0),
            tx("2", "Sports and travel", 1, 1.0),
            tx("3", "Home and lifestyle", 1, 1.0),
            tx("4", "Sports and travel", 1, 1.0),
            tx("5", "Fashion accessories", 1, 1.0),
        ];
        let freq = word_frequencies(&rows);
        assert_eq!(freq[0], WordFrequency { word: "Sports".into(), count: 2 });
        assert_eq!(freq[1], WordFrequency { word: "travel".into(), count: 2 });
        assert!(freq.iter().all(|w| w.word != "and"));
        assert_eq!(freq.iter().map(|w| w.count).sum::<usize>(), 10);
    }

    #[test]
    fn ampersands_and_case_are_ignored() {
        let rows = vec![tx("1", "Food & Beverages", 1, 1.0), tx("2", "food and beverages", 1, 1.0)];
        let freq = word_frequencies(&rows);
        assert_eq!(
            freq,
            vec![
                WordFrequency { word: "Food".into(), count: 2 },
                WordFrequency { word: "Beverages".into(), count: 2 },
            ]
        );
    }
}
