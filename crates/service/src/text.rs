//! Text folding for matching across Turkish spellings
//!
//! Source sites mix accented, unaccented, and mojibake'd spellings of the
//! same product words ("süt", "sut"). All pipeline matching happens on a
//! lowercase, diacritic-folded form so those variants compare equal.

/// Lowercase and fold Turkish diacritics to their ASCII neighbours.
pub fn fold(text: &str) -> String {
	text.chars()
		.map(|c| match c {
			'ç' | 'Ç' => 'c',
			'ğ' | 'Ğ' => 'g',
			'ı' | 'İ' => 'i',
			'ö' | 'Ö' => 'o',
			'ş' | 'Ş' => 's',
			'ü' | 'Ü' => 'u',
			c => c.to_ascii_lowercase(),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fold_turkish_diacritics() {
		assert_eq!(fold("Tavuk Göğsü"), "tavuk gogsu");
		assert_eq!(fold("ŞOK Sızma Zeytinyağı"), "sok sizma zeytinyagi");
	}

	#[test]
	fn test_fold_is_idempotent() {
		let once = fold("Piliç Bonfile");
		assert_eq!(fold(&once), once);
	}
}
